#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Emergency stop operator (transport-agnostic).
//!
//! When armed, the operator takes over longitudinal control and brings the
//! vehicle to a stop by ramping commanded acceleration down to a fixed floor
//! under a jerk limit, holding steering where it was. It emits one command
//! and one status record per tick, armed or not.
//!
//! ## Architecture
//!
//! - **Messages**: commands and stamps (`types`), state and status (`status`)
//! - **Ramp**: pure next-command computation (`ramp`)
//! - **State machine**: Available ↔ Operating (`state`)
//! - **Cache**: last upstream command, steering hold, previous output (`cache`)
//! - **Operator**: intake, operate request, tick (`core`, built via `builder`)
//! - **Hosting**: serialized event loop (`runner`) and periodic ticks (`ticker`)
//!
//! Time comes from an injected `estop_traits::Clock`; outbound feeds are
//! `estop_traits::Publisher`s.

pub mod builder;
pub mod cache;
pub mod config;
pub mod conversions;
pub mod core;
pub mod error;
pub mod publish;
pub mod ramp;
pub mod runner;
pub mod state;
pub mod status;
pub mod ticker;
pub mod types;
pub mod util;

pub use builder::{Missing, OperatorBuilder};
pub use cache::RuntimeCache;
pub use config::OperatorCfg;
pub use crate::core::EmergencyStopOperator;
pub use error::{BuildError, OperatorError};
pub use runner::{Event, EventLoop, OperatorHandle};
pub use status::{OperateResponse, OperatorState, StatusRecord};
pub use ticker::Ticker;
pub use types::{ControlCommand, LateralCommand, LongitudinalCommand, Stamp};
