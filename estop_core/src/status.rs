//! Operator state and the records published about it.

use crate::types::Stamp;

/// Whether the operator is synthesizing a stopping command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OperatorState {
    /// Ready to take over; passes the last command through.
    #[default]
    Available,
    /// Ramping the vehicle down to a stop.
    Operating,
}

impl OperatorState {
    /// Stable lowercase name for logs and JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Operating => "operating",
        }
    }
}

impl core::fmt::Display for OperatorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published once per tick, after the control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRecord {
    pub stamp: Stamp,
    pub state: OperatorState,
}

/// Reply to an operate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperateResponse {
    pub success: bool,
}
