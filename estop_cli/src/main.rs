#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod error_fmt;
mod feed;
mod logging;
mod run;
mod simulate;

use clap::Parser;
use cli::{Cli, Commands, DEFAULT_CONFIG, JSON_MODE};
use error_fmt::{CONFIG_CONTEXT, exit_code_for_error, format_error_json, humanize};
use estop_core::publish::NullPublisher;
use estop_core::{EmergencyStopOperator, OperatorCfg, OperatorState};
use eyre::{Result, WrapErr};
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

/// `--config` wins; otherwise the default path if it exists; otherwise built-in tuning.
fn load_config(path: Option<&Path>) -> Result<estop_config::Config> {
    let cfg = match path {
        Some(p) => estop_config::load_file(p)?,
        None if Path::new(DEFAULT_CONFIG).exists() => {
            estop_config::load_file(Path::new(DEFAULT_CONFIG))?
        }
        None => estop_config::Config::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn real_main(cli: Cli) -> Result<()> {
    let _ = color_eyre::install();

    let cfg = load_config(cli.config.as_deref()).wrap_err(CONFIG_CONTEXT)?;
    let _log_guard = logging::init(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    let op_cfg = OperatorCfg::from(&cfg);
    tracing::debug!(?op_cfg, "configuration loaded");

    match cli.cmd {
        Commands::Run { duration_ms } => run::run(&op_cfg, duration_ms),
        Commands::Simulate {
            speed,
            acceleration,
            steer,
            cruise_ticks,
            max_ticks,
        } => {
            let scenario = simulate::Scenario {
                speed,
                acceleration,
                steer,
                cruise_ticks,
                max_ticks,
            };
            let report = simulate::simulate(&op_cfg, &scenario)?;
            if cli.json {
                simulate::print_json(&report);
            } else {
                simulate::print_table(&report);
            }
            Ok(())
        }
        Commands::SelfCheck => self_check(&op_cfg, cli.json),
    }
}

/// Build an operator from the effective config and run one armed tick.
#[allow(clippy::float_cmp)]
fn self_check(cfg: &OperatorCfg, json: bool) -> Result<()> {
    let mut op = EmergencyStopOperator::builder()
        .with_config(cfg.clone())
        .with_command_publisher(NullPublisher)
        .with_status_publisher(NullPublisher)
        .build()?;
    op.operate(true);
    let (cmd, status) = op.on_tick();
    if status.state != OperatorState::Operating
        || cmd.longitudinal.acceleration != cfg.target_acceleration
        || cmd.longitudinal.speed != 0.0
    {
        eyre::bail!("bootstrap tick produced unexpected output: {cmd:?}");
    }
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "update_rate_hz": cfg.update_rate_hz,
                "target_acceleration": cfg.target_acceleration,
                "target_jerk": cfg.target_jerk,
            })
        );
    } else {
        println!(
            "OK: {} Hz, floor {} m/s^2, jerk {} m/s^3",
            cfg.update_rate_hz, cfg.target_acceleration, cfg.target_jerk
        );
    }
    tracing::info!("self-check passed");
    Ok(())
}
