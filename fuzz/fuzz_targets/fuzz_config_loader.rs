#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = estop_config::load_toml(data)
        && cfg.validate().is_ok()
    {
        // Anything that validates must also build
        let core: estop_core::OperatorCfg = (&cfg).into();
        let op = estop_core::EmergencyStopOperator::builder()
            .with_config(core)
            .with_command_publisher(estop_core::publish::NullPublisher)
            .with_status_publisher(estop_core::publish::NullPublisher)
            .build();
        assert!(op.is_ok(), "validated config rejected by builder: {cfg:?}");
    }
});
