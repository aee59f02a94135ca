//! JSON-lines wire format for the `run` host.
//!
//! Input lines are tagged by `type`:
//!
//! ```text
//! {"type":"control_cmd","speed":10.0,"acceleration":0.0,"steering_tire_angle":0.1}
//! {"type":"operate","operate":true}
//! ```
//!
//! Output lines are tagged by `topic`: `control_cmd`, `status`,
//! `operate_response`.

use estop_core::{
    ControlCommand, LateralCommand, LongitudinalCommand, OperateResponse, Stamp, StatusRecord,
};
use estop_traits::Publisher;
use serde::Deserialize;
use serde_json::{Value, json};
use std::error::Error;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    ControlCmd {
        #[serde(default)]
        speed: f32,
        #[serde(default)]
        acceleration: f32,
        #[serde(default)]
        jerk: f32,
        #[serde(default)]
        steering_tire_angle: f32,
        #[serde(default)]
        steering_tire_rotation_rate: f32,
    },
    Operate {
        operate: bool,
    },
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> eyre::Result<Option<InputEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| eyre::eyre!("bad input line: {e}"))
}

/// Build a command stamped at receipt time. All sub-stamps share `stamp`.
pub fn to_command(
    stamp: Stamp,
    speed: f32,
    acceleration: f32,
    jerk: f32,
    steering_tire_angle: f32,
    steering_tire_rotation_rate: f32,
) -> ControlCommand {
    ControlCommand::new(
        stamp,
        LongitudinalCommand {
            stamp,
            speed,
            acceleration,
            jerk,
        },
        LateralCommand {
            stamp,
            steering_tire_angle,
            steering_tire_rotation_rate,
        },
    )
}

pub fn command_json(cmd: &ControlCommand) -> Value {
    json!({
        "topic": "control_cmd",
        "stamp": cmd.stamp.as_secs_f64(),
        "speed": cmd.longitudinal.speed,
        "acceleration": cmd.longitudinal.acceleration,
        "jerk": cmd.longitudinal.jerk,
        "steering_tire_angle": cmd.lateral.steering_tire_angle,
        "steering_tire_rotation_rate": cmd.lateral.steering_tire_rotation_rate,
    })
}

pub fn status_json(status: &StatusRecord) -> Value {
    json!({
        "topic": "status",
        "stamp": status.stamp.as_secs_f64(),
        "state": status.state.as_str(),
    })
}

pub fn operate_response_json(operate: bool, resp: &OperateResponse) -> Value {
    json!({
        "topic": "operate_response",
        "operate": operate,
        "success": resp.success,
    })
}

/// Publishes both feeds onto one ordered line channel.
#[derive(Debug, Clone)]
pub struct JsonLinePublisher {
    tx: crossbeam_channel::Sender<Value>,
}

impl JsonLinePublisher {
    pub fn new(tx: crossbeam_channel::Sender<Value>) -> Self {
        Self { tx }
    }
}

impl Publisher<ControlCommand> for JsonLinePublisher {
    fn publish(&mut self, msg: &ControlCommand) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.tx.send(command_json(msg)).map_err(|e| e.to_string().into())
    }
}

impl Publisher<StatusRecord> for JsonLinePublisher {
    fn publish(&mut self, msg: &StatusRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.tx.send(status_json(msg)).map_err(|e| e.to_string().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_control_cmd_with_defaults() {
        let ev = parse_line(r#"{"type":"control_cmd","speed":10}"#).unwrap().unwrap();
        assert_eq!(
            ev,
            InputEvent::ControlCmd {
                speed: 10.0,
                acceleration: 0.0,
                jerk: 0.0,
                steering_tire_angle: 0.0,
                steering_tire_rotation_rate: 0.0,
            }
        );
    }

    #[test]
    fn parses_operate() {
        let ev = parse_line(r#" {"type":"operate","operate":false} "#).unwrap();
        assert_eq!(ev, Some(InputEvent::Operate { operate: false }));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# arm next").unwrap(), None);
    }

    #[test]
    fn rejects_unknown_type_and_malformed_lines() {
        assert!(parse_line(r#"{"type":"brake"}"#).is_err());
        assert!(parse_line(r#"{"type":"operate"}"#).is_err());
        assert!(parse_line("not json").is_err());
    }

    #[test]
    fn command_json_carries_topic_and_fields() {
        let stamp = Stamp::from_duration(Duration::from_millis(1500));
        let cmd = ControlCommand::cruise(stamp, 8.5, -2.5, 0.25);
        let v = command_json(&cmd);
        assert_eq!(v["topic"], "control_cmd");
        assert_eq!(v["stamp"], 1.5);
        assert_eq!(v["speed"], 8.5);
        assert_eq!(v["acceleration"], -2.5);
        assert_eq!(v["steering_tire_angle"], 0.25);
    }

    #[test]
    fn publisher_preserves_command_then_status_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut p = JsonLinePublisher::new(tx);
        let cmd = ControlCommand::default();
        let status = StatusRecord {
            stamp: Stamp::ZERO,
            state: estop_core::OperatorState::Operating,
        };
        Publisher::<ControlCommand>::publish(&mut p, &cmd).unwrap();
        Publisher::<StatusRecord>::publish(&mut p, &status).unwrap();
        let topics: Vec<_> = rx.try_iter().map(|v| v["topic"].clone()).collect();
        assert_eq!(topics, vec![json!("control_cmd"), json!("status")]);
        assert_eq!(status_json(&status)["state"], "operating");
    }

    #[test]
    fn publisher_fails_once_reader_is_gone() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut p = JsonLinePublisher::new(tx);
        assert!(Publisher::<ControlCommand>::publish(&mut p, &ControlCommand::default()).is_err());
    }
}
