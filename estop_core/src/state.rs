//! Two-state operator lifecycle: Available ↔ Operating.
//!
//! Every request is accepted. Re-arming while operating and releasing while
//! available are no-op transitions.

use crate::status::OperatorState;

/// Result of applying an operate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OperatorState,
    pub to: OperatorState,
}

impl Transition {
    #[inline]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: OperatorState,
}

impl StateMachine {
    pub const fn new() -> Self {
        Self {
            state: OperatorState::Available,
        }
    }

    #[inline]
    pub const fn state(&self) -> OperatorState {
        self.state
    }

    #[inline]
    pub fn is_operating(&self) -> bool {
        self.state == OperatorState::Operating
    }

    /// Apply an operate request (`true` arms, `false` releases).
    pub fn request(&mut self, operate: bool) -> Transition {
        let from = self.state;
        self.state = if operate {
            OperatorState::Operating
        } else {
            OperatorState::Available
        };
        Transition {
            from,
            to: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_available() {
        assert_eq!(StateMachine::new().state(), OperatorState::Available);
        assert_eq!(StateMachine::default().state(), OperatorState::Available);
    }

    #[test]
    fn arm_release_cycle() {
        let mut sm = StateMachine::new();
        let t = sm.request(true);
        assert!(t.changed());
        assert!(sm.is_operating());
        let t = sm.request(true);
        assert!(!t.changed());
        assert_eq!(t.to, OperatorState::Operating);
        let t = sm.request(false);
        assert_eq!(t.from, OperatorState::Operating);
        assert_eq!(t.to, OperatorState::Available);
        assert!(!sm.request(false).changed());
    }
}
