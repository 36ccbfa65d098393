//! Servo homing cycle.
//!
//! Every homing period the servo is driven to zero, held there for the
//! hold time, then restored to the angle computed from the voltage sampled
//! at the start of the cycle.
//!
//! The cycle is a two-state machine polled once per scheduler tick, so the
//! hold never stalls the loop:
//!
//! ```text
//!   Idle ──poll──▶ Holding { target, until } ──poll (now ≥ until)──▶ Idle
//!         sample,               │                 command target
//!         command 0             └──poll (now < until): Pending
//! ```

use log::debug;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::SystemConfig;
use crate::control::mapper::map_to_position;
use crate::sensors::voltage;

/// Zero reference the servo is homed to.
pub const HOME_POSITION: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingState {
    Idle,
    Holding { target: i32, until_ms: u64 },
}

/// Result of one [`HomingTask::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingPoll {
    /// Servo commanded to zero; `target` captured for restore.
    Started { target: i32 },
    /// Still holding at zero.
    Holding,
    /// Servo restored to `target`; the cycle is over.
    Restored { target: i32 },
}

pub struct HomingTask {
    state: HomingState,
}

impl Default for HomingTask {
    fn default() -> Self {
        Self::new()
    }
}

impl HomingTask {
    pub fn new() -> Self {
        Self {
            state: HomingState::Idle,
        }
    }

    pub fn state(&self) -> HomingState {
        self.state
    }

    /// `true` while the servo is parked at zero.
    pub fn is_holding(&self) -> bool {
        matches!(self.state, HomingState::Holding { .. })
    }

    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        cfg: &SystemConfig,
    ) -> HomingPoll {
        match self.state {
            HomingState::Idle => {
                let v = voltage::sample(hw, cfg);
                let target = map_to_position(v, cfg);
                hw.set_position(HOME_POSITION);
                debug!("Homing: reset to {} deg (target {} deg)", HOME_POSITION, target);
                self.state = HomingState::Holding {
                    target,
                    until_ms: now_ms + u64::from(cfg.homing_hold_ms),
                };
                HomingPoll::Started { target }
            }
            HomingState::Holding { target, until_ms } => {
                if now_ms < until_ms {
                    return HomingPoll::Holding;
                }
                hw.set_position(target);
                debug!("Homing: return to target angle {} deg", target);
                self.state = HomingState::Idle;
                HomingPoll::Restored { target }
            }
        }
    }
}
