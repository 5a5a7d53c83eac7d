use crate::constants::{
    FLASH_ON_AFTER_SECS, FLASH_PERIOD_SECS, FLEE_WARNING_WINDOW_SECS, TIMER_EPSILON,
};
use crate::types::AdversaryState;

/// Adversary life-cycle. Each timer lives in the variant that owns it, so a
/// state change always starts from a fresh timer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lifecycle {
    Pursuing,
    Fleeing {
        elapsed: f64,
        duration: f64,
        flash: f64,
    },
    Captured,
    Penalized {
        elapsed: f64,
    },
}

impl Lifecycle {
    pub fn state(&self) -> AdversaryState {
        match self {
            Self::Pursuing => AdversaryState::Pursuing,
            Self::Fleeing { .. } => AdversaryState::Fleeing,
            Self::Captured => AdversaryState::Captured,
            Self::Penalized { .. } => AdversaryState::Penalized,
        }
    }

    /// Power pickup. Restarts the countdown when already fleeing; captured
    /// and penalized agents are unaffected.
    pub fn frightened(self, duration: f64) -> Self {
        match self {
            Self::Pursuing | Self::Fleeing { .. } => Self::Fleeing {
                elapsed: 0.0,
                duration,
                flash: 0.0,
            },
            other => other,
        }
    }

    /// Only a fleeing agent can be captured.
    pub fn captured(self) -> Self {
        match self {
            Self::Fleeing { .. } => Self::Captured,
            other => other,
        }
    }

    pub fn arrived_home(self) -> Self {
        match self {
            Self::Captured => Self::Penalized { elapsed: 0.0 },
            other => other,
        }
    }

    /// Advances the timed states. Fleeing and penalized both expire back
    /// into pursuit.
    pub fn tick(self, dt: f64, penalty_duration: f64) -> Self {
        match self {
            Self::Fleeing {
                elapsed,
                duration,
                flash,
            } => {
                let elapsed = elapsed + dt;
                if elapsed + TIMER_EPSILON >= duration {
                    return Self::Pursuing;
                }
                Self::Fleeing {
                    elapsed,
                    duration,
                    flash: flash + dt,
                }
            }
            Self::Penalized { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed + TIMER_EPSILON >= penalty_duration {
                    return Self::Pursuing;
                }
                Self::Penalized { elapsed }
            }
            other => other,
        }
    }

    /// Whether a proximity collision with the player counts.
    pub fn interactable(&self) -> bool {
        matches!(self, Self::Pursuing | Self::Fleeing { .. })
    }

    pub fn is_flashing(&self) -> bool {
        match self {
            Self::Fleeing {
                elapsed,
                duration,
                flash,
            } => {
                duration - elapsed <= FLEE_WARNING_WINDOW_SECS
                    && flash % FLASH_PERIOD_SECS >= FLASH_ON_AFTER_SECS
            }
            _ => false,
        }
    }

    pub fn flee_elapsed(&self) -> Option<f64> {
        match self {
            Self::Fleeing { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }

    pub fn penalty_elapsed(&self) -> Option<f64> {
        match self {
            Self::Penalized { elapsed } => Some(*elapsed),
            _ => None,
        }
    }
}
