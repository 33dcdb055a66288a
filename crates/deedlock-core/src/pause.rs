//! # Pause Switch
//!
//! A global stop for a component's mutating surface. While paused, every
//! state-changing entry point of the owning component fails closed; read
//! paths keep working.

use serde::{Deserialize, Serialize};

use crate::error::PauseError;

/// A two-position pause switch.
///
/// Pausing an already-paused switch fails with [`PauseError::Paused`];
/// unpausing an active switch fails with [`PauseError::NotPaused`].
/// Role gating of who may flip the switch belongs to the owning
/// component; the switch itself only tracks position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseSwitch {
    /// Create a switch in the active (unpaused) position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the switch is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fail if the switch is paused. Called by every mutating entry point.
    pub fn ensure_active(&self) -> Result<(), PauseError> {
        if self.paused {
            Err(PauseError::Paused)
        } else {
            Ok(())
        }
    }

    /// Flip to paused.
    pub fn pause(&mut self) -> Result<(), PauseError> {
        if self.paused {
            return Err(PauseError::Paused);
        }
        self.paused = true;
        Ok(())
    }

    /// Flip back to active.
    pub fn unpause(&mut self) -> Result<(), PauseError> {
        if !self.paused {
            return Err(PauseError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_active() {
        let switch = PauseSwitch::new();
        assert!(!switch.is_paused());
        assert!(switch.ensure_active().is_ok());
    }

    #[test]
    fn test_pause_blocks_mutations() {
        let mut switch = PauseSwitch::new();
        switch.pause().unwrap();
        assert!(switch.is_paused());
        assert_eq!(switch.ensure_active(), Err(PauseError::Paused));
    }

    #[test]
    fn test_unpause_restores() {
        let mut switch = PauseSwitch::new();
        switch.pause().unwrap();
        switch.unpause().unwrap();
        assert!(switch.ensure_active().is_ok());
    }

    #[test]
    fn test_double_pause_rejected() {
        let mut switch = PauseSwitch::new();
        switch.pause().unwrap();
        assert_eq!(switch.pause(), Err(PauseError::Paused));
    }

    #[test]
    fn test_unpause_while_active_rejected() {
        let mut switch = PauseSwitch::new();
        assert_eq!(switch.unpause(), Err(PauseError::NotPaused));
    }
}
