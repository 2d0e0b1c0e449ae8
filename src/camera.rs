use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Front,
    Back,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

/// Device capability consumed by the controller. Pixel data never flows
/// through here; detection is delegated to a [`crate::detector::Detector`].
pub trait Camera: Send {
    fn power_on(&mut self) -> Result<(), CameraError>;
    fn power_off(&mut self);
    fn set_facing(&mut self, facing: Facing);
}

/// In-memory camera used by the console binary and tests.
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    pub permission_granted: bool,
    pub powered: bool,
    pub facing: Facing,
}

impl SimulatedCamera {
    pub fn new(permission_granted: bool) -> Self {
        Self { permission_granted, powered: false, facing: Facing::default() }
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Camera for SimulatedCamera {
    fn power_on(&mut self) -> Result<(), CameraError> {
        if !self.permission_granted {
            return Err(CameraError::PermissionDenied);
        }
        self.powered = true;
        debug!("simulated camera powered on ({:?})", self.facing);
        Ok(())
    }

    fn power_off(&mut self) {
        self.powered = false;
    }

    fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_flips_both_ways() {
        assert_eq!(Facing::default(), Facing::Front);
        assert_eq!(Facing::Front.flipped(), Facing::Back);
        assert_eq!(Facing::Back.flipped(), Facing::Front);
    }

    #[test]
    fn refuses_power_without_permission() {
        let mut cam = SimulatedCamera::new(false);
        assert_eq!(cam.power_on(), Err(CameraError::PermissionDenied));
        assert!(!cam.powered);
    }
}
