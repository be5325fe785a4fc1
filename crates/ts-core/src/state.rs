//! Agent pose and kinematic snapshot.

use std::fmt;

/// One agent's physical state at an instant.
///
/// Positions are in metres in the building frame, `yaw` in radians
/// (counter-clockwise from +x).  `velocity` is the planar velocity applied
/// during the last tick, or `None` while the agent is idle.
///
/// `ModelState` has no identity beyond value equality.  The simulation driver
/// owns one per agent and hands it to behavior ticks by `&mut`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelState {
    pub x:        f64,
    pub y:        f64,
    pub z:        f64,
    pub yaw:      f64,
    pub velocity: Option<[f64; 2]>,
}

impl ModelState {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self { x, y, z, yaw, velocity: None }
    }

    /// Idle state at `(x, y)` on the ground plane, facing +x.
    #[inline]
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    /// Euclidean distance in 3-D.
    pub fn distance_to(&self, other: &ModelState) -> f64 {
        let dz = other.z - self.z;
        (self.planar_distance_to(other).powi(2) + dz * dz).sqrt()
    }

    /// Distance in the x/y plane, ignoring elevation.
    #[inline]
    pub fn planar_distance_to(&self, other: &ModelState) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Heading (radians) from `self` toward `other`.
    ///
    /// Returns the current `yaw` when the two positions coincide so a
    /// stationary agent never snaps to an arbitrary angle.
    pub fn heading_to(&self, other: &ModelState) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            self.yaw
        } else {
            dy.atan2(dx)
        }
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3}) yaw {:.3}", self.x, self.y, self.z, self.yaw)
    }
}
