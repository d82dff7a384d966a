use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Raw event delivered by a device-orientation sensor.
///
/// Every field is optional. Hosts omit or null out angles they cannot
/// measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    /// Rotation about the z axis (degrees).
    #[serde(default)]
    pub alpha: Option<f64>,
    /// Rotation about the x axis (degrees).
    #[serde(default)]
    pub beta: Option<f64>,
    /// Rotation about the y axis (degrees).
    #[serde(default)]
    pub gamma: Option<f64>,
}

impl SensorEvent {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        }
    }
}

/// Device attitude as three rotation angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationReading {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl OrientationReading {
    pub const ZERO: Self = Self {
        alpha: 0.0,
        beta: 0.0,
        gamma: 0.0,
    };

    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Build a reading from a sensor event.
    ///
    /// Falsy fields (missing, zero, NaN) all read as 0, so a genuine zero
    /// angle cannot be told apart from an absent one.
    pub fn from_event(event: &SensorEvent) -> Self {
        Self {
            alpha: or_zero(event.alpha),
            beta: or_zero(event.beta),
            gamma: or_zero(event.gamma),
        }
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.alpha, self.beta, self.gamma)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Rotation described by this reading.
    ///
    /// Uses the DeviceOrientation convention: intrinsic Z-X'-Y'' with alpha
    /// about z, beta about x and gamma about y.
    pub fn to_quat(self) -> DQuat {
        DQuat::from_euler(
            EulerRot::ZXY,
            self.alpha.to_radians(),
            self.beta.to_radians(),
            self.gamma.to_radians(),
        )
    }
}

impl Sub for OrientationReading {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_dvec3(self.to_dvec3() - rhs.to_dvec3())
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => 0.0,
    }
}

/// Published value: the raw reading and its offset from the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationState {
    pub absolute: OrientationReading,
    pub relative: OrientationReading,
}

/// Whether any sensor event has reached the store yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    Uninitialized,
    Tracking,
}
