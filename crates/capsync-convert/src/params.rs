//! Parameter records for the two capsule systems.

use std::fmt;

use capsync_math::{Axis, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Which parameterization a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum System {
    /// Per-cap radii plus cylinder half-length.
    A,
    /// Size vector with the caps folded into the length.
    B,
}

impl System {
    /// The opposite system.
    pub fn other(self) -> Self {
        match self {
            System::A => System::B,
            System::B => System::A,
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            System::A => f.write_str("A"),
            System::B => f.write_str("B"),
        }
    }
}

/// System A capsule: per-cap radii and cylinder half-length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleParamsA {
    /// Radius of the start cap.
    pub start_radius: f64,
    /// Radius of the end cap.
    pub end_radius: f64,
    /// Half the length of the cylindrical section, caps excluded.
    pub half_length: f64,
    /// Axis the capsule extends along.
    pub axis: Axis,
    /// Local-space offset of the geometric center.
    pub center: Vec3,
}

impl CapsuleParamsA {
    /// Total collision length along the axis, caps included.
    pub fn total_length(&self) -> f64 {
        2.0 * self.half_length + self.start_radius + self.end_radius
    }

    pub(crate) fn check(&self) -> Result<()> {
        check_finite("start_radius", self.start_radius)?;
        check_finite("end_radius", self.end_radius)?;
        check_finite("half_length", self.half_length)?;
        check_vec("center", &self.center)?;
        check_non_negative("start_radius", self.start_radius)?;
        check_non_negative("end_radius", self.end_radius)?;
        check_non_negative("half_length", self.half_length)
    }
}

/// System B capsule: `size = (radius, radius, total length)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleParamsB {
    /// `x` and `y` are the two cap radii, `z` the total length.
    pub size: Vec3,
    /// Axis the capsule extends along.
    pub direction: Axis,
    /// Center is the volume centroid rather than an endpoint.
    pub aligned_on_center: bool,
    /// Axis is flipped.
    pub reverse_direction: bool,
    /// Local-space center offset in System B's convention.
    pub center: Vec3,
}

impl CapsuleParamsB {
    /// Record with the flags System A geometry always maps to:
    /// centered on the centroid, no axis flip.
    pub fn centered(size: Vec3, direction: Axis, center: Vec3) -> Self {
        Self {
            size,
            direction,
            aligned_on_center: true,
            reverse_direction: false,
            center,
        }
    }

    /// Whether the flags hold their canonical values.
    pub fn is_canonical(&self) -> bool {
        self.aligned_on_center && !self.reverse_direction
    }

    pub(crate) fn check(&self) -> Result<()> {
        check_vec("size", &self.size)?;
        check_vec("center", &self.center)?;
        check_non_negative("size.x", self.size.x)?;
        check_non_negative("size.y", self.size.y)?;
        check_non_negative("size.z", self.size.z)
    }
}

/// A capsule record tagged with its origin system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "system")]
pub enum CapsuleParams {
    /// System A record.
    A(CapsuleParamsA),
    /// System B record.
    B(CapsuleParamsB),
}

impl CapsuleParams {
    /// The system this record belongs to.
    pub fn system(&self) -> System {
        match self {
            CapsuleParams::A(_) => System::A,
            CapsuleParams::B(_) => System::B,
        }
    }

    /// Axis of the capsule, whichever system it is in.
    pub fn axis(&self) -> Axis {
        match self {
            CapsuleParams::A(a) => a.axis,
            CapsuleParams::B(b) => b.direction,
        }
    }

    /// Center offset, whichever system it is in.
    pub fn center(&self) -> Vec3 {
        match self {
            CapsuleParams::A(a) => a.center,
            CapsuleParams::B(b) => b.center,
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        match self {
            CapsuleParams::A(a) => a.check(),
            CapsuleParams::B(b) => b.check(),
        }
    }
}

impl From<CapsuleParamsA> for CapsuleParams {
    fn from(a: CapsuleParamsA) -> Self {
        CapsuleParams::A(a)
    }
}

impl From<CapsuleParamsB> for CapsuleParams {
    fn from(b: CapsuleParamsB) -> Self {
        CapsuleParams::B(b)
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConvertError::NonFinite { field })
    }
}

fn check_vec(field: &'static str, v: &Vec3) -> Result<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ConvertError::NonFinite { field })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value < 0.0 {
        Err(ConvertError::Negative { field, value })
    } else {
        Ok(())
    }
}
