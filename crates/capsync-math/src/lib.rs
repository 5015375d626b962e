#![warn(missing_docs)]

//! Math types for capsync.
//!
//! Thin wrappers around nalgebra providing the vector type, the capsule
//! axis enumeration and tolerance constants shared by the converter and
//! the host adapter.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A vector in 3D local space.
pub type Vec3 = Vector3<f64>;

/// Local coordinate axis along which a capsule extends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Local X (right).
    #[default]
    X,
    /// Local Y (up).
    Y,
    /// Local Z (forward).
    Z,
}

impl Axis {
    /// All axes in discriminant order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Map a host-engine integer discriminant (0, 1, 2) to an axis.
    ///
    /// Any other value falls back to [`Axis::X`].
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Axis::Y,
            2 => Axis::Z,
            _ => Axis::X,
        }
    }

    /// Integer discriminant of this axis.
    pub fn index(self) -> i64 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit basis vector for this axis.
    pub fn unit_vector(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }
}

/// Unit basis vector for `axis`.
pub fn axis_unit_vector(axis: Axis) -> Vec3 {
    axis.unit_vector()
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(name)
    }
}

/// Error returned when an axis name cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid axis {0:?}, expected X, Y, Z or 0, 1, 2")]
pub struct ParseAxisError(pub String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "0" => Ok(Axis::X),
            "y" | "1" => Ok(Axis::Y),
            "z" | "2" => Ok(Axis::Z),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

/// Error returned when a vector literal cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid vector {0:?}, expected three comma-separated numbers")]
pub struct ParseVecError(pub String);

/// Parse `"x,y,z"` into a [`Vec3`].
pub fn parse_vec3(s: &str) -> Result<Vec3, ParseVecError> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| ParseVecError(s.to_string()))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(ParseVecError(s.to_string())),
    }
}

/// Tolerance constants for comparing converted geometry.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in scene units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-6 linear).
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Check if two vectors coincide within tolerance.
    pub fn vectors_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two scalars are equal within tolerance.
    pub fn scalars_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.linear
    }

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vectors() {
        assert_eq!(axis_unit_vector(Axis::X), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(axis_unit_vector(Axis::Y), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(axis_unit_vector(Axis::Z), Vec3::new(0.0, 0.0, 1.0));
        for axis in Axis::ALL {
            assert!((axis.unit_vector().norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_from_index_falls_back_to_x() {
        assert_eq!(Axis::from_index(0), Axis::X);
        assert_eq!(Axis::from_index(1), Axis::Y);
        assert_eq!(Axis::from_index(2), Axis::Z);
        assert_eq!(Axis::from_index(3), Axis::X);
        assert_eq!(Axis::from_index(-1), Axis::X);
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index()), axis);
        }
    }

    #[test]
    fn test_parse_axis() {
        assert_eq!("y".parse::<Axis>().unwrap(), Axis::Y);
        assert_eq!(" Z ".parse::<Axis>().unwrap(), Axis::Z);
        assert_eq!("0".parse::<Axis>().unwrap(), Axis::X);
        assert!("w".parse::<Axis>().is_err());
    }

    #[test]
    fn test_axis_serde_names() {
        let json = serde_json::to_string(&Axis::Z).unwrap();
        assert_eq!(json, "\"Z\"");
        let axis: Axis = serde_json::from_str("\"Y\"").unwrap();
        assert_eq!(axis, Axis::Y);
    }

    #[test]
    fn test_parse_vec3() {
        let v = parse_vec3("1, -2.5,3").unwrap();
        approx::assert_relative_eq!(v, Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,a").is_err());
    }

    #[test]
    fn test_tolerance() {
        let tol = Tolerance::DEFAULT;
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.vectors_equal(&a, &b));
        assert!(!tol.vectors_equal(&a, &Vec3::new(1.001, 2.0, 3.0)));
        assert!(tol.is_zero(1e-9));
        assert!(!tol.scalars_equal(0.1, 0.2));
    }
}
