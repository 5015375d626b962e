#![warn(missing_docs)]

//! Capsule collider geometry conversion.
//!
//! Two capsule parameterizations describe the same collision volume:
//!
//! - **System A** stores per-cap radii and the half-length of the
//!   cylindrical section, excluding the caps.
//! - **System B** stores a size vector `(radius, radius, total length)`
//!   with the caps folded into the length.
//!
//! This crate converts between them, including the center shift needed
//! when the cap radii differ. All conversions are pure functions over
//! plain value records.
//!
//! # Example
//!
//! ```
//! use capsync_convert::{convert_a_to_b, Axis, CapsuleParamsA, Vec3};
//!
//! let a = CapsuleParamsA {
//!     start_radius: 0.1,
//!     end_radius: 0.05,
//!     half_length: 0.15,
//!     axis: Axis::Y,
//!     center: Vec3::zeros(),
//! };
//! let b = convert_a_to_b(&a);
//! assert_eq!(b.size.x, 0.05);
//! assert!(b.aligned_on_center);
//! ```

mod convert;
mod error;
mod params;

pub use capsync_math::{axis_unit_vector, Axis, Tolerance, Vec3};
pub use convert::{
    convert, convert_a_to_b, convert_all, convert_b_to_a, half_length_clamped, ConvertOptions,
    Converter, MIN_HALF_LENGTH,
};
pub use error::{ConvertError, Result};
pub use params::{CapsuleParams, CapsuleParamsA, CapsuleParamsB, System};
