//! Conversion formulas between System A and System B.

use capsync_math::{axis_unit_vector, Vec3};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{CapsuleParams, CapsuleParamsA, CapsuleParamsB};

/// Floor applied to the half-length recovered from a System B record.
pub const MIN_HALF_LENGTH: f64 = 0.001;

/// Convert a System A capsule into System B.
///
/// The radii swap slots (`size.x` holds the end radius), the caps are
/// folded into `size.z`, and asymmetric capsules get their center shifted
/// by half the radius difference along the axis.
pub fn convert_a_to_b(input: &CapsuleParamsA) -> CapsuleParamsB {
    let size = Vec3::new(
        input.end_radius,
        input.start_radius,
        2.0 * input.half_length + input.start_radius + input.end_radius,
    );

    let mut center = input.center;
    if input.start_radius != input.end_radius {
        let offset = (input.end_radius - input.start_radius) / 2.0;
        center += axis_unit_vector(input.axis) * offset;
    }

    CapsuleParamsB::centered(size, input.axis, center)
}

/// Convert a System B capsule into System A.
///
/// Exact inverse of [`convert_a_to_b`] except that the recovered
/// half-length never drops below [`MIN_HALF_LENGTH`]. The
/// `aligned_on_center` and `reverse_direction` flags are not consulted;
/// the input is assumed to be in canonical form.
pub fn convert_b_to_a(input: &CapsuleParamsB) -> CapsuleParamsA {
    let size = input.size;
    let half_length = ((size.z - size.x - size.y) / 2.0).max(MIN_HALF_LENGTH);

    let mut center = input.center;
    if size.x != size.y {
        let offset = -(size.x - size.y) / 2.0;
        center += axis_unit_vector(input.direction) * offset;
    }

    CapsuleParamsA {
        start_radius: size.y,
        end_radius: size.x,
        half_length,
        axis: input.direction,
        center,
    }
}

/// Whether converting `input` to System A engages the half-length floor.
pub fn half_length_clamped(input: &CapsuleParamsB) -> bool {
    (input.size.z - input.size.x - input.size.y) / 2.0 < MIN_HALF_LENGTH
}

/// Convert a tagged record into the other system.
pub fn convert(input: &CapsuleParams) -> CapsuleParams {
    match input {
        CapsuleParams::A(a) => CapsuleParams::B(convert_a_to_b(a)),
        CapsuleParams::B(b) => CapsuleParams::A(convert_b_to_a(b)),
    }
}

/// Convert many records in parallel. Output order matches input order.
pub fn convert_all(inputs: &[CapsuleParams]) -> Vec<CapsuleParams> {
    inputs.par_iter().map(convert).collect()
}

/// Options for a [`Converter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Reject non-finite and negative inputs instead of propagating them.
    pub validate: bool,
}

/// Conversion entry point returning a `Result`.
///
/// Without validation this never fails; with validation it rejects
/// inputs outside the representable domain before converting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Converter that rejects invalid inputs.
    pub fn validating() -> Self {
        Self::new(ConvertOptions { validate: true })
    }

    /// The options this converter was built with.
    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Convert a tagged record into the other system.
    pub fn convert(&self, input: &CapsuleParams) -> Result<CapsuleParams> {
        if self.options.validate {
            input.check()?;
        }
        if let CapsuleParams::B(b) = input {
            if !b.is_canonical() {
                debug!(
                    "non-canonical System B flags (aligned_on_center={}, reverse_direction={}) treated as canonical",
                    b.aligned_on_center, b.reverse_direction
                );
            }
            if half_length_clamped(b) {
                debug!(
                    "size.z {} shorter than cap radii {} + {}, half-length floored to {}",
                    b.size.z, b.size.x, b.size.y, MIN_HALF_LENGTH
                );
            }
        }
        Ok(convert(input))
    }

    /// Convert many records in parallel. Each input gets its own result.
    pub fn convert_all(&self, inputs: &[CapsuleParams]) -> Vec<Result<CapsuleParams>> {
        inputs.par_iter().map(|input| self.convert(input)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use approx::assert_relative_eq;
    use capsync_math::Axis;

    fn capsule_a(r1: f64, r2: f64, h: f64, axis: Axis, center: Vec3) -> CapsuleParamsA {
        CapsuleParamsA {
            start_radius: r1,
            end_radius: r2,
            half_length: h,
            axis,
            center,
        }
    }

    #[test]
    fn test_scenario_y_axis() {
        let a = capsule_a(0.1, 0.05, 0.15, Axis::Y, Vec3::zeros());
        let b = convert_a_to_b(&a);

        assert_relative_eq!(b.size, Vec3::new(0.05, 0.1, 0.45), epsilon = 1e-12);
        assert_relative_eq!(b.center, Vec3::new(0.0, -0.025, 0.0), epsilon = 1e-12);
        assert_eq!(b.direction, Axis::Y);
        assert!(b.aligned_on_center);
        assert!(!b.reverse_direction);
    }

    #[test]
    fn test_radius_reversal() {
        for (r1, r2) in [(0.1, 0.2), (0.3, 0.3), (0.0, 1.5), (2.0, 0.0)] {
            let b = convert_a_to_b(&capsule_a(r1, r2, 0.5, Axis::X, Vec3::zeros()));
            assert_eq!(b.size.x, r2);
            assert_eq!(b.size.y, r1);
        }
    }

    #[test]
    fn test_length_expansion_is_exact() {
        for (r1, r2, h) in [(0.1, 0.05, 0.15), (0.0, 0.0, 1.0), (0.25, 0.75, 0.0)] {
            let b = convert_a_to_b(&capsule_a(r1, r2, h, Axis::Z, Vec3::zeros()));
            assert_eq!(b.size.z, 2.0 * h + r1 + r2);
        }
    }

    #[test]
    fn test_fixed_flags() {
        for axis in Axis::ALL {
            let b = convert_a_to_b(&capsule_a(0.2, 0.4, 1.0, axis, Vec3::new(1.0, 2.0, 3.0)));
            assert!(b.aligned_on_center);
            assert!(!b.reverse_direction);
            assert_eq!(b.direction, axis);
        }
    }

    #[test]
    fn test_center_offset_sign() {
        let origin = Vec3::new(0.5, -0.5, 2.0);
        for axis in Axis::ALL {
            let unit = axis.unit_vector();

            let grow = convert_a_to_b(&capsule_a(0.1, 0.3, 1.0, axis, origin));
            assert!((grow.center - origin).dot(&unit) > 0.0);

            let shrink = convert_a_to_b(&capsule_a(0.3, 0.1, 1.0, axis, origin));
            assert!((shrink.center - origin).dot(&unit) < 0.0);

            let even = convert_a_to_b(&capsule_a(0.2, 0.2, 1.0, axis, origin));
            assert_eq!(even.center, origin);
        }
    }

    #[test]
    fn test_offset_only_along_axis() {
        let b = convert_a_to_b(&capsule_a(0.1, 0.5, 1.0, Axis::Z, Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(b.center.x, 1.0);
        assert_eq!(b.center.y, 2.0);
        assert_relative_eq!(b.center.z, 3.2, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_symmetric() {
        let a = capsule_a(0.25, 0.25, 0.8, Axis::X, Vec3::new(0.1, 0.2, 0.3));
        let back = convert_b_to_a(&convert_a_to_b(&a));
        assert_eq!(back.start_radius, a.start_radius);
        assert_eq!(back.end_radius, a.end_radius);
        assert_eq!(back.center, a.center);
        assert_relative_eq!(back.half_length, a.half_length, epsilon = 1e-12);
        assert_eq!(back.axis, a.axis);
    }

    #[test]
    fn test_round_trip_asymmetric() {
        let cases = [
            capsule_a(0.1, 0.05, 0.15, Axis::Y, Vec3::zeros()),
            capsule_a(0.02, 0.3, 0.5, Axis::Z, Vec3::new(-1.0, 0.5, 4.0)),
            capsule_a(1.5, 0.25, 2.0, Axis::X, Vec3::new(3.0, 0.0, -2.0)),
        ];
        for a in cases {
            let b = convert_a_to_b(&a);
            assert!(b.size.z > b.size.x + b.size.y + 0.002);
            let back = convert_b_to_a(&b);
            assert_relative_eq!(back.center, a.center, epsilon = 1e-4);
            assert_relative_eq!(back.start_radius, a.start_radius, epsilon = 1e-4);
            assert_relative_eq!(back.end_radius, a.end_radius, epsilon = 1e-4);
            assert_relative_eq!(back.half_length, a.half_length, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_clamp_engages_for_short_size() {
        let b = CapsuleParamsB::centered(Vec3::new(0.3, 0.2, 0.4), Axis::Y, Vec3::zeros());
        assert!(half_length_clamped(&b));
        let a = convert_b_to_a(&b);
        assert_eq!(a.half_length, MIN_HALF_LENGTH);
        assert_eq!(a.start_radius, 0.2);
        assert_eq!(a.end_radius, 0.3);
    }

    #[test]
    fn test_clamp_not_engaged_for_long_size() {
        let b = CapsuleParamsB::centered(Vec3::new(0.1, 0.1, 1.2), Axis::Y, Vec3::zeros());
        assert!(!half_length_clamped(&b));
        assert_relative_eq!(convert_b_to_a(&b).half_length, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_b_to_a_ignores_flags() {
        let mut b = CapsuleParamsB::centered(Vec3::new(0.1, 0.2, 1.0), Axis::X, Vec3::zeros());
        let canonical = convert_b_to_a(&b);
        b.aligned_on_center = false;
        b.reverse_direction = true;
        assert_eq!(convert_b_to_a(&b), canonical);
    }

    #[test]
    fn test_b_to_a_center_offset() {
        // size.x is System A's end radius, so x > y moves the center backwards.
        let b = CapsuleParamsB::centered(Vec3::new(0.3, 0.1, 2.0), Axis::X, Vec3::zeros());
        let a = convert_b_to_a(&b);
        assert_relative_eq!(a.center, Vec3::new(-0.1, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_dispatch() {
        let a = capsule_a(0.1, 0.2, 0.5, Axis::Z, Vec3::zeros());
        let converted = convert(&CapsuleParams::A(a));
        assert_eq!(converted, CapsuleParams::B(convert_a_to_b(&a)));

        let back = convert(&converted);
        assert_eq!(back.system(), crate::System::A);
    }

    #[test]
    fn test_convert_all_preserves_order() {
        let inputs: Vec<CapsuleParams> = (0..64)
            .map(|i| {
                let r = 0.01 * (i + 1) as f64;
                if i % 2 == 0 {
                    CapsuleParams::A(capsule_a(r, 2.0 * r, 1.0, Axis::Y, Vec3::zeros()))
                } else {
                    CapsuleParams::B(CapsuleParamsB::centered(
                        Vec3::new(r, r, 1.0),
                        Axis::Z,
                        Vec3::zeros(),
                    ))
                }
            })
            .collect();

        let outputs = convert_all(&inputs);
        assert_eq!(outputs.len(), inputs.len());
        for (input, output) in inputs.iter().zip(&outputs) {
            assert_eq!(*output, convert(input));
        }
    }

    #[test]
    fn test_degenerate_inputs_propagate() {
        let b = convert_a_to_b(&capsule_a(-0.1, 0.0, 0.0, Axis::X, Vec3::zeros()));
        assert_eq!(b.size.y, -0.1);
        assert_relative_eq!(b.size.z, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_validating_converter() {
        let converter = Converter::validating();
        let ok = capsule_a(0.1, 0.05, 0.15, Axis::Y, Vec3::zeros());
        assert!(converter.convert(&CapsuleParams::A(ok)).is_ok());

        let negative = capsule_a(0.1, 0.05, -0.15, Axis::Y, Vec3::zeros());
        assert_eq!(
            converter.convert(&CapsuleParams::A(negative)),
            Err(ConvertError::Negative {
                field: "half_length",
                value: -0.15
            })
        );

        let nan = CapsuleParamsB::centered(Vec3::new(f64::NAN, 0.1, 1.0), Axis::Y, Vec3::zeros());
        assert_eq!(
            converter.convert(&CapsuleParams::B(nan)),
            Err(ConvertError::NonFinite { field: "size" })
        );

        // Compressed size is not an error; the clamp handles it.
        let short = CapsuleParamsB::centered(Vec3::new(0.5, 0.5, 0.1), Axis::Y, Vec3::zeros());
        assert!(converter.convert(&CapsuleParams::B(short)).is_ok());
    }

    #[test]
    fn test_lenient_converter_accepts_everything() {
        let converter = Converter::default();
        assert!(!converter.options().validate);
        let negative = capsule_a(-1.0, -1.0, -1.0, Axis::Y, Vec3::zeros());
        let negative = CapsuleParams::A(negative);
        assert!(converter.convert(&negative).is_ok());

        let results = converter.convert_all(&[negative, negative]);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}
