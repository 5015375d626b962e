//! Native collider schema: how each system's capsule is stored on a component.

use capsync_convert::{Axis, CapsuleParams, CapsuleParamsA, CapsuleParamsB, System, Vec3};
use capsync_scene::{Component, SceneObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accessor::{read_center_or_zero, value_to_vec3, vec3_to_value, CenterAccessor};
use crate::error::{HostError, Result};

/// Which capsule systems are attached to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// No capsule collider.
    None,
    /// Only System A colliders.
    A,
    /// Only System B colliders.
    B,
    /// Colliders of both systems.
    Both,
}

/// Component type and field names for both capsule systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeSchema {
    /// Component type of System A capsules.
    pub a_component: String,
    /// System A start radius field.
    pub start_radius: String,
    /// System A end radius field.
    pub end_radius: String,
    /// System A half-length field.
    pub half_length: String,
    /// System A axis field.
    pub axis: String,

    /// Component type of System B capsules.
    pub b_component: String,
    /// System B size field.
    pub size: String,
    /// System B direction field.
    pub direction: String,
    /// System B aligned-on-center flag.
    pub aligned_on_center: String,
    /// System B reverse-direction flag.
    pub reverse_direction: String,
}

impl Default for NativeSchema {
    fn default() -> Self {
        Self {
            a_component: "CapsuleColliderA".to_string(),
            start_radius: "startRadius".to_string(),
            end_radius: "endRadius".to_string(),
            half_length: "halfLength".to_string(),
            axis: "axis".to_string(),
            b_component: "CapsuleColliderB".to_string(),
            size: "size".to_string(),
            direction: "direction".to_string(),
            aligned_on_center: "alignedOnCenter".to_string(),
            reverse_direction: "reverseDirection".to_string(),
        }
    }
}

impl NativeSchema {
    /// Component type name for `system`.
    pub fn component(&self, system: System) -> &str {
        match system {
            System::A => &self.a_component,
            System::B => &self.b_component,
        }
    }

    /// Classify `object` by the capsule systems it carries.
    pub fn detect(&self, object: &SceneObject) -> Detection {
        match (object.has(&self.a_component), object.has(&self.b_component)) {
            (false, false) => Detection::None,
            (true, false) => Detection::A,
            (false, true) => Detection::B,
            (true, true) => Detection::Both,
        }
    }

    /// Read a System A capsule from `component`.
    pub fn read_a<C: CenterAccessor>(
        &self,
        component: &Component,
        accessor: &C,
        object: &str,
    ) -> Result<CapsuleParamsA> {
        Ok(CapsuleParamsA {
            start_radius: number(component, &self.start_radius, object)?,
            end_radius: number(component, &self.end_radius, object)?,
            half_length: number(component, &self.half_length, object)?,
            axis: axis(component, &self.axis, object)?,
            center: read_center_or_zero(accessor, component, object),
        })
    }

    /// Read a System B capsule from `component`.
    ///
    /// Missing flags default to their canonical values.
    pub fn read_b<C: CenterAccessor>(
        &self,
        component: &Component,
        accessor: &C,
        object: &str,
    ) -> Result<CapsuleParamsB> {
        let size = match component.get(&self.size) {
            Some(value) => value_to_vec3(&self.size, value).map_err(|e| HostError::Field {
                object: object.to_string(),
                field: self.size.clone(),
                reason: e.to_string(),
            })?,
            None => return Err(missing(object, &self.size)),
        };
        Ok(CapsuleParamsB {
            size,
            direction: axis(component, &self.direction, object)?,
            aligned_on_center: flag(component, &self.aligned_on_center, true, object)?,
            reverse_direction: flag(component, &self.reverse_direction, false, object)?,
            center: read_center_or_zero(accessor, component, object),
        })
    }

    /// Read either system's capsule, tagged by `system`.
    pub fn read<C: CenterAccessor>(
        &self,
        system: System,
        component: &Component,
        accessor: &C,
        object: &str,
    ) -> Result<CapsuleParams> {
        match system {
            System::A => self.read_a(component, accessor, object).map(CapsuleParams::A),
            System::B => self.read_b(component, accessor, object).map(CapsuleParams::B),
        }
    }

    /// Build a new System A component holding `params`.
    pub fn build_a<C: CenterAccessor>(
        &self,
        params: &CapsuleParamsA,
        accessor: &C,
        object: &str,
    ) -> Result<Component> {
        let mut component = Component::new(self.a_component.clone())
            .with(self.start_radius.clone(), params.start_radius)
            .with(self.end_radius.clone(), params.end_radius)
            .with(self.half_length.clone(), params.half_length)
            .with(self.axis.clone(), params.axis.index());
        write_center(accessor, &mut component, params.center, object)?;
        Ok(component)
    }

    /// Build a new System B component holding `params`.
    pub fn build_b<C: CenterAccessor>(
        &self,
        params: &CapsuleParamsB,
        accessor: &C,
        object: &str,
    ) -> Result<Component> {
        let mut component = Component::new(self.b_component.clone())
            .with(self.size.clone(), vec3_to_value(&params.size))
            .with(self.direction.clone(), params.direction.index())
            .with(self.aligned_on_center.clone(), params.aligned_on_center)
            .with(self.reverse_direction.clone(), params.reverse_direction);
        write_center(accessor, &mut component, params.center, object)?;
        Ok(component)
    }

    /// Build a component for whichever system `params` belongs to.
    pub fn build<C: CenterAccessor>(
        &self,
        params: &CapsuleParams,
        accessor: &C,
        object: &str,
    ) -> Result<Component> {
        match params {
            CapsuleParams::A(a) => self.build_a(a, accessor, object),
            CapsuleParams::B(b) => self.build_b(b, accessor, object),
        }
    }
}

fn write_center<C: CenterAccessor>(
    accessor: &C,
    component: &mut Component,
    center: Vec3,
    object: &str,
) -> Result<()> {
    accessor
        .set(component, center)
        .map_err(|source| HostError::Access {
            object: object.to_string(),
            source,
        })
}

fn missing(object: &str, field: &str) -> HostError {
    HostError::Field {
        object: object.to_string(),
        field: field.to_string(),
        reason: "is missing".to_string(),
    }
}

fn wrong_type(object: &str, field: &str, expected: &str) -> HostError {
    HostError::Field {
        object: object.to_string(),
        field: field.to_string(),
        reason: format!("is not {expected}"),
    }
}

fn number(component: &Component, field: &str, object: &str) -> Result<f64> {
    component
        .get(field)
        .ok_or_else(|| missing(object, field))?
        .as_f64()
        .ok_or_else(|| wrong_type(object, field, "a number"))
}

fn flag(component: &Component, field: &str, default: bool, object: &str) -> Result<bool> {
    match component.get(field) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| wrong_type(object, field, "a boolean")),
    }
}

// Engines store the axis either as an integer discriminant or by name.
fn axis(component: &Component, field: &str, object: &str) -> Result<Axis> {
    match component.get(field) {
        None => Err(missing(object, field)),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Axis::from_index)
            .ok_or_else(|| wrong_type(object, field, "an integer axis")),
        Some(Value::String(s)) => s.parse::<Axis>().map_err(|e| HostError::Field {
            object: object.to_string(),
            field: field.to_string(),
            reason: e.to_string(),
        }),
        Some(_) => Err(wrong_type(object, field, "an axis")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::CandidateFields;
    use serde_json::json;

    fn a_component() -> Component {
        Component::new("CapsuleColliderA")
            .with("startRadius", 0.1)
            .with("endRadius", 0.05)
            .with("halfLength", 0.15)
            .with("axis", 1)
            .with("m_Center", json!([0.0, 0.5, 0.0]))
    }

    #[test]
    fn test_read_a() {
        let schema = NativeSchema::default();
        let a = schema
            .read_a(&a_component(), &CandidateFields::default(), "Arm")
            .unwrap();
        assert_eq!(a.start_radius, 0.1);
        assert_eq!(a.end_radius, 0.05);
        assert_eq!(a.half_length, 0.15);
        assert_eq!(a.axis, Axis::Y);
        assert_eq!(a.center, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_axis_by_name_and_out_of_range() {
        let schema = NativeSchema::default();
        let acc = CandidateFields::default();
        let named = a_component().with("axis", "z");
        assert_eq!(schema.read_a(&named, &acc, "o").unwrap().axis, Axis::Z);
        let odd = a_component().with("axis", 7);
        assert_eq!(schema.read_a(&odd, &acc, "o").unwrap().axis, Axis::X);
        let bad = a_component().with("axis", "w");
        assert!(matches!(
            schema.read_a(&bad, &acc, "o"),
            Err(HostError::Field { .. })
        ));
    }

    #[test]
    fn test_missing_field() {
        let schema = NativeSchema::default();
        let mut c = a_component();
        c.fields.remove("halfLength");
        let err = schema
            .read_a(&c, &CandidateFields::default(), "Leg")
            .unwrap_err();
        assert_eq!(err.to_string(), "object Leg: field halfLength is missing");
    }

    #[test]
    fn test_read_b_defaults_flags() {
        let schema = NativeSchema::default();
        let c = Component::new("CapsuleColliderB")
            .with("size", json!({"x": 0.05, "y": 0.1, "z": 0.45}))
            .with("direction", "Y");
        let b = schema.read_b(&c, &CandidateFields::default(), "o").unwrap();
        assert!(b.aligned_on_center);
        assert!(!b.reverse_direction);
        assert_eq!(b.size, Vec3::new(0.05, 0.1, 0.45));
        assert_eq!(b.center, Vec3::zeros());
    }

    #[test]
    fn test_build_then_read() {
        let schema = NativeSchema::default();
        let acc = CandidateFields::default();
        let b = CapsuleParamsB::centered(
            Vec3::new(0.05, 0.1, 0.45),
            Axis::Y,
            Vec3::new(0.0, -0.025, 0.0),
        );
        let component = schema.build_b(&b, &acc, "o").unwrap();
        assert_eq!(component.kind, "CapsuleColliderB");
        assert_eq!(component.get("direction"), Some(&json!(1)));
        assert_eq!(component.get("center"), Some(&json!([0.0, -0.025, 0.0])));
        assert_eq!(schema.read_b(&component, &acc, "o").unwrap(), b);
    }

    #[test]
    fn test_detect() {
        let schema = NativeSchema::default();
        let mut obj = SceneObject::new("Spine");
        assert_eq!(schema.detect(&obj), Detection::None);
        obj.push_component(a_component());
        assert_eq!(schema.detect(&obj), Detection::A);
        obj.push_component(Component::new("CapsuleColliderB"));
        assert_eq!(schema.detect(&obj), Detection::Both);
        obj.remove_components("CapsuleColliderA");
        assert_eq!(schema.detect(&obj), Detection::B);
    }
}
