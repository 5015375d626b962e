//! Center field access.
//!
//! Host engines often keep a collider's center out of the public API.
//! The adapter reaches it through a [`CenterAccessor`], which reads and
//! writes the serialized property directly. Accessors can be chained so
//! several strategies are tried in turn.

use capsync_math::Vec3;
use capsync_scene::Component;
use log::warn;
use serde_json::{json, Value};

use crate::error::AccessError;

/// Capability for reading and writing a component's center.
pub trait CenterAccessor {
    /// Read the center of `component`.
    fn get(&self, component: &Component) -> Result<Vec3, AccessError>;

    /// Write `center` into `component`.
    fn set(&self, component: &mut Component, center: Vec3) -> Result<(), AccessError>;

    /// Try `self` first, then `secondary`.
    fn or<S: CenterAccessor>(self, secondary: S) -> Fallback<Self, S>
    where
        Self: Sized,
    {
        Fallback {
            primary: self,
            secondary,
        }
    }
}

impl<T: CenterAccessor + ?Sized> CenterAccessor for &T {
    fn get(&self, component: &Component) -> Result<Vec3, AccessError> {
        (**self).get(component)
    }

    fn set(&self, component: &mut Component, center: Vec3) -> Result<(), AccessError> {
        (**self).set(component, center)
    }
}

impl<T: CenterAccessor + ?Sized> CenterAccessor for Box<T> {
    fn get(&self, component: &Component) -> Result<Vec3, AccessError> {
        (**self).get(component)
    }

    fn set(&self, component: &mut Component, center: Vec3) -> Result<(), AccessError> {
        (**self).set(component, center)
    }
}

/// Read or write a single named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    field: String,
}

impl FieldAccessor {
    /// Accessor for the field called `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// The field this accessor targets.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl CenterAccessor for FieldAccessor {
    fn get(&self, component: &Component) -> Result<Vec3, AccessError> {
        match component.get(&self.field) {
            Some(value) => value_to_vec3(&self.field, value),
            None => Err(AccessError::NotFound {
                tried: vec![self.field.clone()],
            }),
        }
    }

    fn set(&self, component: &mut Component, center: Vec3) -> Result<(), AccessError> {
        let value = match component.get(&self.field) {
            Some(existing) => vec3_like(existing, &center),
            None => vec3_to_value(&center),
        };
        component.set(self.field.clone(), value);
        Ok(())
    }
}

/// Try a list of field names in order.
///
/// Reads use the first field present on the component. Writes go to the
/// first field present, or to the first candidate when none exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFields {
    fields: Vec<String>,
}

impl CandidateFields {
    /// Accessor over `fields`, tried in order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The candidate field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Default for CandidateFields {
    fn default() -> Self {
        Self::new(["center", "m_Center", "_center"])
    }
}

impl CenterAccessor for CandidateFields {
    fn get(&self, component: &Component) -> Result<Vec3, AccessError> {
        for field in &self.fields {
            if let Some(value) = component.get(field) {
                return value_to_vec3(field, value);
            }
        }
        Err(AccessError::NotFound {
            tried: self.fields.clone(),
        })
    }

    fn set(&self, component: &mut Component, center: Vec3) -> Result<(), AccessError> {
        let target = self
            .fields
            .iter()
            .find(|f| component.get(f).is_some())
            .or_else(|| self.fields.first())
            .ok_or_else(|| AccessError::ReadOnly("no candidate fields configured".to_string()))?;
        FieldAccessor::new(target.clone()).set(component, center)
    }
}

/// Two accessors tried in sequence.
#[derive(Debug, Clone)]
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P: CenterAccessor, S: CenterAccessor> CenterAccessor for Fallback<P, S> {
    fn get(&self, component: &Component) -> Result<Vec3, AccessError> {
        match self.primary.get(component) {
            Ok(center) => Ok(center),
            Err(first) => self
                .secondary
                .get(component)
                .map_err(|second| merge_errors(first, second)),
        }
    }

    fn set(&self, component: &mut Component, center: Vec3) -> Result<(), AccessError> {
        match self.primary.set(component, center) {
            Ok(()) => Ok(()),
            Err(_) => self.secondary.set(component, center),
        }
    }
}

/// Read the center, falling back to the zero vector when every strategy fails.
pub fn read_center_or_zero<A: CenterAccessor>(
    accessor: &A,
    component: &Component,
    object: &str,
) -> Vec3 {
    match accessor.get(component) {
        Ok(center) => center,
        Err(e) => {
            warn!("{object}: {e}, using zero center");
            Vec3::zeros()
        }
    }
}

fn merge_errors(first: AccessError, second: AccessError) -> AccessError {
    match (first, second) {
        (AccessError::NotFound { mut tried }, AccessError::NotFound { tried: more }) => {
            tried.extend(more);
            AccessError::NotFound { tried }
        }
        (AccessError::NotFound { .. }, other) => other,
        (first, _) => first,
    }
}

/// Decode a vector stored as `[x, y, z]` or `{"x": .., "y": .., "z": ..}`.
pub(crate) fn value_to_vec3(field: &str, value: &Value) -> Result<Vec3, AccessError> {
    let malformed = |reason: &str| AccessError::Malformed {
        field: field.to_string(),
        reason: reason.to_string(),
    };
    match value {
        Value::Array(items) => {
            if items.len() != 3 {
                return Err(malformed("expected 3 components"));
            }
            let mut out = [0.0; 3];
            for (slot, item) in out.iter_mut().zip(items) {
                *slot = item.as_f64().ok_or_else(|| malformed("non-numeric component"))?;
            }
            Ok(Vec3::new(out[0], out[1], out[2]))
        }
        Value::Object(map) => {
            let axis = |key: &str| {
                map.get(key)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| malformed(&format!("missing numeric {key}")))
            };
            Ok(Vec3::new(axis("x")?, axis("y")?, axis("z")?))
        }
        _ => Err(malformed("expected an array or an object")),
    }
}

/// Encode a vector as `[x, y, z]`.
pub(crate) fn vec3_to_value(v: &Vec3) -> Value {
    json!([v.x, v.y, v.z])
}

// Keeps the object form when the field already uses it.
fn vec3_like(existing: &Value, v: &Vec3) -> Value {
    match existing {
        Value::Object(_) => json!({ "x": v.x, "y": v.y, "z": v.z }),
        _ => vec3_to_value(v),
    }
}
