//! Host scene document for capsync.
//!
//! A scene is a flat list of named objects, each carrying loosely-typed
//! components. Component fields are kept as a raw JSON map so capsule
//! records can be read the way a host engine exposes them, including
//! fields that are not part of any public schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single component attached to an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component type name, e.g. `"CapsuleColliderA"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Serialized fields, keyed by property name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Component {
    /// Create an empty component of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }
}

/// A named object in the scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Display name, used in reports.
    pub name: String,
    /// Attached components, in attachment order.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl SceneObject {
    /// Create an object with no components.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Indices of every component of type `kind`.
    pub fn indices_of(&self, kind: &str) -> Vec<usize> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Every component of type `kind`.
    pub fn components_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Component> {
        self.components.iter().filter(move |c| c.kind == kind)
    }

    /// Whether any component of type `kind` is attached.
    pub fn has(&self, kind: &str) -> bool {
        self.components.iter().any(|c| c.kind == kind)
    }

    /// Attach a component.
    pub fn push_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Detach every component of type `kind`, returning how many were removed.
    pub fn remove_components(&mut self, kind: &str) -> usize {
        let before = self.components.len();
        self.components.retain(|c| c.kind != kind);
        before - self.components.len()
    }
}

/// A flat collection of scene objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Objects in document order.
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Find an object by name.
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }
}
