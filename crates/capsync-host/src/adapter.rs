//! Reading source colliders off an object and writing converted ones back.

use capsync_convert::{CapsuleParams, Converter, System};
use capsync_scene::SceneObject;
use serde::{Deserialize, Serialize};

use crate::accessor::CenterAccessor;
use crate::error::{HostError, Result};
use crate::schema::{Detection, NativeSchema};

/// What happens to the source collider after conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Remove the source collider once the converted one is attached.
    #[default]
    Replace,
    /// Attach the converted collider next to the source.
    KeepSource,
}

/// Schema, center accessor and converter bundled for one host.
#[derive(Debug, Clone)]
pub struct HostAdapter<C> {
    schema: NativeSchema,
    accessor: C,
    converter: Converter,
}

impl<C: CenterAccessor> HostAdapter<C> {
    /// Create an adapter.
    pub fn new(schema: NativeSchema, accessor: C, converter: Converter) -> Self {
        Self {
            schema,
            accessor,
            converter,
        }
    }

    /// The native schema in use.
    pub fn schema(&self) -> &NativeSchema {
        &self.schema
    }

    /// The center accessor in use.
    pub fn accessor(&self) -> &C {
        &self.accessor
    }

    /// The converter in use.
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Decide whether `object` needs converting into `target`.
    ///
    /// Returns `Ok(true)` when it carries source colliders only and
    /// `Ok(false)` when it already holds only `target` colliders.
    pub fn plan(&self, object: &SceneObject, target: System) -> Result<bool> {
        let source = target.other();
        match (self.schema.detect(object), source) {
            (Detection::Both, _) => Err(HostError::Ambiguous {
                object: object.name.clone(),
            }),
            (Detection::None, _) => Err(HostError::MissingCollider {
                object: object.name.clone(),
                system: source,
            }),
            (Detection::A, System::A) | (Detection::B, System::B) => Ok(true),
            (Detection::A, System::B) | (Detection::B, System::A) => Ok(false),
        }
    }

    /// Read every `source` capsule attached to `object`, in attachment order.
    pub fn read_sources(&self, object: &SceneObject, source: System) -> Result<Vec<CapsuleParams>> {
        object
            .components_of(self.schema.component(source))
            .map(|c| self.schema.read(source, c, &self.accessor, &object.name))
            .collect()
    }

    /// Attach `converted` to `object`, removing the sources when `placement` is
    /// [`Placement::Replace`].
    ///
    /// Every component is built before the object is touched, so a failed
    /// write leaves the object unchanged.
    pub fn write_converted(
        &self,
        object: &mut SceneObject,
        converted: &[CapsuleParams],
        placement: Placement,
    ) -> Result<()> {
        let components = converted
            .iter()
            .map(|p| self.schema.build(p, &self.accessor, &object.name))
            .collect::<Result<Vec<_>>>()?;

        if placement == Placement::Replace {
            if let Some(first) = converted.first() {
                let source = first.system().other();
                object.remove_components(self.schema.component(source));
            }
        }
        for component in components {
            object.push_component(component);
        }
        Ok(())
    }

    /// Run the converter on each record, tagging failures with the object name.
    pub fn convert_records(
        &self,
        object: &str,
        records: &[CapsuleParams],
    ) -> Result<Vec<CapsuleParams>> {
        records
            .iter()
            .map(|r| {
                self.converter
                    .convert(r)
                    .map_err(|source| HostError::Convert {
                        object: object.to_string(),
                        source,
                    })
            })
            .collect()
    }
}
