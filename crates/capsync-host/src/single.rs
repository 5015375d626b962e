//! Converting the colliders of one object.

use capsync_convert::System;
use capsync_scene::SceneObject;
use log::info;

use crate::accessor::CenterAccessor;
use crate::adapter::{HostAdapter, Placement};
use crate::error::Result;

/// Result of converting a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectOutcome {
    /// `count` source colliders were replaced.
    Converted {
        /// Number of converted colliders.
        count: usize,
    },
    /// The object already carried only target-system colliders.
    AlreadyConverted,
}

/// Replaces every source collider on one object with its converted counterpart.
#[derive(Debug, Clone)]
pub struct SingleConverter<C> {
    adapter: HostAdapter<C>,
}

impl<C: CenterAccessor> SingleConverter<C> {
    /// Create a single-object converter.
    pub fn new(adapter: HostAdapter<C>) -> Self {
        Self { adapter }
    }

    /// The underlying adapter.
    pub fn adapter(&self) -> &HostAdapter<C> {
        &self.adapter
    }

    /// Convert `object`'s capsule colliders into `target`.
    ///
    /// Fails without touching the object when it carries both systems,
    /// none, or a collider that cannot be read.
    pub fn convert_object(
        &self,
        object: &mut SceneObject,
        target: System,
    ) -> Result<ObjectOutcome> {
        if !self.adapter.plan(object, target)? {
            return Ok(ObjectOutcome::AlreadyConverted);
        }

        let sources = self.adapter.read_sources(object, target.other())?;
        let converted = self.adapter.convert_records(&object.name, &sources)?;
        self.adapter
            .write_converted(object, &converted, Placement::Replace)?;

        info!(
            "{}: converted {} capsule(s) to System {}",
            object.name,
            converted.len(),
            target
        );
        Ok(ObjectOutcome::Converted {
            count: converted.len(),
        })
    }
}
