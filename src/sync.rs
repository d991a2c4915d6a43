use crate::builder::SceneBuilder;
use crate::config::{ConfigChange, ConfigField, SceneConfig};
use crate::core::GraphicsBackend;
use crate::error::Result;
use crate::material::Material;
use crate::scene::{ObjectId, SceneState};

/// How a field change reaches the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Geometry or material kind: the object is torn down and rebuilt
    Structural,
    /// Mutated in place on the live object, lights or camera
    Incremental,
    /// Only stored; the render loop reads it on the next tick
    Animation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Value already current
    Unchanged,
    Rebuilt(ObjectId),
    Updated,
    Deferred,
}

/// Result of a declarative sync
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Changes applied, in field order
    pub changes: Vec<ConfigChange>,
    pub rebuilt: Option<ObjectId>,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Maps configuration changes onto scene mutations; sole owner of the object slot
#[derive(Debug, Default)]
pub struct Synchronizer {
    builder: SceneBuilder,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder(&self) -> &SceneBuilder {
        &self.builder
    }

    pub fn classify(field: ConfigField) -> ChangeKind {
        match field {
            ConfigField::Geometry | ConfigField::Material => ChangeKind::Structural,
            ConfigField::Color
            | ConfigField::LightIntensity
            | ConfigField::CameraDistance
            | ConfigField::FlatShading
            | ConfigField::Wireframe => ChangeKind::Incremental,
            ConfigField::RotationSpeed | ConfigField::Paused => ChangeKind::Animation,
        }
    }

    /// Build the first object for the current configuration
    pub fn build<B: GraphicsBackend>(&mut self, state: &mut SceneState, backend: &mut B) -> Result<ObjectId> {
        self.builder.build(state, backend)
    }

    pub fn release<B: GraphicsBackend>(&mut self, state: &mut SceneState, backend: &mut B) -> Option<ObjectId> {
        self.builder.release(state, backend)
    }

    pub fn apply<B: GraphicsBackend>(
        &mut self,
        state: &mut SceneState,
        backend: &mut B,
        change: ConfigChange,
    ) -> Result<SyncOutcome> {
        let field = change.field();
        if !state.config.apply(change) {
            // A failed rebuild left the slot empty; re-selecting the kind refills it
            if Self::classify(field) == ChangeKind::Structural && state.object.is_none() {
                let id = self.builder.rebuild(state, backend)?;
                return Ok(SyncOutcome::Rebuilt(id));
            }
            return Ok(SyncOutcome::Unchanged);
        }

        match Self::classify(field) {
            ChangeKind::Structural => {
                log::debug!("structural change {}, rebuilding", state.config.get(field));
                let id = self.builder.rebuild(state, backend)?;
                Ok(SyncOutcome::Rebuilt(id))
            }
            ChangeKind::Incremental => {
                Self::update_in_place(state, backend, field)?;
                Ok(SyncOutcome::Updated)
            }
            ChangeKind::Animation => {
                log::trace!("{}", state.config.get(field));
                Ok(SyncOutcome::Deferred)
            }
        }
    }

    /// Bring the scene to `target`, rebuilding at most once
    pub fn sync_to<B: GraphicsBackend>(
        &mut self,
        state: &mut SceneState,
        backend: &mut B,
        target: &SceneConfig,
    ) -> Result<SyncReport> {
        let changes = state.config.diff(target);
        for change in &changes {
            state.config.apply(*change);
        }

        // Independent of the object slot
        for change in &changes {
            let field = change.field();
            if matches!(field, ConfigField::LightIntensity | ConfigField::CameraDistance) {
                Self::update_in_place(state, backend, field)?;
            }
        }

        let structural = state.object.is_none()
            || changes
                .iter()
                .any(|c| Self::classify(c.field()) == ChangeKind::Structural);

        let rebuilt = if structural {
            log::debug!("sync_to: {} changes, rebuilding once", changes.len());
            Some(self.builder.rebuild(state, backend)?)
        } else {
            // No rebuild, so patch the live material
            for change in &changes {
                let field = change.field();
                if Self::touches_material(field) {
                    Self::update_in_place(state, backend, field)?;
                }
            }
            None
        };

        Ok(SyncReport { changes, rebuilt })
    }

    fn touches_material(field: ConfigField) -> bool {
        matches!(field, ConfigField::Color | ConfigField::FlatShading | ConfigField::Wireframe)
    }

    fn update_in_place<B: GraphicsBackend>(
        state: &mut SceneState,
        backend: &mut B,
        field: ConfigField,
    ) -> Result<()> {
        log::trace!("incremental {}", state.config.get(field));
        match field {
            ConfigField::Color | ConfigField::FlatShading | ConfigField::Wireframe => {
                let config = &state.config;
                if let Some(object) = state.object.as_mut() {
                    let updated = object
                        .material
                        .with_flat_shading(config.flat_shading)
                        .with_wireframe(config.wireframe);
                    let updated = Material { color: config.color, ..updated };
                    if updated == object.material {
                        return Ok(());
                    }
                    object.material = updated;
                    backend.update_material(object.material_handle, &object.material)?;
                }
            }
            ConfigField::LightIntensity => state.lights.set_intensity(state.config.light_intensity),
            ConfigField::CameraDistance => state.camera.set_distance(state.config.camera_distance),
            _ => {}
        }
        Ok(())
    }
}
