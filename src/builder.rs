use crate::core::GraphicsBackend;
use crate::error::{Result, SceneError};
use crate::scene::{ObjectId, SceneObject, SceneState, Transform};

/// Creates, replaces and destroys the scene object from the current config
#[derive(Debug, Default)]
pub struct SceneBuilder {
    next_id: u64,
    built: u64,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects created so far, rebuilds included
    pub fn built(&self) -> u64 {
        self.built
    }

    /// Allocate resources for the configured geometry and material and install the object
    pub fn build<B: GraphicsBackend>(&mut self, state: &mut SceneState, backend: &mut B) -> Result<ObjectId> {
        if let Some(existing) = &state.object {
            return Err(SceneError::SlotOccupied(existing.id.0));
        }
        self.install(state, backend, Transform::default())
    }

    /// Release the current object, then build its replacement with the same transform
    pub fn rebuild<B: GraphicsBackend>(&mut self, state: &mut SceneState, backend: &mut B) -> Result<ObjectId> {
        let transform = match state.object.take() {
            Some(old) => {
                let transform = old.transform;
                Self::release_object(old, backend);
                transform
            }
            None => Transform::default(),
        };
        self.install(state, backend, transform)
    }

    /// Empty the slot and release its resources; returns the released id
    pub fn release<B: GraphicsBackend>(&mut self, state: &mut SceneState, backend: &mut B) -> Option<ObjectId> {
        let old = state.object.take()?;
        let id = old.id;
        Self::release_object(old, backend);
        Some(id)
    }

    fn release_object<B: GraphicsBackend>(object: SceneObject, backend: &mut B) {
        log::debug!("releasing {} ({}, {})", object.id, object.geometry, object.material.kind);
        backend.release_geometry(object.geometry_handle);
        backend.release_material(object.material_handle);
    }

    fn install<B: GraphicsBackend>(
        &mut self,
        state: &mut SceneState,
        backend: &mut B,
        transform: Transform,
    ) -> Result<ObjectId> {
        let geometry = state.config.geometry;
        let material = state.configured_material();

        let mesh = geometry.build();
        let geometry_handle = backend.create_geometry(&mesh)?;
        let material_handle = match backend.create_material(&material) {
            Ok(handle) => handle,
            Err(e) => {
                backend.release_geometry(geometry_handle);
                return Err(e);
            }
        };

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.built += 1;

        log::debug!(
            "built {}: {} ({} triangles), {} material",
            id,
            geometry,
            mesh.triangle_count(),
            material.kind
        );

        state.object = Some(SceneObject {
            id,
            geometry,
            material,
            transform,
            geometry_handle,
            material_handle,
        });
        Ok(id)
    }
}
