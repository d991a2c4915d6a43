use std::fmt;

use super::display_context::DisplayContext;
use crate::error::Result;
use crate::geometry::MeshData;
use crate::material::Material;
use crate::scene::SceneState;

/// Backend-owned geometry resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u64);

/// Backend-owned material resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

impl fmt::Display for GeometryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geometry#{}", self.0)
    }
}

impl fmt::Display for MaterialHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material#{}", self.0)
    }
}

/// Graphics boundary - everything the scene logic asks of a renderer
///
/// Resource creation and release are synchronous. Releasing an unknown
/// handle is a no-op so that teardown after a failed rebuild stays safe.
pub trait GraphicsBackend {
    /// Upload a mesh
    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle>;

    /// Allocate material parameters
    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle>;

    /// Rewrite material parameters in place
    fn update_material(&mut self, handle: MaterialHandle, material: &Material) -> Result<()>;

    fn release_geometry(&mut self, handle: GeometryHandle);

    fn release_material(&mut self, handle: MaterialHandle);

    /// Viewport changed
    fn resize(&mut self, display: DisplayContext);

    /// Submit one draw of the current scene state
    fn render(&mut self, state: &SceneState) -> Result<()>;

    /// Drop any UI overlay bound to the render target
    fn dispose_overlay(&mut self) {}
}
