#![allow(dead_code)]

use std::collections::HashSet;

use glam::Vec3;
use scene_sync::core::{DisplayContext, GeometryHandle, GraphicsBackend, MaterialHandle};
use scene_sync::geometry::MeshData;
use scene_sync::light::LightRig;
use scene_sync::material::Material;
use scene_sync::{ObjectId, Result, SceneConfig, SceneError, SceneState};

/// Everything the scene logic asked the backend to do
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateGeometry(GeometryHandle, usize),
    CreateMaterial(MaterialHandle, Material),
    UpdateMaterial(MaterialHandle, Material),
    ReleaseGeometry(GeometryHandle),
    ReleaseMaterial(MaterialHandle),
    Resize(DisplayContext),
    Render(Option<ObjectId>, Option<Vec3>),
    DisposeOverlay,
}

/// Backend double that records calls and tracks live handles
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub events: Vec<Event>,
    pub live_geometry: HashSet<GeometryHandle>,
    pub live_materials: HashSet<MaterialHandle>,
    pub fail_materials: bool,
    next: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn renders(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Render(..))).count()
    }

    pub fn creates(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::CreateGeometry(..) | Event::CreateMaterial(..)))
            .count()
    }

    pub fn releases(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::ReleaseGeometry(_) | Event::ReleaseMaterial(_)))
            .count()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }

    pub fn position(&self, predicate: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events.iter().position(predicate)
    }

    fn allocate(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle> {
        let handle = GeometryHandle(self.allocate());
        self.live_geometry.insert(handle);
        self.events.push(Event::CreateGeometry(handle, mesh.triangle_count()));
        Ok(handle)
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle> {
        if self.fail_materials {
            return Err(SceneError::MissingMountPoint("material allocation refused".into()));
        }
        let handle = MaterialHandle(self.allocate());
        self.live_materials.insert(handle);
        self.events.push(Event::CreateMaterial(handle, *material));
        Ok(handle)
    }

    fn update_material(&mut self, handle: MaterialHandle, material: &Material) -> Result<()> {
        if !self.live_materials.contains(&handle) {
            return Err(SceneError::UnknownHandle {
                kind: "material",
                id: handle.0,
            });
        }
        self.events.push(Event::UpdateMaterial(handle, *material));
        Ok(())
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        self.live_geometry.remove(&handle);
        self.events.push(Event::ReleaseGeometry(handle));
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        self.live_materials.remove(&handle);
        self.events.push(Event::ReleaseMaterial(handle));
    }

    fn resize(&mut self, display: DisplayContext) {
        self.events.push(Event::Resize(display));
    }

    fn render(&mut self, state: &SceneState) -> Result<()> {
        self.events.push(Event::Render(state.object_id(), state.rotation()));
        Ok(())
    }

    fn dispose_overlay(&mut self) {
        self.events.push(Event::DisposeOverlay);
    }
}

pub fn viewport() -> DisplayContext {
    DisplayContext::new(800, 600)
}

pub fn empty_state(config: SceneConfig) -> SceneState {
    SceneState::new(config, LightRig::default(), viewport())
}

pub fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
