use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the scene library
#[derive(Debug, Error)]
pub enum SceneError {
    /// Nothing to render into (no window, no surface)
    #[error("no render target available: {0}")]
    MissingMountPoint(String),

    #[error("no suitable graphics adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("failed to create graphics device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("unknown {kind} handle {id}")]
    UnknownHandle { kind: &'static str, id: u64 },

    #[error("scene slot already holds object {0}")]
    SlotOccupied(u64),

    #[error("render loop has been torn down")]
    TornDown,

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
