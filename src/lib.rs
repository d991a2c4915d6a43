pub mod builder;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod light;
pub mod material;
pub mod math;
pub mod overlay;
pub mod render_loop;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod session;
pub mod sync;
pub mod types;

pub use config::{ConfigChange, ConfigField, SceneConfig};
pub use error::{Result, SceneError};
pub use render_loop::{LoopHandle, LoopState, RenderLoop, StopReason, TickOutcome};
pub use scene::{ObjectId, SceneObject, SceneState, Transform};
pub use session::{Session, SessionStats};
pub use sync::{ChangeKind, SyncOutcome, SyncReport, Synchronizer};
