mod backend;
mod controller;
mod display_context;
mod gpu_context;
mod input_adapter;
mod timer;

pub use backend::{GeometryHandle, GraphicsBackend, MaterialHandle};
pub use controller::{Button, Controller, HeldButtons};
pub use display_context::DisplayContext;
pub use gpu_context::GpuContext;
pub use input_adapter::WinitController;
pub use timer::{FpsCounter, Throttled};
