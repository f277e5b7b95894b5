#![forbid(unsafe_code)]

pub mod state;
pub mod surface;
pub mod vm;

pub use state::ViewError;
pub use surface::{MemorySurface, Region, RenderSurface};
pub use vm::{KeyCommand, TestSessionVm};
