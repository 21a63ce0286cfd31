//! Host-facing surface of the camera pipeline.
//!
//! The rendering/AR host is external: it captures the camera, uploads
//! textures and draws frames. This crate describes what the rest of the
//! workspace needs from it ([`Host`]), what the host expects back
//! ([`PipelineModule`]), and the small runtime that wires the two together.

mod host;
mod module;
mod readiness;
mod runtime;

pub use host::{Host, Orientation, Viewport};
pub use module::{EventResult, LifecycleContext, PipelineModule, UiEvent};
pub use readiness::Readiness;
pub use runtime::{CameraPipeline, FullWindowCanvas, GlTextureRenderer};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("pipeline module '{0}' is already registered")]
    DuplicateModule(String),
    #[error("pipeline module name must not be empty")]
    UnnamedModule,
    #[error("camera pipeline is already running on canvas '{0}'")]
    AlreadyRunning(String),
    #[error("camera pipeline has not been started")]
    NotRunning,
    #[error("unsupported orientation {0}; expected 0, 90, 180 or -90")]
    InvalidOrientation(i32),
    #[error("invalid orientation '{0}'")]
    ParseOrientation(String),
}
