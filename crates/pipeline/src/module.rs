use crate::host::Orientation;

/// Data the host passes to lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleContext {
    pub orientation: Orientation,
}

impl LifecycleContext {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }
}

/// User input forwarded from the page surrounding the camera canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// An element was clicked or tapped.
    Click { element: String },
}

impl UiEvent {
    pub fn click(element: impl Into<String>) -> Self {
        Self::Click {
            element: element.into(),
        }
    }
}

/// Result returned by [`PipelineModule::on_ui_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; stop routing to later modules.
    Consumed,
    /// Event was not handled; keep routing.
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// A unit the camera pipeline drives through its lifecycle.
///
/// Every hook has a no-op default so modules only implement what they react
/// to.
pub trait PipelineModule {
    /// Unique name within a pipeline.
    fn name(&self) -> &str;

    /// The camera session started.
    fn on_start(&mut self, _context: &LifecycleContext) {}

    /// The device reported a new orientation.
    fn on_device_orientation_change(&mut self, _context: &LifecycleContext) {}

    /// A display refresh happened.
    fn on_frame(&mut self) {}

    fn on_ui_event(&mut self, _event: &UiEvent) -> EventResult {
        EventResult::Ignored
    }
}
