//! Shader cycling behind the "next" button.
//!
//! [`CycleController`] owns the only piece of mutable state in the pipeline:
//! the index of the shader to apply next. It also keeps the button's text
//! vertically centred as the device rotates.

mod layout;

pub use layout::{LayoutAdjuster, LayoutOutcome, LayoutPolicy, DEFAULT_MAX_ATTEMPTS};

use catalog::ShaderCatalog;
use pipeline::{EventResult, Host, LifecycleContext, Orientation, PipelineModule, UiEvent};

/// Module name registered with the camera pipeline.
pub const MODULE_NAME: &str = "nextbutton";
/// Element id of the trigger button.
pub const BUTTON_ID: &str = "nextbutton";

/// Pipeline module that cycles the catalog on each button press.
pub struct CycleController<H: Host> {
    host: H,
    catalog: ShaderCatalog,
    current_index: usize,
    layout: LayoutAdjuster,
}

impl<H: Host> CycleController<H> {
    /// Builds the controller and applies the first shader.
    pub fn new(host: H, catalog: ShaderCatalog, policy: LayoutPolicy) -> Self {
        let mut controller = Self {
            host,
            catalog,
            current_index: 0,
            layout: LayoutAdjuster::new(policy),
        };
        controller.advance();
        controller
    }

    /// Applies the shader at the current index and moves to the next one.
    ///
    /// Returns the catalog index that was applied.
    pub fn advance(&mut self) -> usize {
        let applied = self.current_index;
        let source = self.catalog.source(applied);
        self.host.configure(source);
        self.current_index = (applied + 1) % self.catalog.len();
        self.host.shader_applied(applied, self.current_index);
        tracing::info!(
            index = applied,
            shader = ?self.catalog.get(applied).map(|entry| entry.name.as_str()),
            next = self.current_index,
            "applied fragment shader"
        );
        applied
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn catalog(&self) -> &ShaderCatalog {
        &self.catalog
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_layout_pending(&self) -> bool {
        self.layout.is_pending()
    }

    pub fn on_start(&mut self, orientation: Orientation) -> LayoutOutcome {
        self.host.show_button();
        self.layout.adjust(&mut self.host, orientation)
    }

    pub fn on_orientation_change(&mut self, orientation: Orientation) -> LayoutOutcome {
        self.layout.adjust(&mut self.host, orientation)
    }

    pub fn on_frame(&mut self) -> Option<LayoutOutcome> {
        self.layout.on_frame(&mut self.host)
    }
}

impl<H: Host> PipelineModule for CycleController<H> {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn on_start(&mut self, context: &LifecycleContext) {
        CycleController::on_start(self, context.orientation);
    }

    fn on_device_orientation_change(&mut self, context: &LifecycleContext) {
        self.on_orientation_change(context.orientation);
    }

    fn on_frame(&mut self) {
        CycleController::on_frame(self);
    }

    fn on_ui_event(&mut self, event: &UiEvent) -> EventResult {
        match event {
            UiEvent::Click { element } if element == BUTTON_ID => {
                self.advance();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}
