use crate::host::Orientation;
use crate::module::{EventResult, LifecycleContext, PipelineModule, UiEvent};
use crate::PipelineError;

/// Registered pipeline modules plus the lifecycle state of the camera session.
///
/// Modules receive hooks in registration order.
#[derive(Default)]
pub struct CameraPipeline {
    modules: Vec<Box<dyn PipelineModule>>,
    canvas: Option<String>,
    orientation: Orientation,
}

impl CameraPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_camera_pipeline_module(
        &mut self,
        module: Box<dyn PipelineModule>,
    ) -> Result<(), PipelineError> {
        let name = module.name();
        if name.trim().is_empty() {
            return Err(PipelineError::UnnamedModule);
        }
        if self.modules.iter().any(|existing| existing.name() == name) {
            return Err(PipelineError::DuplicateModule(name.to_string()));
        }
        tracing::debug!(module = name, "registered pipeline module");
        self.modules.push(module);
        Ok(())
    }

    pub fn add_camera_pipeline_modules<I>(&mut self, modules: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = Box<dyn PipelineModule>>,
    {
        for module in modules {
            self.add_camera_pipeline_module(module)?;
        }
        Ok(())
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules
            .iter()
            .map(|module| module.name().to_string())
            .collect()
    }

    pub fn is_running(&self) -> bool {
        self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&str> {
        self.canvas.as_deref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Starts the camera session bound to `canvas` and fires `on_start`.
    pub fn run(&mut self, canvas: &str, orientation: Orientation) -> Result<(), PipelineError> {
        if let Some(current) = &self.canvas {
            return Err(PipelineError::AlreadyRunning(current.clone()));
        }
        self.canvas = Some(canvas.to_string());
        self.orientation = orientation;
        tracing::info!(
            canvas,
            orientation = orientation.degrees(),
            modules = self.modules.len(),
            "camera pipeline started"
        );
        let context = LifecycleContext::new(orientation);
        for module in &mut self.modules {
            module.on_start(&context);
        }
        Ok(())
    }

    pub fn orientation_changed(&mut self, orientation: Orientation) -> Result<(), PipelineError> {
        if !self.is_running() {
            return Err(PipelineError::NotRunning);
        }
        tracing::debug!(
            from = self.orientation.degrees(),
            to = orientation.degrees(),
            "device orientation changed"
        );
        self.orientation = orientation;
        let context = LifecycleContext::new(orientation);
        for module in &mut self.modules {
            module.on_device_orientation_change(&context);
        }
        Ok(())
    }

    pub fn frame(&mut self) {
        for module in &mut self.modules {
            module.on_frame();
        }
    }

    /// Routes `event` to modules until one consumes it.
    pub fn ui_event(&mut self, event: &UiEvent) -> EventResult {
        for module in &mut self.modules {
            if module.on_ui_event(event).is_consumed() {
                return EventResult::Consumed;
            }
        }
        tracing::trace!(?event, "ui event ignored by all modules");
        EventResult::Ignored
    }
}

/// Stand-in for the host's module that sizes the canvas to the window.
#[derive(Debug, Default)]
pub struct FullWindowCanvas {
    resizes: u32,
}

impl FullWindowCanvas {
    pub const NAME: &'static str = "fullwindowcanvas";
}

impl PipelineModule for FullWindowCanvas {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_start(&mut self, context: &LifecycleContext) {
        self.resizes += 1;
        tracing::trace!(orientation = context.orientation.degrees(), "canvas fills window");
    }

    fn on_device_orientation_change(&mut self, context: &LifecycleContext) {
        self.resizes += 1;
        tracing::trace!(
            orientation = context.orientation.degrees(),
            resizes = self.resizes,
            "canvas resized to window"
        );
    }
}

/// Stand-in for the host's module that draws the camera feed.
#[derive(Debug, Default)]
pub struct GlTextureRenderer {
    frames: u64,
}

impl GlTextureRenderer {
    pub const NAME: &'static str = "gltexturerenderer";
}

impl PipelineModule for GlTextureRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn on_frame(&mut self) {
        self.frames += 1;
        tracing::trace!(frames = self.frames, "camera feed drawn");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        consume_clicks: bool,
    }

    impl PipelineModule for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn on_start(&mut self, context: &LifecycleContext) {
            self.log
                .borrow_mut()
                .push(format!("{}:start:{}", self.name, context.orientation));
        }

        fn on_device_orientation_change(&mut self, context: &LifecycleContext) {
            self.log
                .borrow_mut()
                .push(format!("{}:orientation:{}", self.name, context.orientation));
        }

        fn on_ui_event(&mut self, _event: &UiEvent) -> EventResult {
            self.log.borrow_mut().push(format!("{}:click", self.name));
            if self.consume_clicks {
                EventResult::Consumed
            } else {
                EventResult::Ignored
            }
        }
    }

    fn recorder(
        name: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
        consume_clicks: bool,
    ) -> Box<dyn PipelineModule> {
        Box::new(Recorder {
            name,
            log: Rc::clone(log),
            consume_clicks,
        })
    }

    #[test]
    fn dispatches_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = CameraPipeline::new();
        pipeline
            .add_camera_pipeline_modules([recorder("a", &log, false), recorder("b", &log, false)])
            .unwrap();

        pipeline.run("camerafeed", Orientation::Portrait).unwrap();
        pipeline
            .orientation_changed(Orientation::LandscapeRight)
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["a:start:0", "b:start:0", "a:orientation:-90", "b:orientation:-90"]
        );
        assert_eq!(pipeline.canvas(), Some("camerafeed"));
        assert_eq!(pipeline.orientation(), Orientation::LandscapeRight);
    }

    #[test]
    fn rejects_duplicate_names() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = CameraPipeline::new();
        let err = pipeline
            .add_camera_pipeline_modules([recorder("a", &log, false), recorder("a", &log, false)])
            .unwrap_err();
        assert_eq!(err, PipelineError::DuplicateModule("a".into()));
        assert_eq!(pipeline.module_names(), vec!["a".to_string()]);
    }

    #[test]
    fn lifecycle_guards() {
        let mut pipeline = CameraPipeline::new();
        assert_eq!(
            pipeline.orientation_changed(Orientation::Portrait),
            Err(PipelineError::NotRunning)
        );
        pipeline.run("camerafeed", Orientation::Portrait).unwrap();
        assert_eq!(
            pipeline.run("other", Orientation::Portrait),
            Err(PipelineError::AlreadyRunning("camerafeed".into()))
        );
    }

    #[test]
    fn ui_events_stop_at_first_consumer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = CameraPipeline::new();
        pipeline
            .add_camera_pipeline_modules([
                recorder("a", &log, false),
                recorder("b", &log, true),
                recorder("c", &log, true),
            ])
            .unwrap();

        let result = pipeline.ui_event(&UiEvent::click("nextbutton"));
        assert!(result.is_consumed());
        assert_eq!(*log.borrow(), vec!["a:click", "b:click"]);
    }

    #[test]
    fn host_modules_have_stable_names() {
        let mut pipeline = CameraPipeline::new();
        pipeline
            .add_camera_pipeline_modules([
                Box::new(FullWindowCanvas::default()) as Box<dyn PipelineModule>,
                Box::new(GlTextureRenderer::default()),
            ])
            .unwrap();
        assert_eq!(
            pipeline.module_names(),
            vec!["fullwindowcanvas".to_string(), "gltexturerenderer".to_string()]
        );
    }
}
