use std::cell::RefCell;
use std::rc::Rc;

use pipeline::{Host, Orientation, Viewport};

/// The trigger button is styled at 8vh.
pub const BUTTON_HEIGHT_RATIO: f32 = 0.08;

/// In-process stand-in for the rendering host.
///
/// Clones share state, so the session driver can keep a handle while the
/// cycle controller owns another. Rotations take `settle_frames` display
/// refreshes to reach the reported viewport, like a browser relayout does.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    state: Rc<RefCell<HostState>>,
}

#[derive(Debug)]
struct HostState {
    viewport: Viewport,
    rotation: Option<PendingRotation>,
    settle_frames: u32,
    button_visible: bool,
    line_height: Option<f32>,
    configured: Vec<String>,
    applied: Vec<usize>,
    next_index: Option<usize>,
    frame_requested: bool,
    frames: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingRotation {
    target: Viewport,
    frames_left: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostSnapshot {
    pub viewport: Viewport,
    pub rotating: bool,
    pub button_visible: bool,
    pub line_height: Option<f32>,
    pub configured: Vec<String>,
    /// Catalog indices in the order they were applied.
    pub applied: Vec<usize>,
    pub next_index: Option<usize>,
    pub frames: u64,
}

impl HeadlessHost {
    pub fn new(viewport: Viewport, settle_frames: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                viewport,
                rotation: None,
                settle_frames,
                button_visible: false,
                line_height: None,
                configured: Vec::new(),
                applied: Vec::new(),
                next_index: None,
                frame_requested: false,
                frames: 0,
            })),
        }
    }

    /// Starts turning the device; the viewport follows after the settle delay.
    pub fn rotate(&self, orientation: Orientation) {
        let mut state = self.state.borrow_mut();
        let target = state.viewport.oriented(orientation);
        if target == state.viewport || state.settle_frames == 0 {
            state.viewport = target;
            state.rotation = None;
            return;
        }
        tracing::trace!(
            orientation = orientation.degrees(),
            settle_frames = state.settle_frames,
            "viewport rotation started"
        );
        state.rotation = Some(PendingRotation {
            target,
            frames_left: state.settle_frames,
        });
    }

    /// Advances one display refresh.
    pub fn tick(&self) {
        let mut state = self.state.borrow_mut();
        state.frames += 1;
        let settled = match state.rotation.as_mut() {
            Some(rotation) => {
                rotation.frames_left = rotation.frames_left.saturating_sub(1);
                (rotation.frames_left == 0).then_some(rotation.target)
            }
            None => None,
        };
        if let Some(target) = settled {
            state.viewport = target;
            state.rotation = None;
            tracing::trace!(
                width = target.width,
                height = target.height,
                frame = state.frames,
                "viewport settled"
            );
        }
    }

    pub fn take_frame_request(&self) -> bool {
        std::mem::take(&mut self.state.borrow_mut().frame_requested)
    }

    pub fn snapshot(&self) -> HostSnapshot {
        let state = self.state.borrow();
        HostSnapshot {
            viewport: state.viewport,
            rotating: state.rotation.is_some(),
            button_visible: state.button_visible,
            line_height: state.line_height,
            configured: state.configured.clone(),
            applied: state.applied.clone(),
            next_index: state.next_index,
            frames: state.frames,
        }
    }
}

impl Host for HeadlessHost {
    fn configure(&mut self, fragment_source: &str) {
        tracing::trace!(bytes = fragment_source.len(), "texture renderer reconfigured");
        self.state
            .borrow_mut()
            .configured
            .push(fragment_source.to_string());
    }

    fn shader_applied(&mut self, index: usize, next_index: usize) {
        let mut state = self.state.borrow_mut();
        state.applied.push(index);
        state.next_index = Some(next_index);
    }

    fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    fn show_button(&mut self) {
        self.state.borrow_mut().button_visible = true;
    }

    fn button_height(&self) -> f32 {
        (self.state.borrow().viewport.height * BUTTON_HEIGHT_RATIO).round()
    }

    fn set_button_line_height(&mut self, px: f32) {
        self.state.borrow_mut().line_height = Some(px);
    }

    fn request_frame(&mut self) {
        self.state.borrow_mut().frame_requested = true;
    }
}
