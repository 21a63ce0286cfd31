use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use catalog::ShaderCatalog;
use cycler::{CycleController, LayoutPolicy, BUTTON_ID};
use pipeline::{
    CameraPipeline, FullWindowCanvas, GlTextureRenderer, Orientation, PipelineModule, Readiness,
    UiEvent, Viewport,
};
use serde::Serialize;

use crate::sim::HeadlessHost;

/// Element id of the canvas the camera feed is drawn into.
pub const CANVAS_ID: &str = "camerafeed";

/// Upper bound on frames serviced after a single step.
const MAX_PUMPED_FRAMES: u32 = 10_000;

/// One scripted interaction with the simulated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Click,
    Rotate(Orientation),
    Frame,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once(':') {
            Some((verb, arg)) if verb.eq_ignore_ascii_case("rotate") => arg
                .parse::<Orientation>()
                .map(Step::Rotate)
                .map_err(|err| err.to_string()),
            None if trimmed.eq_ignore_ascii_case("click") => Ok(Step::Click),
            None if trimmed.eq_ignore_ascii_case("frame") => Ok(Step::Frame),
            _ => Err(format!(
                "unknown step '{trimmed}'; expected click, frame, or rotate:DEGREES"
            )),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click => f.write_str("click"),
            Step::Rotate(orientation) => write!(f, "rotate:{orientation}"),
            Step::Frame => f.write_str("frame"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub orientation: Orientation,
    /// Device screen size; laid out for `orientation` at start.
    pub screen: Viewport,
    pub settle_frames: u32,
    /// Whether the host runtime has already loaded when the page script runs.
    pub preloaded: bool,
    pub steps: Vec<Step>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            screen: Viewport::new(390.0, 844.0),
            settle_frames: 2,
            preloaded: false,
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedShader {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub canvas: String,
    pub modules: Vec<String>,
    pub applied: Vec<AppliedShader>,
    pub next_index: usize,
    pub button_visible: bool,
    pub line_height: Option<f32>,
    pub orientation: i32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub layout_settled: bool,
    pub viewport_rotating: bool,
    pub frames: u64,
}

pub fn run_session(
    catalog: ShaderCatalog,
    policy: LayoutPolicy,
    options: &SessionOptions,
) -> Result<SessionReport> {
    let host = HeadlessHost::new(
        options.screen.oriented(options.orientation),
        options.settle_frames,
    );
    let mut pipeline = CameraPipeline::new();
    let mut readiness = Readiness::new(options.preloaded);

    let module_host = host.clone();
    let module_catalog = catalog.clone();
    let orientation = options.orientation;
    readiness
        .when_loaded(&mut pipeline, move |camera| {
            let controller = CycleController::new(module_host, module_catalog, policy);
            camera.add_camera_pipeline_modules([
                Box::new(FullWindowCanvas::default()) as Box<dyn PipelineModule>,
                Box::new(GlTextureRenderer::default()),
                Box::new(controller),
            ])?;
            camera.run(CANVAS_ID, orientation)
        })
        .context("failed to activate camera pipeline")?;

    if !readiness.is_loaded() {
        tracing::debug!("delivering host loaded signal");
        readiness
            .signal_loaded(&mut pipeline)
            .context("failed to activate camera pipeline")?;
    }
    pump_frames(&host, &mut pipeline);

    for step in &options.steps {
        tracing::debug!(%step, "running step");
        match *step {
            Step::Click => {
                if !pipeline.ui_event(&UiEvent::click(BUTTON_ID)).is_consumed() {
                    tracing::warn!("button click was not handled");
                }
            }
            Step::Rotate(orientation) => {
                host.rotate(orientation);
                pipeline
                    .orientation_changed(orientation)
                    .context("failed to deliver orientation change")?;
            }
            Step::Frame => {
                host.tick();
                pipeline.frame();
            }
        }
        pump_frames(&host, &mut pipeline);
    }

    Ok(build_report(&host, &pipeline, &catalog))
}

/// Services frame requests until no module asks for another one.
fn pump_frames(host: &HeadlessHost, pipeline: &mut CameraPipeline) {
    let mut pumped = 0;
    while host.take_frame_request() {
        if pumped >= MAX_PUMPED_FRAMES {
            tracing::warn!(pumped, "frame requests did not stop; abandoning");
            break;
        }
        host.tick();
        pipeline.frame();
        pumped += 1;
    }
}

fn build_report(
    host: &HeadlessHost,
    pipeline: &CameraPipeline,
    catalog: &ShaderCatalog,
) -> SessionReport {
    let snapshot = host.snapshot();
    let applied: Vec<AppliedShader> = snapshot
        .applied
        .iter()
        .filter_map(|&index| {
            let entry = catalog.get(index)?;
            Some(AppliedShader {
                index,
                name: entry.name.clone(),
            })
        })
        .collect();
    let orientation = pipeline.orientation();

    SessionReport {
        canvas: pipeline.canvas().unwrap_or_default().to_string(),
        modules: pipeline.module_names(),
        applied,
        next_index: snapshot.next_index.unwrap_or(0),
        button_visible: snapshot.button_visible,
        line_height: snapshot.line_height,
        orientation: orientation.degrees(),
        viewport_width: snapshot.viewport.width,
        viewport_height: snapshot.viewport.height,
        layout_settled: orientation.matches(snapshot.viewport),
        viewport_rotating: snapshot.rotating,
        frames: snapshot.frames,
    }
}
