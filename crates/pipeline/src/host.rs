use std::fmt;
use std::str::FromStr;

use crate::PipelineError;

/// Device rotation as reported by the host, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    LandscapeLeft,
    PortraitUpsideDown,
    LandscapeRight,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Portrait,
        Orientation::LandscapeLeft,
        Orientation::PortraitUpsideDown,
        Orientation::LandscapeRight,
    ];

    pub fn from_degrees(degrees: i32) -> Result<Self, PipelineError> {
        match degrees {
            0 => Ok(Self::Portrait),
            90 => Ok(Self::LandscapeLeft),
            180 | -180 => Ok(Self::PortraitUpsideDown),
            -90 | 270 => Ok(Self::LandscapeRight),
            other => Err(PipelineError::InvalidOrientation(other)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Portrait => 0,
            Self::LandscapeLeft => 90,
            Self::PortraitUpsideDown => 180,
            Self::LandscapeRight => -90,
        }
    }

    pub fn is_landscape(self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }

    /// Whether the viewport geometry has caught up with this orientation.
    ///
    /// Square viewports satisfy both families.
    pub fn matches(self, viewport: Viewport) -> bool {
        if self.is_landscape() {
            viewport.height <= viewport.width
        } else {
            viewport.width <= viewport.height
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FromStr for Orientation {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "portrait" => return Ok(Self::Portrait),
            "landscape" | "landscape-left" => return Ok(Self::LandscapeLeft),
            "portrait-upside-down" | "upside-down" => return Ok(Self::PortraitUpsideDown),
            "landscape-right" => return Ok(Self::LandscapeRight),
            _ => {}
        }
        let degrees: i32 = trimmed
            .parse()
            .map_err(|_| PipelineError::ParseOrientation(trimmed.to_string()))?;
        Self::from_degrees(degrees)
    }
}

/// Inner window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the same viewport with its axes laid out for `orientation`.
    pub fn oriented(self, orientation: Orientation) -> Self {
        let (short, long) = if self.width <= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        if orientation.is_landscape() {
            Self::new(long, short)
        } else {
            Self::new(short, long)
        }
    }
}

/// Capabilities the external rendering host lends to pipeline modules.
///
/// Everything here is synchronous from the caller's side. Failures inside the
/// host are the host's concern and are not surfaced.
pub trait Host {
    /// Replaces the fragment shader used by the texture renderer.
    fn configure(&mut self, fragment_source: &str);

    /// Called after [`Host::configure`] with the catalog index just applied
    /// and the index the next advance will apply.
    fn shader_applied(&mut self, _index: usize, _next_index: usize) {}

    /// Current inner window size.
    fn viewport(&self) -> Viewport;

    /// Makes the trigger button visible.
    fn show_button(&mut self);

    /// Rendered height of the trigger button.
    fn button_height(&self) -> f32;

    /// Writes the button's inline line-height style, in pixels.
    fn set_button_line_height(&mut self, px: f32);

    /// Asks for an `on_frame` callback at the next display refresh.
    fn request_frame(&mut self);
}
