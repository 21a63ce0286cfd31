use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pipeline::{Orientation, Viewport};

use crate::session::Step;

#[derive(Parser, Debug)]
#[command(
    name = "simpleshaders",
    author,
    version,
    args_conflicts_with_subcommands = true,
    about = "Cycle camera-feed fragment shaders through a headless camera pipeline"
)]
pub struct Cli {
    /// Pipeline configuration file (defaults to `<config dir>/pipeline.toml` when present).
    #[arg(long, value_name = "FILE", global = true, env = "SIMPLESHADERS_CONFIG")]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Device orientation when the camera starts: 0, 90, 180, or -90.
    #[arg(
        long,
        value_name = "DEGREES",
        default_value = "0",
        allow_hyphen_values = true,
        value_parser = parse_orientation
    )]
    pub orientation: Orientation,

    /// Comma-separated interactions: `click`, `frame`, `rotate:DEGREES`.
    #[arg(long, value_name = "STEPS", value_delimiter = ',', value_parser = parse_step)]
    pub script: Vec<Step>,

    /// Extra button clicks appended after the script.
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub clicks: u32,

    /// Display refreshes the simulated viewport needs to follow a rotation.
    #[arg(long, value_name = "FRAMES", default_value_t = 2)]
    pub settle_frames: u32,

    /// Device screen size in portrait (e.g. `390x844`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_screen)]
    pub screen: Option<Viewport>,

    /// Treat the host runtime as loaded before the page script runs.
    #[arg(long)]
    pub preloaded: bool,

    /// Print the session report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the shaders in cycling order.
    List,
    /// Print the source of one shader, by index or name.
    Show {
        #[arg(value_name = "INDEX|NAME")]
        shader: String,
    },
    /// Print the resolved configuration paths.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_orientation(value: &str) -> Result<Orientation, String> {
    value.parse().map_err(|err: pipeline::PipelineError| err.to_string())
}

pub fn parse_step(value: &str) -> Result<Step, String> {
    value.parse()
}

pub fn parse_screen(value: &str) -> Result<Viewport, String> {
    let trimmed = value.trim();
    let (w, h) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err("screen dimensions must be greater than zero".into());
    }
    Ok(Viewport::new(width as f32, height as f32))
}
