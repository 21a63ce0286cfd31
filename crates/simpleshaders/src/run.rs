use std::path::Path;

use anyhow::{bail, Context, Result};
use catalog::ShaderCatalog;
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::config;
use crate::paths::{AppPaths, ENV_CONFIG_DIR};
use crate::session::{run_session, SessionOptions, SessionReport, Step};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let loaded = config::load(config_path, &paths)?;
    let catalog = loaded.catalog()?;
    let policy = loaded.layout_policy();
    tracing::debug!(
        config = ?loaded.origin,
        shaders = catalog.len(),
        max_attempts = policy.max_attempts,
        "resolved pipeline settings"
    );

    let mut steps = args.script.clone();
    steps.extend(std::iter::repeat(Step::Click).take(args.clicks as usize));
    let mut options = SessionOptions {
        orientation: args.orientation,
        settle_frames: args.settle_frames,
        preloaded: args.preloaded,
        steps,
        ..SessionOptions::default()
    };
    if let Some(screen) = args.screen {
        options.screen = screen;
    }

    tracing::info!(
        shaders = catalog.len(),
        steps = options.steps.len(),
        orientation = options.orientation.degrees(),
        "starting camera pipeline session"
    );
    let report = run_session(catalog, policy, &options)?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialise session report")?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SessionReport) {
    println!("Canvas: {}", report.canvas);
    println!("Pipeline modules: {}", report.modules.join(", "));
    println!("Applied shaders:");
    for (call, shader) in report.applied.iter().enumerate() {
        println!("  {call:>3}  #{:<2} {}", shader.index, shader.name);
    }
    println!("Next shader index: {}", report.next_index);
    println!(
        "Button: {}, line-height {}",
        if report.button_visible {
            "visible"
        } else {
            "hidden"
        },
        match report.line_height {
            Some(px) => format!("{px}px"),
            None => "unset".to_string(),
        }
    );
    println!(
        "Viewport: {}x{} at orientation {} ({}) after {} frame(s)",
        report.viewport_width,
        report.viewport_height,
        report.orientation,
        if report.layout_settled {
            "settled"
        } else {
            "still rotating"
        },
        report.frames
    );
}

pub fn list(config_path: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(config_path)?;
    println!("Shaders ({}):", catalog.len());
    for (index, entry) in catalog.iter().enumerate() {
        let lines = entry.source.lines().count();
        println!("  {index:>2}  {:<20} {lines} lines", entry.name);
    }
    Ok(())
}

pub fn show(config_path: Option<&Path>, selector: &str) -> Result<()> {
    let catalog = load_catalog(config_path)?;
    let index = match selector.trim().parse::<usize>() {
        Ok(index) => index,
        Err(_) => match catalog.position(selector.trim()) {
            Some(index) => index,
            None => bail!("no shader named '{selector}'"),
        },
    };
    let Some(entry) = catalog.get(index) else {
        bail!(
            "shader index {index} is out of range; catalog has {} shaders",
            catalog.len()
        );
    };
    println!("// {}", entry.name);
    print!("{}", entry.source);
    if !entry.source.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn where_(config_path: Option<&Path>) -> Result<()> {
    let paths = AppPaths::discover()?;
    let default_file = paths.config_file();
    println!("Configuration:");
    println!("  config dir:   {}", paths.config_dir().display());
    println!(
        "  default file: {} ({})",
        default_file.display(),
        if default_file.is_file() {
            "present"
        } else {
            "missing"
        }
    );
    if let Some(path) = config_path {
        println!("  --config:     {}", path.display());
    }
    println!("  override env: {ENV_CONFIG_DIR}");
    Ok(())
}

fn load_catalog(config_path: Option<&Path>) -> Result<ShaderCatalog> {
    let paths = AppPaths::discover()?;
    config::load(config_path, &paths)?.catalog()
}
