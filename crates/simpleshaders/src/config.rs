use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use catalog::ShaderCatalog;
use cycler::LayoutPolicy;
use pipeconfig::PipeConfig;

use crate::paths::AppPaths;

/// Configuration plus the directory its relative shader paths resolve against.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: PipeConfig,
    pub base_dir: PathBuf,
    pub origin: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn catalog(&self) -> Result<ShaderCatalog> {
        self.config
            .build_catalog(&self.base_dir)
            .context("failed to build shader catalog")
    }

    pub fn layout_policy(&self) -> LayoutPolicy {
        match self.config.max_layout_attempts() {
            Some(max_attempts) => LayoutPolicy { max_attempts },
            None => LayoutPolicy::default(),
        }
    }
}

/// Loads `explicit` when given, otherwise the default file if it exists.
pub fn load(explicit: Option<&Path>, paths: &AppPaths) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let default = paths.config_file();
            if !default.is_file() {
                tracing::debug!(
                    path = %default.display(),
                    "no config file found; using bundled shaders"
                );
                return Ok(LoadedConfig {
                    config: PipeConfig::default(),
                    base_dir: paths.config_dir().to_path_buf(),
                    origin: None,
                });
            }
            default
        }
    };

    let config = PipeConfig::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(path = %path.display(), shaders = config.shaders.len(), "loaded config");
    Ok(LoadedConfig {
        config,
        base_dir,
        origin: Some(path),
    })
}
