use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog::{builtin_entries, CatalogError, ShaderCatalog, ShaderEntry};
use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipeConfig {
    pub version: u32,
    /// Start the cycle with the bundled shaders before any listed here.
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub shaders: Vec<ShaderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub timeout: Option<Duration>,
    #[serde(
        default = "default_frame_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub frame_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShaderConfig {
    pub name: String,
    #[serde(default)]
    pub source: Option<String>,
    /// Relative paths resolve against the configuration file's directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            include_builtin: true,
            layout: LayoutConfig::default(),
            shaders: Vec::new(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: None,
            timeout: None,
            frame_interval: default_frame_interval(),
        }
    }
}

fn default_include_builtin() -> bool {
    true
}

fn default_frame_interval() -> Duration {
    Duration::from_millis(16)
}

/// Accepts a humantime string (`"250ms"`) or a whole number of seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration string or a whole number of seconds")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(v)
                .map(Duration::from_secs)
                .map_err(|_| E::custom("duration must be non-negative"))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration(deserializer).map(Some)
}

impl PipeConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: PipeConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if !self.include_builtin && self.shaders.is_empty() {
            return Err(ConfigError::Invalid(
                "include_builtin = false requires at least one [[shaders]] entry".into(),
            ));
        }

        let mut names = HashSet::new();
        if self.include_builtin {
            for entry in builtin_entries() {
                names.insert(entry.name);
            }
        }

        for shader in &self.shaders {
            let name = shader.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid(
                    "shader entries must have a non-empty name".into(),
                ));
            }
            match (&shader.source, &shader.path) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::Invalid(format!(
                        "shader '{name}' sets both source and path"
                    )))
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(format!(
                        "shader '{name}' needs either source or path"
                    )))
                }
                _ => {}
            }
            if !names.insert(name.to_string()) {
                return Err(ConfigError::Invalid(format!(
                    "shader name '{name}' is used more than once"
                )));
            }
        }

        if self.layout.frame_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "layout.frame_interval must be greater than zero".into(),
            ));
        }

        match (self.layout.max_attempts, self.layout.timeout) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "layout.max_attempts and layout.timeout are mutually exclusive".into(),
                ))
            }
            (Some(0), None) => {
                return Err(ConfigError::Invalid(
                    "layout.max_attempts must be greater than zero".into(),
                ))
            }
            (None, Some(timeout)) if timeout.is_zero() => {
                return Err(ConfigError::Invalid(
                    "layout.timeout must be greater than zero".into(),
                ))
            }
            _ => {}
        }

        Ok(())
    }

    /// Retry bound for the layout adjustment, if the file sets one.
    ///
    /// A timeout is converted to whole frames at `frame_interval`, rounding up.
    pub fn max_layout_attempts(&self) -> Option<u32> {
        if let Some(attempts) = self.layout.max_attempts {
            return Some(attempts);
        }
        let interval = self.layout.frame_interval.as_nanos().max(1);
        self.layout.timeout.map(|timeout| {
            let frames = timeout.as_nanos().div_ceil(interval).max(1);
            u32::try_from(frames).unwrap_or(u32::MAX)
        })
    }

    /// Builds the shader catalog, reading `path` entries relative to `base_dir`.
    pub fn build_catalog(&self, base_dir: &Path) -> Result<ShaderCatalog, ConfigError> {
        let mut entries = if self.include_builtin {
            builtin_entries()
        } else {
            Vec::new()
        };

        for shader in &self.shaders {
            let source = match (&shader.source, &shader.path) {
                (Some(source), _) => source.clone(),
                (None, Some(path)) => {
                    let resolved = if path.is_absolute() {
                        path.clone()
                    } else {
                        base_dir.join(path)
                    };
                    fs::read_to_string(&resolved).map_err(|source| ConfigError::Io {
                        path: resolved.clone(),
                        source,
                    })?
                }
                (None, None) => {
                    return Err(ConfigError::Invalid(format!(
                        "shader '{}' needs either source or path",
                        shader.name
                    )))
                }
            };
            entries.push(ShaderEntry::new(shader.name.trim(), source));
        }

        Ok(ShaderCatalog::from_entries(entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[layout]
timeout = "1s"
frame_interval = "20ms"

[[shaders]]
name = "invert"
source = """
precision mediump float;
varying vec2 texUv;
uniform sampler2D sampler;
void main() { vec4 c = texture2D(sampler, texUv); gl_FragColor = vec4(1.0 - c.rgb, c.a); }
"""
"#;

    #[test]
    fn parses_sample_config() {
        let config = PipeConfig::from_toml_str(SAMPLE).expect("parse config");
        assert!(config.include_builtin);
        assert_eq!(config.layout.frame_interval, Duration::from_millis(20));
        assert_eq!(config.max_layout_attempts(), Some(50));

        let catalog = config.build_catalog(Path::new(".")).unwrap();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.position("invert"), Some(6));
    }

    #[test]
    fn defaults_without_layout_section() {
        let config = PipeConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config.max_layout_attempts(), None);
        assert_eq!(config.layout.frame_interval, Duration::from_millis(16));
        assert_eq!(
            config.build_catalog(Path::new(".")).unwrap(),
            ShaderCatalog::builtin()
        );
    }

    #[test]
    fn durations_accept_seconds_or_strings() {
        let config =
            PipeConfig::from_toml_str("version = 1\n[layout]\ntimeout = 2\nframe_interval = \"500ms\"")
                .unwrap();
        assert_eq!(config.layout.timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.max_layout_attempts(), Some(4));

        let err = PipeConfig::from_toml_str("version = 1\n[layout]\ntimeout = -1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = PipeConfig::from_toml_str("version = 1\n[layout]\ntimeout = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = PipeConfig::from_toml_str("version = 1\ninclude_builtin = false").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_conflicting_layout_bounds() {
        let err = PipeConfig::from_toml_str(
            r#"
version = 1

[layout]
max_attempts = 10
timeout = "2s"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = PipeConfig::from_toml_str("version = 1\n[layout]\nmax_attempts = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_shadowing_builtin_name() {
        let err = PipeConfig::from_toml_str(
            r#"
version = 1

[[shaders]]
name = "sepia"
source = "void main() {}"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_ambiguous_shader_source() {
        let err = PipeConfig::from_toml_str(
            r#"
version = 1

[[shaders]]
name = "both"
source = "void main() {}"
path = "both.frag"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = PipeConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reads_shader_files_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("grey.frag"), "void main() { gl_FragColor = vec4(0.5); }")
            .unwrap();
        let config = PipeConfig::from_toml_str(
            r#"
version = 1
include_builtin = false

[[shaders]]
name = "grey"
path = "grey.frag"
"#,
        )
        .unwrap();

        let catalog = config.build_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.source(0).contains("vec4(0.5)"));
    }

    #[test]
    fn missing_shader_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipeConfig::from_toml_str(
            r#"
version = 1

[[shaders]]
name = "gone"
path = "gone.frag"
"#,
        )
        .unwrap();

        let err = config.build_catalog(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { ref path, .. } if path.ends_with("gone.frag")));
    }
}
