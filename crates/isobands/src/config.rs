//! Configuration for isoband generation.

use isoband_common::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration for one isoband pipeline.
///
/// Every field has a default, so a YAML file only needs the values it
/// changes:
///
/// ```yaml
/// floor: 10.0
/// step: 5.0
/// margins: { top: 2, bottom: 2, left: 1, right: 1 }
/// simplifier:
///   program: /usr/local/bin/Rscript
///   timeout_secs: 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsobandConfig {
    /// Minimum value of interest. Anything below becomes the sentinel.
    pub floor: f64,

    /// Width of each level.
    pub step: f64,

    /// Rows/columns forced to the sentinel at each edge.
    pub margins: EdgeMargins,

    /// Simplification tolerance handed to the collaborator.
    pub tolerance: f64,

    /// Scratch directory for file exchange with the collaborator.
    pub work_dir: PathBuf,

    /// Wrap longitudes above 180 into [-180, 180) after the initial transform.
    pub wrap_longitudes: bool,

    /// Split polygons into the four fixed quadrants.
    pub clip_quadrants: bool,

    /// How holes appear in the output.
    pub hole_mode: HoleMode,

    /// Offset subtracted from each level floor to get the contour threshold.
    pub level_epsilon: f64,

    /// External collaborator command.
    pub simplifier: SimplifierConfig,
}

impl Default for IsobandConfig {
    fn default() -> Self {
        Self {
            floor: 5.0,
            step: 2.5,
            margins: EdgeMargins::uniform(1),
            tolerance: 1000.0,
            work_dir: PathBuf::from("./tmp"),
            wrap_longitudes: true,
            clip_quadrants: true,
            hole_mode: HoleMode::Nested,
            level_epsilon: 1e-5,
            simplifier: SimplifierConfig::default(),
        }
    }
}

impl IsobandConfig {
    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply `ISOBAND_*` overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "ISOBAND_FLOOR") {
            config.floor = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_STEP") {
            config.step = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_MARGIN") {
            config.margins = EdgeMargins::uniform(v);
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_MARGIN_TOP") {
            config.margins.top = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_MARGIN_BOTTOM") {
            config.margins.bottom = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_MARGIN_LEFT") {
            config.margins.left = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_MARGIN_RIGHT") {
            config.margins.right = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_TOLERANCE") {
            config.tolerance = v;
        }
        if let Some(v) = lookup("ISOBAND_WORK_DIR") {
            config.work_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("ISOBAND_SIMPLIFIER") {
            config.simplifier.program = v;
        }
        if let Some(v) = parse_var(&lookup, "ISOBAND_SIMPLIFIER_TIMEOUT_SECS") {
            config.simplifier.timeout_secs = Some(v);
        }
        if let Some(v) = lookup("ISOBAND_KEEP_FILES") {
            config.simplifier.keep_files = v.to_lowercase() == "true" || v == "1";
        }

        config
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.floor.is_finite() {
            return Err(ConfigError::invalid("floor", "must be finite"));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::invalid("step", "must be > 0 and finite"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::invalid("tolerance", "must be >= 0 and finite"));
        }
        if !self.level_epsilon.is_finite()
            || self.level_epsilon < 0.0
            || self.level_epsilon >= self.step
        {
            return Err(ConfigError::invalid(
                "level_epsilon",
                "must be >= 0 and smaller than step",
            ));
        }
        self.simplifier.validate()
    }

    /// The no-data value: `floor - step * 10`.
    pub fn sentinel(&self) -> f64 {
        crate::preprocess::sentinel(self.floor, self.step)
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

/// Rows/columns forced to the sentinel at each edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMargins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl EdgeMargins {
    /// The same margin on all four edges.
    pub fn uniform(n: usize) -> Self {
        Self {
            top: n,
            bottom: n,
            left: n,
            right: n,
        }
    }

    /// True when cell `(x, y)` of a `width` x `height` grid is in a margin.
    pub fn contains(&self, x: usize, y: usize, width: usize, height: usize) -> bool {
        y < self.top
            || y + self.bottom >= height
            || x < self.left
            || x + self.right >= width
    }
}

impl Default for EdgeMargins {
    fn default() -> Self {
        Self::uniform(1)
    }
}

/// How hole rings are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoleMode {
    /// Holes are interior rings of their containing polygon.
    #[default]
    Nested,
    /// Fills are emitted exterior-only and every hole is its own feature
    /// flagged `isHole: true`.
    Separate,
}

/// External collaborator command line.
///
/// The collaborator is run as `<program> <args...> <dense> <simple> <tolerance>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifierConfig {
    pub program: String,
    pub args: Vec<String>,

    /// Kill the collaborator after this many seconds. `None` waits forever.
    pub timeout_secs: Option<u64>,

    /// Leave the exchange files in the work directory.
    pub keep_files: bool,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self {
            program: "Rscript".to_string(),
            args: vec!["isobands.R".to_string()],
            timeout_secs: Some(300),
            keep_files: false,
        }
    }
}

impl SimplifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.program.trim().is_empty() {
            return Err(ConfigError::invalid("simplifier.program", "must not be empty"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::invalid("simplifier.timeout_secs", "must be > 0"));
        }
        Ok(())
    }
}
