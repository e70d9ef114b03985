//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (reproduce the reference concept-map look)
//! 2. Global config: `$XDG_CONFIG_HOME/notemap/notemap.toml`
//! 3. Local config: `<project_dir>/.notemap.toml`
//! 4. Environment variables: `NOTEMAP_*` prefix, `__` between section and key
//!    (e.g. `NOTEMAP_ZOOM__MAX_SCALE=5`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{LayoutConfig, Viewport, ZoomConfig};

/// Drawing surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width used when the surface size is not given on the command line
    pub width: f64,
    /// Fixed surface height; layout band and initial centering derive from it
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

/// Colours, sizes and fonts of the rendered map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub background: String,
    pub link_color: String,
    pub link_width: f64,
    /// Outline of every marker and fill of internal markers
    pub node_color: String,
    /// Fill of leaf markers
    pub leaf_fill: String,
    pub node_radius: f64,
    pub node_stroke_width: f64,
    pub label_color: String,
    /// Distance between marker center and label anchor
    pub label_offset: f64,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: u16,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".into(),
            link_color: "#e2e8f0".into(),
            link_width: 1.5,
            node_color: "#0f172a".into(),
            leaf_fill: "#ffffff".into(),
            node_radius: 5.0,
            node_stroke_width: 2.0,
            label_color: "#1e293b".into(),
            label_offset: 10.0,
            font_family: "Inter, sans-serif".into(),
            font_size: 13.0,
            font_weight: 500,
        }
    }
}

/// Unified configuration for notemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub viewport: ViewportConfig,
    pub layout: LayoutConfig,
    pub zoom: ZoomConfig,
    pub style: StyleConfig,
}

/// Get the XDG config directory for notemap.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "notemap").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("notemap.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".notemap.toml")
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// Later layers override single keys of earlier ones; unspecified keys
    /// keep their inherited value.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Config::try_from(&Settings::default()).map_err(config_err)?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                builder = builder.add_source(File::from(local_path).required(true));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("NOTEMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would produce a degenerate map.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let invalid = |message: String| Err(ApplicationError::Config { message });

        self.viewport.viewport().validate()?;
        self.zoom.validate()?;
        if !(self.zoom.min_scale..=self.zoom.max_scale).contains(&self.zoom.initial_scale) {
            return invalid(format!(
                "zoom.initial_scale {} outside [{}, {}]",
                self.zoom.initial_scale, self.zoom.min_scale, self.zoom.max_scale
            ));
        }
        if !(self.zoom.double_click_factor.is_finite() && self.zoom.double_click_factor > 0.0) {
            return invalid(format!(
                "zoom.double_click_factor must be positive: {}",
                self.zoom.double_click_factor
            ));
        }
        if !(self.layout.band_factor > 0.0 && self.layout.depth_factor > 0.0) {
            return invalid(format!(
                "layout factors must be positive: band_factor={}, depth_factor={}",
                self.layout.band_factor, self.layout.depth_factor
            ));
        }
        if self.style.node_radius < 0.0 || self.style.font_size <= 0.0 {
            return invalid(format!(
                "style: node_radius={} font_size={}",
                self.style.node_radius, self.style.font_size
            ));
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# notemap configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/notemap/notemap.toml
#   Local:  <project_dir>/.notemap.toml
#   Env:    NOTEMAP_<SECTION>__<KEY>, e.g. NOTEMAP_ZOOM__MAX_SCALE=5

[viewport]
# width = 960.0
# height = 500.0

[layout]
# Sibling axis spans band_factor * viewport height
# band_factor = 1.5
# Deepest level sits at depth_factor * viewport width
# depth_factor = 0.8

[zoom]
# min_scale = 0.1
# max_scale = 3.0
# initial_scale = 0.8
# margin_left = 80.0
# margin_top = 50.0
# wheel_sensitivity = 0.002
# double_click_factor = 2.0

[style]
# background = "#ffffff"
# link_color = "#e2e8f0"
# link_width = 1.5
# node_color = "#0f172a"
# leaf_fill = "#ffffff"
# node_radius = 5.0
# node_stroke_width = 2.0
# label_color = "#1e293b"
# label_offset = 10.0
# font_family = "Inter, sans-serif"
# font_size = 13.0
# font_weight = 500
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
