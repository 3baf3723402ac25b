// src/config/config_load.rs
//
// loading of config.toml

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config_types::{GridConfig, InteractionConfig, LayoutConfig, OscConfig, PathConfig, WindowConfig};
use crate::content::ContentOptions;
use crate::layout::{ContextPatch, LayoutContext};
use crate::physics::PhysicsConfig;
use crate::wall::WallSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub osc: OscConfig,
    pub paths: PathConfig,
    pub grid: GridConfig,
    pub layout: LayoutConfig,
    pub interaction: InteractionConfig,
    pub physics: PhysicsConfig,
    pub content: ContentOptions,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // First try to load from the executable's directory
        if let Some(exe_config) = Self::exe_dir().map(|dir| dir.join("config.toml")) {
            if exe_config.exists() {
                return Self::load_from(&exe_config);
            }
        }

        // Fallback to loading from the current working directory
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn resolve_content_path(&self) -> PathBuf {
        let path = Path::new(&self.paths.content_file);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        // relative paths resolve next to the executable when the file is there
        match Self::exe_dir().map(|dir| dir.join(path)) {
            Some(candidate) if candidate.exists() => candidate,
            _ => path.to_path_buf(),
        }
    }

    pub fn layout_context(&self) -> LayoutContext {
        LayoutContext::default().merged(&ContextPatch {
            cell_size: Some(self.grid.cell_size),
            spacing: Some(self.grid.spacing),
            tile_depth: Some(self.grid.tile_depth),
            scale: Some(self.grid.scale),
            wave: Some(self.layout.wave),
            masonry: Some(self.layout.masonry),
            chaos: Some(self.layout.chaos),
            ..Default::default()
        })
    }

    pub fn wall_settings(&self) -> WallSettings {
        WallSettings {
            follow_rate: self.interaction.follow_rate,
            content_footprints: self.grid.content_footprints,
            selection: self.interaction.selection,
            ripple: self.interaction.ripple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AssignmentMode, AxisDirection};
    use crate::layout::LayoutId;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.grid.size, 8);
        assert_eq!(config.osc.rx_port, 9000);
        assert_eq!(config.layout.initial, LayoutId::Grid);
        assert_eq!(config.physics, PhysicsConfig::default());
        assert!(config.content.repeat_content);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [grid]
            size = 12
            content_footprints = true

            [layout]
            initial = "helix"

            [layout.wave]
            amplitude = 0.5

            [interaction.ripple]
            radius = 5.0

            [physics]
            gravity = [0.0, -9.81, 0.0]

            [content]
            repeat_content = false

            [content.layout]
            mode = "axis"
            axis = "columns"
            axis_key = "topic"
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.size, 12);
        assert_eq!(config.grid.cell_size, 1.0);
        assert_eq!(config.layout.initial, LayoutId::Helix);
        assert_eq!(config.layout.wave.amplitude, 0.5);
        assert_eq!(config.layout.wave.frequency, 1.2);
        assert_eq!(config.interaction.ripple.radius, 5.0);
        assert_eq!(config.physics.gravity, [0.0, -9.81, 0.0]);
        assert_eq!(config.content.layout.mode, AssignmentMode::Axis);
        assert_eq!(config.content.layout.axis, AxisDirection::Columns);
        assert_eq!(config.content.layout.axis_key, "topic");
        assert!(config.wall_settings().content_footprints);
    }

    #[test]
    fn test_context_carries_grid_settings() {
        let config = Config::parse("[grid]\nspacing = 0.5\n").unwrap();
        let context = config.layout_context();
        assert_eq!(context.spacing, 0.5);
        assert_eq!(context.pitch(), 1.5);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(matches!(Config::parse("[grid]\nsize = \"big\""), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Config::load_from(Path::new("/definitely/not/here.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
