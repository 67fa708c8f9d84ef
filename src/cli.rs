use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Textured grid raycaster with point lights
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lumencast")]
#[command(about = "Walk a grid map rendered with DDA walls and lit floors")]
pub struct Cli {
    /// Map name inside the maps directory (".txt" optional)
    pub map: Option<String>,

    /// TOML settings file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Window width in pixels (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Window height in pixels (overrides the config file)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Start with lighting turned off
    #[arg(long)]
    pub no_lighting: bool,

    /// Directory holding the map files
    #[arg(long)]
    pub maps_dir: Option<PathBuf>,
}

impl Cli {
    /// Folds command line overrides into the loaded settings.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(w) = self.width {
            config.window.width = w;
        }
        if let Some(h) = self.height {
            config.window.height = h;
        }
        if let Some(dir) = &self.maps_dir {
            config.maps_dir = dir.clone();
        }
    }
}
