use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use menu_console::config::{self, EngineConfig};

/// Menu console: keyboard and mouse driven text menus
#[derive(Parser, Debug)]
#[command(version, about = "Menu console demo")]
pub struct Cli {
    /// KEY=VALUE file overriding engine defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Viewport width in cells (default: whole terminal)
    #[arg(long)]
    pub width: Option<u16>,

    /// Viewport height in cells (default: whole terminal)
    #[arg(long)]
    pub height: Option<u16>,

    /// Do not capture the mouse
    #[arg(long)]
    pub no_mouse: bool,

    /// Write logs to this file (RUST_LOG sets the filter)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load(path)?,
            None => EngineConfig::default(),
        };
        if self.width.is_some() {
            cfg.viewport_width = self.width;
        }
        if self.height.is_some() {
            cfg.viewport_height = self.height;
        }
        if self.no_mouse {
            cfg.mouse = false;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["menu-console", "--width", "50", "--no-mouse"]);
        let cfg = cli.engine_config().unwrap();
        assert_eq!(cfg.viewport_width, Some(50));
        assert_eq!(cfg.viewport_height, None);
        assert!(!cfg.mouse);
    }
}
