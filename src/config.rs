//! Engine configuration: defaults, overridable from a `KEY=VALUE` file.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::backend::Size;
use crate::defaults::Defaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// How long the keyboard reader waits before rechecking its run flag.
    pub key_poll: Duration,
    pub pointer_poll: Duration,
    /// Extra pause after a click so one press is not seen twice.
    pub click_debounce: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_poll: Duration::from_millis(Defaults::KEY_POLL_MS),
            pointer_poll: Duration::from_millis(Defaults::POINTER_POLL_MS),
            click_debounce: Duration::from_millis(Defaults::CLICK_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub input: InputConfig,
    pub mouse: bool,
    pub cursor_blink_percent: u8,
    pub viewport_width: Option<u16>,
    pub viewport_height: Option<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            mouse: Defaults::MOUSE,
            cursor_blink_percent: Defaults::CURSOR_BLINK_PERCENT,
            viewport_width: None,
            viewport_height: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by whatever keys `contents` sets.
    pub fn from_env_file(contents: &str) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply(&parse_env(contents))?;
        Ok(cfg)
    }

    pub fn apply(&mut self, vars: &HashMap<String, String>) -> Result<()> {
        if let Some(ms) = lookup::<u64>(vars, "KEY_POLL_MS")? {
            self.input.key_poll = Duration::from_millis(ms);
        }
        if let Some(ms) = lookup::<u64>(vars, "POINTER_POLL_MS")? {
            self.input.pointer_poll = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = lookup::<u64>(vars, "CLICK_DEBOUNCE_MS")? {
            self.input.click_debounce = Duration::from_millis(ms);
        }
        if let Some(p) = lookup::<u8>(vars, "CURSOR_BLINK_PERCENT")? {
            self.cursor_blink_percent = p.min(100);
        }
        if let Some(w) = lookup::<u16>(vars, "VIEWPORT_WIDTH")? {
            self.viewport_width = Some(w);
        }
        if let Some(h) = lookup::<u16>(vars, "VIEWPORT_HEIGHT")? {
            self.viewport_height = Some(h);
        }
        if let Some(m) = lookup::<bool>(vars, "MOUSE")? {
            self.mouse = m;
        }
        Ok(())
    }

    /// Requested viewport; unset dimensions fall back to `max`.
    pub fn viewport(&self, max: Size) -> Size {
        Size::new(
            self.viewport_width.unwrap_or(max.width),
            self.viewport_height.unwrap_or(max.height),
        )
    }
}

fn lookup<T: FromStr>(vars: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    vars.get(key)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value {v:?} for {key}")))
        .transpose()
}

/// `KEY=VALUE` lines; blank lines and `#` comments skipped, surrounding
/// quotes stripped.
pub fn parse_env(contents: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((k, vraw)) = trimmed.split_once('=') else { continue };
        let key = k.trim().to_string();
        let mut val = vraw.trim();

        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        out.insert(key, val.to_string());
    }

    out
}

/// Reads a config file, naming it in the error.
pub fn load(path: &std::path::Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    EngineConfig::from_env_file(&text).map_err(|e| anyhow!("{}: {e:#}", path.display()))
}
