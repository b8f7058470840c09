//! # Decoder Configuration
//!
//! Layout and capacity of a [`BatchDecoder`](crate::BatchDecoder), chosen once
//! at start-up.
//!
//! ## Sources
//! - [`DecoderConfig::default()`] - plain layout, 256 records
//! - [`DecoderConfig::from_yaml()`] - a standalone YAML document
//! - [`split_header()`] - an optional YAML header at the top of an f0 source
//!
//! ## YAML Keys
//! ```yaml
//! layout: stateful   # plain | stateful | 3 | 4 | 3-field | 4-field
//! capacity: 64       # 1 to 65536
//! ```
//!
//! ## Header Example
//! ```rust
//! use f0_notes::{split_header, RecordLayout};
//!
//! let source = "---\nlayout: stateful\ncapacity: 8\n---\n0,100,440,64\n";
//! let (config, body) = split_header(source)?;
//! let config = config.unwrap_or_default();
//! assert_eq!(config.layout, RecordLayout::Stateful);
//! assert_eq!(config.capacity, 8);
//! assert_eq!(body, "0,100,440,64\n");
//! # Ok::<(), f0_notes::F0Error>(())
//! ```

use crate::error::F0Error;
use crate::record::RecordLayout;
use serde::Deserialize;

pub const DEFAULT_CAPACITY: usize = 256;

/// Largest record buffer a decoder will allocate.
pub const MAX_CAPACITY: usize = 65_536;

const HEADER_MARKER: &str = "---";

/// Typed decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub layout: RecordLayout,
    pub capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            layout: RecordLayout::Plain,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    // Accepts `plain` as well as a bare `3` or `4`
    pub layout: Option<serde_yaml::Value>,
    pub capacity: Option<i64>,
}

impl DecoderConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, F0Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| F0Error::ConfigError(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, F0Error> {
        let mut config = Self::default();

        if let Some(value) = raw.layout {
            let name = match &value {
                serde_yaml::Value::String(s) => s.clone(),
                serde_yaml::Value::Number(n) => n.to_string(),
                other => {
                    return Err(F0Error::ConfigError(format!(
                        "layout must be a name or field count, got {:?}",
                        other
                    )))
                }
            };
            config.layout = RecordLayout::from_name(&name)
                .ok_or_else(|| F0Error::ConfigError(format!("Unknown layout: {}", name)))?;
        }

        if let Some(capacity) = raw.capacity {
            if capacity < 1 {
                return Err(F0Error::ConfigError(format!(
                    "capacity must be at least 1, got {}",
                    capacity
                )));
            }
            config.capacity = usize::try_from(capacity)
                .ok()
                .filter(|c| *c <= MAX_CAPACITY)
                .ok_or_else(|| {
                    F0Error::ConfigError(format!(
                        "capacity must be at most {}, got {}",
                        MAX_CAPACITY, capacity
                    ))
                })?;
        }

        Ok(config)
    }

    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Split an optional `---` delimited YAML header off an f0 source.
///
/// Returns the configuration it selects (`None` when there is no header)
/// and the remaining record text. An opening marker without a closing one is
/// a [`F0Error::ConfigError`].
pub fn split_header(source: &str) -> Result<(Option<DecoderConfig>, &str), F0Error> {
    let trimmed = source.trim_start();
    if !trimmed.starts_with(HEADER_MARKER) {
        return Ok((None, source));
    }

    let after_open = &trimmed[HEADER_MARKER.len()..];
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))
        .ok_or_else(|| F0Error::ConfigError("header marker must be on its own line".to_string()))?;

    // Closing marker must fill a whole line
    let mut start = 0;
    let (close, line_end) = loop {
        let line_end = after_open[start..].find('\n').map(|i| start + i);
        let line = &after_open[start..line_end.unwrap_or(after_open.len())];
        if line.trim_end_matches('\r') == HEADER_MARKER {
            break (start, line_end);
        }
        match line_end {
            Some(end) => start = end + 1,
            None => return Err(F0Error::ConfigError("unterminated header".to_string())),
        }
    };

    let config = DecoderConfig::from_yaml(&after_open[..close])?;

    let body = match line_end {
        Some(end) => &after_open[end + 1..],
        None => "",
    };

    Ok((Some(config), body))
}
