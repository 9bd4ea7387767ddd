//! `key: value` configuration file for the board viewer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::board::model::DEFAULT_SPAWN_EXTENT;

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 0.40;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Terminal columns per canvas unit.
    pub zoom: f32,
    pub spawn_extent: f64,
    pub move_step: f64,
    pub resize_step: f64,
    pub log_level: String,
    pub show_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zoom: 0.15,
            spawn_extent: DEFAULT_SPAWN_EXTENT,
            move_step: 10.0,
            resize_step: 10.0,
            log_level: "info".to_string(),
            show_links: true,
        }
    }
}

/// Read `path`, or return defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse(content: &str) -> Result<Config> {
    let mut config = Config::default();
    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("line {}: expected `key: value`, got {:?}", line_no + 1, raw);
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "zoom" => {
                let zoom = parse_number::<f32>(value, key, line_no)?;
                if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
                    bail!(
                        "line {}: zoom must be between {} and {}",
                        line_no + 1,
                        MIN_ZOOM,
                        MAX_ZOOM
                    );
                }
                config.zoom = zoom;
            }
            "spawn_extent" => config.spawn_extent = parse_positive(value, key, line_no)?,
            "move_step" => config.move_step = parse_positive(value, key, line_no)?,
            "resize_step" => config.resize_step = parse_positive(value, key, line_no)?,
            "log_level" => {
                let level = value.to_ascii_lowercase();
                if !matches!(
                    level.as_str(),
                    "error" | "warn" | "info" | "debug" | "trace"
                ) {
                    bail!("line {}: unknown log level {:?}", line_no + 1, value);
                }
                config.log_level = level;
            }
            "show_links" => {
                config.show_links = match value {
                    "true" => true,
                    "false" => false,
                    other => bail!(
                        "line {}: show_links must be true or false, got {:?}",
                        line_no + 1,
                        other
                    ),
                };
            }
            other => bail!("line {}: unknown key {:?}", line_no + 1, other),
        }
    }
    Ok(config)
}

pub fn serialize(config: &Config) -> String {
    format!(
        "\
# cardboard configuration
# Pass with: cardboard view --config <path>

# Terminal columns per canvas unit ({min} - {max})
zoom: {}

# New cards appear at random in [0, spawn_extent) on both axes
spawn_extent: {}

# Canvas units per arrow key press while moving a card
move_step: {}

# Canvas units per arrow key press while resizing a card
resize_step: {}

# Options: error | warn | info | debug | trace
log_level: {}

# Draw the arrows linking each card to the next one
show_links: {}
",
        config.zoom,
        config.spawn_extent,
        config.move_step,
        config.resize_step,
        config.log_level,
        config.show_links,
        min = MIN_ZOOM,
        max = MAX_ZOOM,
    )
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str, line_no: usize) -> Result<T> {
    value
        .parse::<T>()
        .ok()
        .with_context(|| format!("line {}: {} is not a number: {:?}", line_no + 1, key, value))
}

fn parse_positive(value: &str, key: &str, line_no: usize) -> Result<f64> {
    let n = parse_number::<f64>(value, key, line_no)?;
    if !n.is_finite() || n <= 0.0 {
        bail!("line {}: {} must be a positive number", line_no + 1, key);
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_survives_serialize_and_parse() {
        let config = Config::default();
        assert_eq!(parse(&serialize(&config)).unwrap(), config);
    }

    #[test]
    fn parse_overrides_only_given_keys() {
        let config = parse("# comment\n\nzoom: 0.2\nshow_links: false\n").unwrap();
        assert_eq!(config.zoom, 0.2);
        assert!(!config.show_links);
        assert_eq!(config.spawn_extent, DEFAULT_SPAWN_EXTENT);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn parse_rejects_unknown_key_with_line_number() {
        let err = parse("zoom: 0.1\ncolour: red\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn parse_rejects_out_of_range_values() {
        assert!(parse("zoom: 3\n").is_err());
        assert!(parse("move_step: 0\n").is_err());
        assert!(parse("spawn_extent: nan\n").is_err());
        assert!(parse("log_level: loud\n").is_err());
        assert!(parse("show_links: yes\n").is_err());
        assert!(parse("just a line\n").is_err());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cardboard.conf");
        fs::write(&path, "resize_step: 25\nlog_level: DEBUG\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.resize_step, 25.0);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn load_without_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), Config::default());
    }

    #[test]
    fn load_missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.conf");
        let err = load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("absent.conf"));
    }
}
