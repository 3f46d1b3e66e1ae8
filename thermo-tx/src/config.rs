use serde::Deserialize;
use std::{fs, path::Path};

/// Runtime configuration: hardcoded defaults with an optional JSON file
/// layered on top. Built once at startup and handed to the polling loop;
/// nothing mutates it afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Thermocouple type code (B, E, J, K, N, R, S, T, VG8, VG32).
    pub tc_type: String,
    /// Seconds between polls.
    pub interval_seconds: u64,
    /// SPI bus device path.
    pub spi: String,
    /// GPIO character device holding the chip-select line.
    pub gpiochip: String,
    /// Chip-select line offset on `gpiochip`.
    pub cs_line: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tc_type: "K".into(),
            interval_seconds: 10,
            spi: "/dev/spidev0.0".into(),
            gpiochip: "/dev/gpiochip0".into(),
            cs_line: 16,
        }
    }
}

impl Config {
    /// Parse the file, with absent keys falling back to the defaults.
    ///
    /// A missing or malformed file logs a warning and yields the defaults
    /// unchanged.
    pub fn load(path: &Path) -> Config {
        let parsed = fs::read_to_string(path)
            .map_err(|e| log::warn!("config {}: {e}; using defaults", path.display()))
            .and_then(|text| {
                serde_json::from_str(&text)
                    .map_err(|e| log::warn!("config {}: {e}; using defaults", path.display()))
            });
        parsed.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn absent_keys_fall_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"tc_type": "T"}"#).unwrap();
        assert_eq!(cfg.tc_type, "T");
        assert_eq!(cfg.interval_seconds, 10);
        assert_eq!(cfg.spi, "/dev/spidev0.0");
        assert_eq!(cfg.gpiochip, "/dev/gpiochip0");
        assert_eq!(cfg.cs_line, 16);
    }

    #[test]
    fn file_keys_override_defaults() {
        let cfg: Config = serde_json::from_str(
            r#"{"tc_type": "N", "interval_seconds": 2, "spi": "/dev/spidev1.0",
                "gpiochip": "/dev/gpiochip1", "cs_line": 8}"#,
        )
        .unwrap();
        assert_eq!(cfg.tc_type, "N");
        assert_eq!(cfg.interval_seconds, 2);
        assert_eq!(cfg.spi, "/dev/spidev1.0");
        assert_eq!(cfg.gpiochip, "/dev/gpiochip1");
        assert_eq!(cfg.cs_line, 8);
    }
}
