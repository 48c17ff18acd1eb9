use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_log_window_hours")]
    pub log_window_hours: u64,
    #[serde(default = "default_cpu_sample_millis")]
    pub cpu_sample_millis: u64,
    #[serde(default = "default_disk_warn_threshold_percent")]
    pub disk_warn_threshold_percent: f64,
    #[serde(default)]
    pub log_source: LogSourceConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSourceConfig {
    #[serde(default = "default_log_program")]
    pub program: String,
    #[serde(default = "default_log_args")]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            format: OutputFormat::default(),
            title: default_title(),
            log_window_hours: default_log_window_hours(),
            cpu_sample_millis: default_cpu_sample_millis(),
            disk_warn_threshold_percent: default_disk_warn_threshold_percent(),
            log_source: LogSourceConfig::default(),
        }
    }
}

impl Default for LogSourceConfig {
    fn default() -> Self {
        Self {
            program: default_log_program(),
            args: default_log_args(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_path must not be empty".to_string(),
            ));
        }
        if !(1..=8760).contains(&self.log_window_hours) {
            return Err(ConfigError::Validation(
                "log_window_hours must be in range 1..8760".to_string(),
            ));
        }
        if self.cpu_sample_millis < 200 {
            return Err(ConfigError::Validation(
                "cpu_sample_millis must be >= 200".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.disk_warn_threshold_percent) {
            return Err(ConfigError::Validation(
                "disk_warn_threshold_percent must be in range 0..100".to_string(),
            ));
        }
        if self.log_source.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log_source.program must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn log_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.log_window_hours as i64)
    }

    pub fn cpu_sample(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_millis)
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

fn default_output_path() -> String {
    "health_check.html".to_string()
}

fn default_title() -> String {
    "System Health Check".to_string()
}

const fn default_log_window_hours() -> u64 {
    24
}

const fn default_cpu_sample_millis() -> u64 {
    1000
}

const fn default_disk_warn_threshold_percent() -> f64 {
    80.0
}

fn default_log_program() -> String {
    "errpt".to_string()
}

fn default_log_args() -> Vec<String> {
    ["-a", "-d", "H"].iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().expect("default config must validate");
        assert_eq!(cfg.output_path, "health_check.html");
        assert_eq!(cfg.format, OutputFormat::Html);
        assert_eq!(cfg.log_window(), chrono::Duration::hours(24));
        assert_eq!(cfg.cpu_sample(), Duration::from_secs(1));
    }

    #[test]
    fn example_yaml_parses_and_validates() {
        let cfg: Config = serde_yaml::from_str(Config::example_yaml()).expect("example parses");
        cfg.validate().expect("example validates");
        assert_eq!(cfg.log_source.program, "errpt");
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str("format: json\nlog_window_hours: 6\n")
            .expect("partial config parses");
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.log_window_hours, 6);
        assert_eq!(cfg.output_path, "health_check.html");
        assert_eq!(cfg.log_source.args, vec!["-a", "-d", "H"]);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut cfg = Config::default();
        cfg.log_window_hours = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation(_))));

        let mut cfg = Config::default();
        cfg.disk_warn_threshold_percent = 120.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.cpu_sample_millis = 10;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.log_source.program = "  ".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load_from_file("/nonexistent/healthcheck.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
