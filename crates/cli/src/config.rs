//! Environment configuration for the CLI composition root

use entity_time_core::Zone;

/// Default zone override (IANA name, `UTC`, or `+HH:MM`), read by clap
pub const ENV_DEFAULT_TZ: &str = "ENTITY_TIME_DEFAULT_TZ";

/// `pretty` (default) or `json`
pub const ENV_LOG_FORMAT: &str = "ENTITY_TIME_LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "entity_time=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub default_zone: Zone,
    pub log_format: LogFormat,
    /// Problems found while loading, reported once logging is up
    pub warnings: Vec<String>,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `explicit_zone` is `--default-tz` or `ENTITY_TIME_DEFAULT_TZ`, already
    /// merged by clap. Without it `TZ` is tried, then the system zone.
    pub fn load(explicit_zone: Option<&str>) -> Self {
        Self::from_lookup(explicit_zone, |key| std::env::var(key).ok())
    }

    fn from_lookup(explicit_zone: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let zone_id = explicit_zone
            .map(str::to_string)
            .or_else(|| lookup("TZ").map(|tz| tz.trim_start_matches(':').to_string()));

        let mut warnings = Vec::new();
        let default_zone = match zone_id {
            Some(id) => Zone::parse(&id).unwrap_or_else(|e| {
                let zone = Zone::system();
                warnings.push(format!("{e}; using the system zone {zone}"));
                zone
            }),
            None => Zone::system(),
        };

        let log_format = match lookup(ENV_LOG_FORMAT).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            default_zone,
            log_format,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(None, env(&[]));
        assert_eq!(config.default_zone, Zone::system());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.warnings.is_empty());

        let filter = tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        assert_eq!(filter.to_string(), "entity_time=info");
    }

    #[test]
    fn test_zone_precedence() {
        let lookup = env(&[("TZ", "Europe/Paris")]);
        assert_eq!(
            Config::from_lookup(Some("UTC"), &lookup).default_zone,
            Zone::Utc
        );
        assert_eq!(
            Config::from_lookup(None, &lookup).default_zone,
            Zone::parse("Europe/Paris").unwrap()
        );

        let posix_style = env(&[("TZ", ":Asia/Tokyo")]);
        assert_eq!(
            Config::from_lookup(None, posix_style).default_zone,
            Zone::parse("Asia/Tokyo").unwrap()
        );
    }

    #[test]
    fn test_own_variable_is_left_to_clap() {
        let config = Config::from_lookup(None, env(&[(ENV_DEFAULT_TZ, "Asia/Tokyo")]));
        assert_eq!(config.default_zone, Zone::system());
    }

    #[test]
    fn test_bad_zone_falls_back_to_system() {
        let config = Config::from_lookup(Some("Nowhere/Land"), env(&[("TZ", "UTC")]));
        assert_eq!(config.default_zone, Zone::system());
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].contains("Nowhere/Land"));
    }

    #[test]
    fn test_json_log_format() {
        let config = Config::from_lookup(None, env(&[(ENV_LOG_FORMAT, "json")]));
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
