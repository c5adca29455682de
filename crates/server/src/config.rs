use std::str::FromStr;
use std::time::Duration;

use taplist_core::AssemblyOptions;
use taplist_ocr::{CropFormat, DarknessPolicy, DetectorConfig, EngineSettings, PipelineConfig};
use thiserror::Error;

use crate::fetch::ImageLocation;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PAGE_URL: &str = "https://www.ajsbeerwarehouse.com/draft-list/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub location: ImageLocation,
    pub pipeline: PipelineConfig,
    pub fetch_timeout: Duration,
    pub engine: EngineSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let location = match (get("TAPLIST_IMAGE_URL"), get("TAPLIST_PAGE_URL")) {
            (Some(url), _) => ImageLocation::Direct(url),
            (None, Some(url)) => ImageLocation::Page(url),
            (None, None) => ImageLocation::Page(DEFAULT_PAGE_URL.to_string()),
        };

        let defaults = DetectorConfig::default();
        let detector = DetectorConfig {
            x_offset: parse(&get, "TAPLIST_X_OFFSET", defaults.x_offset)?,
            y_offset: parse(&get, "TAPLIST_Y_OFFSET", defaults.y_offset)?,
            column_policy: parse::<DarknessPolicy>(&get, "TAPLIST_COLUMN_THRESHOLD", defaults.column_policy)?,
            row_policy: parse::<DarknessPolicy>(&get, "TAPLIST_ROW_THRESHOLD", defaults.row_policy)?,
            merge_runs: parse_flag(&get, "TAPLIST_MERGE_LINE_RUNS", defaults.merge_runs)?,
        };

        let pipeline = PipelineConfig {
            detector,
            crop_format: parse::<CropFormat>(&get, "TAPLIST_CROP_FORMAT", CropFormat::default())?,
            assembly: AssemblyOptions {
                correct_strength: parse_flag(&get, "TAPLIST_STRENGTH_CORRECTION", true)?,
            },
        };

        Ok(Config {
            port: parse(&get, "PORT", DEFAULT_PORT)?,
            location,
            pipeline,
            fetch_timeout: Duration::from_secs(parse(&get, "TAPLIST_FETCH_TIMEOUT_SECS", 30u64)?),
            engine: EngineSettings {
                data_path: get("TESSDATA_PREFIX"),
                lang: get("TAPLIST_OCR_LANG").unwrap_or_else(|| "eng".to_string()),
            },
        })
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_flag(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = get(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.location, ImageLocation::Page(DEFAULT_PAGE_URL.to_string()));
        assert_eq!(c.pipeline.detector, DetectorConfig::default());
        assert_eq!(c.pipeline.crop_format, CropFormat::Png);
        assert!(c.pipeline.assembly.correct_strength);
        assert_eq!(c.fetch_timeout, Duration::from_secs(30));
        assert_eq!(c.engine.lang, "eng");
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        assert_eq!(config(&[("PORT", "")]).unwrap().port, 8080);
        assert_eq!(config(&[("PORT", "9000")]).unwrap().port, 9000);
    }

    #[test]
    fn bad_port_names_the_variable() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        let ConfigError::Invalid { var, value, .. } = err;
        assert_eq!(var, "PORT");
        assert_eq!(value, "eighty");
    }

    #[test]
    fn direct_image_url_wins_over_page() {
        let c = config(&[
            ("TAPLIST_IMAGE_URL", "https://example.com/list.png"),
            ("TAPLIST_PAGE_URL", "https://example.com/"),
        ])
        .unwrap();
        assert_eq!(c.location, ImageLocation::Direct("https://example.com/list.png".into()));
    }

    #[test]
    fn detector_settings_are_configurable() {
        let c = config(&[
            ("TAPLIST_X_OFFSET", "1"),
            ("TAPLIST_Y_OFFSET", "4"),
            ("TAPLIST_COLUMN_THRESHOLD", "black"),
            ("TAPLIST_ROW_THRESHOLD", "sum<30"),
            ("TAPLIST_MERGE_LINE_RUNS", "yes"),
            ("TAPLIST_CROP_FORMAT", "jpeg"),
            ("TAPLIST_STRENGTH_CORRECTION", "off"),
        ])
        .unwrap();
        let d = c.pipeline.detector;
        assert_eq!((d.x_offset, d.y_offset), (1, 4));
        assert_eq!(d.column_policy, DarknessPolicy::ExactBlack);
        assert_eq!(d.row_policy, DarknessPolicy::ChannelSumBelow(30));
        assert!(d.merge_runs);
        assert_eq!(c.pipeline.crop_format, CropFormat::Jpeg);
        assert!(!c.pipeline.assembly.correct_strength);
    }

    #[test]
    fn bad_threshold_is_rejected() {
        assert!(config(&[("TAPLIST_ROW_THRESHOLD", "grey")]).is_err());
        assert!(config(&[("TAPLIST_MERGE_LINE_RUNS", "maybe")]).is_err());
    }
}
