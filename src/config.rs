use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::detection::{clarifai, DetectionSettings};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON recipe catalog; the bundled catalog is used when unset
    #[serde(default)]
    pub recipes_path: Option<PathBuf>,

    /// Default cap on match results when a request sets none
    #[serde(default)]
    pub match_limit: Option<usize>,

    /// Clarifai personal access token
    #[serde(default)]
    pub clarifai_pat: Option<String>,

    /// Clarifai model outputs URL
    #[serde(default = "default_clarifai_api_url")]
    pub clarifai_api_url: String,

    /// Minimum concept confidence accepted from the recognition provider
    #[serde(default = "default_detection_min_confidence")]
    pub detection_min_confidence: f32,

    /// Maximum number of detected ingredients returned per image
    #[serde(default = "default_detection_max_ingredients")]
    pub detection_max_ingredients: usize,

    /// Timeout for recognition provider requests
    #[serde(default = "default_detection_timeout_secs")]
    pub detection_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_clarifai_api_url() -> String {
    clarifai::DEFAULT_API_URL.to_string()
}

fn default_detection_min_confidence() -> f32 {
    0.75
}

fn default_detection_max_ingredients() -> usize {
    8
}

fn default_detection_timeout_secs() -> u64 {
    15
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn detection_settings(&self) -> DetectionSettings {
        DetectionSettings {
            min_confidence: self.detection_min_confidence,
            max_ingredients: self.detection_max_ingredients,
        }
    }

    pub fn detection_timeout(&self) -> Duration {
        Duration::from_secs(self.detection_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.recipes_path.is_none());
        assert!(config.match_limit.is_none());
        assert!(config.clarifai_pat.is_none());
        assert_eq!(config.clarifai_api_url, clarifai::DEFAULT_API_URL);
        assert_eq!(config.detection_settings(), DetectionSettings::default());
        assert_eq!(config.detection_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("RECIPES_PATH", "/srv/recipes.json"),
            ("MATCH_LIMIT", "12"),
            ("CLARIFAI_PAT", "secret"),
            ("DETECTION_MIN_CONFIDENCE", "0.5"),
            ("DETECTION_MAX_INGREDIENTS", "4"),
        ]);

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.recipes_path, Some(PathBuf::from("/srv/recipes.json")));
        assert_eq!(config.match_limit, Some(12));
        assert_eq!(config.clarifai_pat.as_deref(), Some("secret"));
        assert_eq!(config.detection_settings().min_confidence, 0.5);
        assert_eq!(config.detection_settings().max_ingredients, 4);
    }
}
