use serde::Deserialize;

use crate::services::{features::FeatureStrategy, similarity::IndexStrategy, DEFAULT_RECOMMENDATIONS};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// How movies are turned into feature vectors (`text` or `categorical`)
    #[serde(default)]
    pub feature_strategy: FeatureStrategy,

    /// How neighbors are searched (`pairwise` or `nearest_neighbor`)
    #[serde(default)]
    pub index_strategy: IndexStrategy,

    /// Recommendation count used when the request does not pass `k`
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,
}

fn default_catalog_path() -> String {
    "data/movies.csv".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendations() -> usize {
    DEFAULT_RECOMMENDATIONS
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.catalog_path, "data/movies.csv");
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.feature_strategy, FeatureStrategy::Categorical);
        assert_eq!(config.index_strategy, IndexStrategy::NearestNeighbor);
        assert_eq!(config.default_recommendations, DEFAULT_RECOMMENDATIONS);
    }

    #[test]
    fn test_strategies_from_env() {
        let config = Config::from_vars(vars(&[
            ("FEATURE_STRATEGY", "text"),
            ("INDEX_STRATEGY", "pairwise"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.feature_strategy, FeatureStrategy::Text);
        assert_eq!(config.index_strategy, IndexStrategy::Pairwise);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result = Config::from_vars(vars(&[("FEATURE_STRATEGY", "embeddings")]));
        assert!(result.is_err());
    }
}
