//! Application configuration. Record location, simulated latency, transcript fees.

use serde::Deserialize;

pub const DEFAULT_RECORD_PATH: &str = "./data/record.json";
pub const DEFAULT_SUBMISSION_DELAY_MS: u64 = 800;
pub const DEFAULT_OFFICIAL_FEE: f64 = 10.0;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Academic record JSON file. Read from PORTAL_RECORD_PATH.
    #[serde(default)]
    pub record_path: Option<String>,

    /// Simulated latency for request submissions. Read from PORTAL_SUBMISSION_DELAY_MS.
    #[serde(default)]
    pub submission_delay_ms: Option<u64>,

    /// Fee per copy of an official transcript. Read from PORTAL_OFFICIAL_FEE.
    #[serde(default)]
    pub official_fee: Option<f64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ::config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = ::config::Config::builder();
        if let Ok(path) = std::env::var("PORTAL_CONFIG") {
            c = c.add_source(::config::File::with_name(&path));
        }
        c = c.add_source(::config::Environment::with_prefix("PORTAL").try_parsing(true));
        c.build()?.try_deserialize()
    }

    pub fn record_path_or_default(&self) -> String {
        self.record_path
            .clone()
            .unwrap_or_else(|| DEFAULT_RECORD_PATH.to_string())
    }

    pub fn submission_delay_ms_or_default(&self) -> u64 {
        self.submission_delay_ms
            .unwrap_or(DEFAULT_SUBMISSION_DELAY_MS)
    }

    /// Negative fees from a bad config are clamped to zero.
    pub fn official_fee_or_default(&self) -> f64 {
        self.official_fee.unwrap_or(DEFAULT_OFFICIAL_FEE).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.record_path_or_default(), DEFAULT_RECORD_PATH);
        assert_eq!(cfg.submission_delay_ms_or_default(), 800);
        assert_eq!(cfg.official_fee_or_default(), 10.0);
    }

    #[test]
    fn explicit_values_win() {
        let cfg = AppConfig {
            record_path: Some("/tmp/record.json".to_string()),
            submission_delay_ms: Some(0),
            official_fee: Some(-5.0),
        };
        assert_eq!(cfg.record_path_or_default(), "/tmp/record.json");
        assert_eq!(cfg.submission_delay_ms_or_default(), 0);
        assert_eq!(cfg.official_fee_or_default(), 0.0);
    }

    #[test]
    fn load_reads_file_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("portal.toml");
        std::fs::write(
            &file,
            "record_path = \"/srv/portal/record.json\"\nofficial_fee = 7.5\n",
        )
        .unwrap();

        std::env::set_var("PORTAL_CONFIG", &file);
        std::env::set_var("PORTAL_SUBMISSION_DELAY_MS", "25");
        std::env::set_var("PORTAL_OFFICIAL_FEE", "12.5");
        let loaded = AppConfig::load();
        std::env::remove_var("PORTAL_CONFIG");
        std::env::remove_var("PORTAL_SUBMISSION_DELAY_MS");
        std::env::remove_var("PORTAL_OFFICIAL_FEE");

        let cfg = loaded.unwrap();
        assert_eq!(cfg.record_path_or_default(), "/srv/portal/record.json");
        assert_eq!(cfg.submission_delay_ms_or_default(), 25);
        assert_eq!(cfg.official_fee_or_default(), 12.5);
    }
}
