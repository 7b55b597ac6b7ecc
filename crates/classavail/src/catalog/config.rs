/// Configuration for fetching availability pages
use super::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Root URL of the class availability site.
const CLASS_AVAIL_URL: &str = "http://www.sis.hawaii.edu/uhdad/avail.classes";

/// Settings for the availability client. Every key is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page listing classes for one department
    pub base_url: String,
    /// Campus code (`i=`)
    pub institution: String,
    /// Term code (`t=`), e.g. "201210"
    pub term: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Attempts per department page, including the first
    pub max_attempts: u32,
    /// Base delay between attempts (exponential backoff)
    pub retry_base_delay_ms: u64,
    /// How long a parsed department stays cached
    pub cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: CLASS_AVAIL_URL.to_string(),
            institution: "MAN".to_string(),
            term: "201210".to_string(),
            user_agent: concat!("classavail/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            max_attempts: 3,
            retry_base_delay_ms: 500,
            cache_ttl_secs: 5 * 60,
        }
    }
}

impl CatalogConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON file
    ///
    /// # Returns
    /// * `Ok(CatalogConfig)` - Loaded configuration, defaults filled in
    /// * `Err` - If the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Builds the listing URL for one department.
    pub fn department_url(&self, code: &str) -> Result<Url, CatalogError> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("i", self.institution.as_str()),
                ("t", self.term.as_str()),
                ("s", code),
            ],
        )?;
        Ok(url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
