//! HTTP client for the class availability site.
//!
//! One department is one page:
//! 1. Validate the department code against the known set
//! 2. GET `avail.classes?i=..&t=..&s=<dept>`, retrying transient failures
//! 3. Flatten the page into tokens
//! 4. Assemble courses from the tokens

use super::cache::{CacheStats, CatalogCache, CircuitBreaker};
use super::config::CatalogConfig;
use super::departments::validate_department;
use super::error::CatalogError;
use super::extract::extract_tokens;
use super::parse_courses;
use super::types::DepartmentCatalog;
use rand::Rng;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Client for fetching and parsing department listings.
pub struct ClassAvailClient {
    client: Client,
    config: CatalogConfig,
    cache: CatalogCache,
    circuit_breaker: CircuitBreaker,
}

impl ClassAvailClient {
    /// Creates a new client with default configuration.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates a new client with custom configuration.
    pub fn with_config(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CatalogError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            cache: CatalogCache::new(config.cache_ttl()),
            circuit_breaker: CircuitBreaker::with_defaults(),
            config,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Loads one department, using the cache if available.
    ///
    /// # Arguments
    /// * `code` - Department code, e.g. "ICS"
    ///
    /// # Returns
    /// * `Ok(DepartmentCatalog)` - Every course listed for the department
    /// * `Err(CatalogError)` - Unknown department, transport failure, or a
    ///   malformed listing (no partial catalog is returned)
    pub async fn load_department(&self, code: &str) -> Result<DepartmentCatalog, CatalogError> {
        validate_department(code)?;

        if let Some(cached) = self.cache.get(code) {
            debug!(department = %code, "Returning cached catalog");
            return Ok(cached);
        }

        let correlation_id = generate_correlation_id();
        let catalog = self.load_uncached(code, &correlation_id).await?;
        self.cache.insert(catalog.clone());
        Ok(catalog)
    }

    /// Loads departments in order, stopping at the first failure.
    ///
    /// `cancel` is only looked at between departments; a department that has
    /// started loading always runs to completion or failure.
    pub async fn load_departments(
        &self,
        codes: &[String],
        cancel: &AtomicBool,
    ) -> Result<Vec<DepartmentCatalog>, CatalogError> {
        let correlation_id = generate_correlation_id();
        let start = Instant::now();
        let mut catalogs = Vec::with_capacity(codes.len());
        self.cache.cleanup_expired();

        info!(
            correlation_id = %correlation_id,
            departments = codes.len(),
            "Starting batch load"
        );

        for code in codes {
            if cancel.load(Ordering::Relaxed) {
                warn!(
                    correlation_id = %correlation_id,
                    loaded = catalogs.len(),
                    "Batch load cancelled"
                );
                return Err(CatalogError::Cancelled);
            }

            validate_department(code)?;
            let catalog = match self.cache.get(code) {
                Some(cached) => cached,
                None => {
                    let catalog = self.load_uncached(code, &correlation_id).await?;
                    self.cache.insert(catalog.clone());
                    catalog
                }
            };
            catalogs.push(catalog);
        }

        info!(
            correlation_id = %correlation_id,
            departments = catalogs.len(),
            courses = catalogs.iter().map(|c| c.courses.len()).sum::<usize>(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch load completed"
        );

        Ok(catalogs)
    }

    /// Fetches a department page and returns its token sequence.
    pub async fn fetch_department_tokens(&self, code: &str) -> Result<Vec<String>, CatalogError> {
        validate_department(code)?;
        self.fetch_tokens(code, &generate_correlation_id()).await
    }

    async fn fetch_tokens(
        &self,
        code: &str,
        correlation_id: &str,
    ) -> Result<Vec<String>, CatalogError> {
        let html = self.fetch_page(code, correlation_id).await?;
        Ok(extract_tokens(&html))
    }

    async fn load_uncached(
        &self,
        code: &str,
        correlation_id: &str,
    ) -> Result<DepartmentCatalog, CatalogError> {
        let tokens = self.fetch_tokens(code, correlation_id).await?;
        let token_count = tokens.len();

        let courses = parse_courses(tokens).map_err(|failure| {
            error!(
                correlation_id = %correlation_id,
                department = %code,
                field = %failure.field,
                index = failure.index,
                previous = %failure.previous,
                current = %failure.current,
                "Listing did not match the expected layout"
            );
            CatalogError::from(failure)
        })?;

        info!(
            correlation_id = %correlation_id,
            department = %code,
            tokens = token_count,
            courses = courses.len(),
            "Parsed department listing"
        );

        Ok(DepartmentCatalog {
            department: code.to_string(),
            courses,
            fetched_at: chrono::Utc::now(),
        })
    }

    /// Downloads a department page, retrying transient failures.
    async fn fetch_page(&self, code: &str, correlation_id: &str) -> Result<String, CatalogError> {
        if self.circuit_breaker.is_open() {
            warn!(
                correlation_id = %correlation_id,
                "Circuit breaker is open, rejecting request"
            );
            return Err(CatalogError::CircuitBreakerOpen);
        }

        let url = self.config.department_url(code)?;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(
                correlation_id = %correlation_id,
                url = %url,
                attempt = attempt,
                "Fetching department page"
            );

            match self.get_text(url.as_str()).await {
                Ok(html) => {
                    self.circuit_breaker.record_success();
                    return Ok(html);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_attempts => {
                    let delay = self.calculate_retry_delay(attempt);
                    warn!(
                        correlation_id = %correlation_id,
                        error = %e,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_retryable() {
                        self.circuit_breaker.record_failure();
                    }
                    error!(
                        correlation_id = %correlation_id,
                        department = %code,
                        error = %e,
                        attempts = attempt,
                        "Fetch failed"
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::UnexpectedResponse {
                message: format!("{} returned status {}", url, response.status()),
            });
        }

        Ok(response.text().await?)
    }

    /// Calculates retry delay with exponential backoff and jitter.
    fn calculate_retry_delay(&self, attempt: u32) -> Duration {
        let base = self.config.retry_base_delay().as_millis() as u64;
        // Exponential backoff: base * 2^min(attempt-1, 5)
        let exponential = base * 2u64.pow(attempt.saturating_sub(1).min(5));
        // Cap at 10 seconds
        let capped = exponential.min(10_000);
        // Add jitter: 0-20% of the delay
        let jitter = rand::thread_rng().gen_range(0..=(capped / 5));
        Duration::from_millis(capped + jitter)
    }

    /// Drops a department's cached catalog.
    pub fn invalidate_cache(&self, code: &str) {
        self.cache.invalidate(code);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_backoff() {
        let client = ClassAvailClient::new().unwrap();

        let d1 = client.calculate_retry_delay(1);
        let d2 = client.calculate_retry_delay(2);
        let d3 = client.calculate_retry_delay(3);

        // Jitter is at most 20%, so each step still doubles past it
        assert!(d2 > d1);
        assert!(d3 > d2);
        assert!(client.calculate_retry_delay(30) <= Duration::from_millis(12_000));
    }

    #[tokio::test]
    async fn test_unknown_department_rejected_before_fetch() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9/unreachable".to_string(),
            ..Default::default()
        };
        let client = ClassAvailClient::with_config(config).unwrap();

        let err = client.load_department("NOPE").await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDepartment { code } if code == "NOPE"));
        assert_eq!(client.circuit_breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_batch_fetches_nothing() {
        let client = ClassAvailClient::new().unwrap();
        let cancel = AtomicBool::new(true);

        let err = client
            .load_departments(&["ICS".to_string()], &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Cancelled));
    }

    #[tokio::test]
    async fn test_batch_drops_expired_entries() {
        let client = ClassAvailClient::new().unwrap();
        client.cache.insert_with_ttl(
            DepartmentCatalog {
                department: "MATH".to_string(),
                courses: Vec::new(),
                fetched_at: chrono::Utc::now(),
            },
            Duration::ZERO,
        );
        assert_eq!(client.cache_stats().expired_entries, 1);

        let cancel = AtomicBool::new(true);
        let _ = client.load_departments(&["ICS".to_string()], &cancel).await;
        assert!(client.cache.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_tokens_rejects_unknown_department() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9/unreachable".to_string(),
            max_attempts: 1,
            ..Default::default()
        };
        let client = ClassAvailClient::with_config(config).unwrap();

        let err = client.fetch_department_tokens("ZZZ").await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDepartment { code } if code == "ZZZ"));
        assert_eq!(client.circuit_breaker.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_cached_department_skips_network() {
        let config = CatalogConfig {
            base_url: "http://127.0.0.1:9/unreachable".to_string(),
            max_attempts: 1,
            ..Default::default()
        };
        let client = ClassAvailClient::with_config(config).unwrap();
        client.cache.insert(DepartmentCatalog {
            department: "ICS".to_string(),
            courses: Vec::new(),
            fetched_at: chrono::Utc::now(),
        });

        let catalog = client.load_department("ICS").await.unwrap();
        assert_eq!(catalog.department, "ICS");

        let cancel = AtomicBool::new(false);
        let batch = client
            .load_departments(&["ICS".to_string()], &cancel)
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
    }
}
