//! Process settings read from the environment.

use std::env;
use std::time::Duration;

use crate::IndexingError;
use trail_indexer_repository::config::DEFAULT_SIGNING_SERVICE;

/// Default time allowed for in-flight deliveries before exit.
const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 30;

/// Settings for one process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Indexing endpoint: bare host or full URL.
    pub endpoint: String,
    pub region: String,
    pub index: String,
    pub doctype: String,
    /// Signing namespace of the indexing service.
    pub service: String,
    /// Cap on concurrently executing deliveries; unset means every record starts at once.
    pub max_in_flight: Option<usize>,
    pub drain_timeout: Duration,
    /// Custom object-store endpoint (S3-compatible services, local testing).
    pub s3_endpoint_url: Option<String>,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `ES_ENDPOINT`: Indexing endpoint (required)
    /// - `ES_REGION`: Endpoint region (required; falls back to `AWS_REGION`)
    /// - `ES_INDEX`: Index name (required)
    /// - `ES_DOCTYPE`: Document type name (required)
    /// - `ES_SERVICE`: Signing namespace (default: es)
    /// - `DISPATCH_MAX_IN_FLIGHT`: Cap on concurrent deliveries (default: no cap)
    /// - `DISPATCH_DRAIN_TIMEOUT_SECS`: Drain bound before exit (default: 30)
    /// - `S3_ENDPOINT_URL`: Custom object-store endpoint (optional)
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - When every required value is present
    /// * `Err(IndexingError::ConfigError)` - Naming the first missing or invalid value
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &str| {
            get(name).ok_or_else(|| {
                IndexingError::config(format!("{} environment variable is required", name))
            })
        };

        let region = match get("ES_REGION").or_else(|| get("AWS_REGION")) {
            Some(region) => region,
            None => {
                return Err(IndexingError::config(
                    "ES_REGION (or AWS_REGION) environment variable is required",
                ))
            }
        };

        let max_in_flight = get("DISPATCH_MAX_IN_FLIGHT")
            .map(|value| parse_positive("DISPATCH_MAX_IN_FLIGHT", &value))
            .transpose()?;

        let drain_timeout_secs = match get("DISPATCH_DRAIN_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|e| {
                IndexingError::config(format!("DISPATCH_DRAIN_TIMEOUT_SECS: {}", e))
            })?,
            None => DEFAULT_DRAIN_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint: require("ES_ENDPOINT")?,
            region,
            index: require("ES_INDEX")?,
            doctype: require("ES_DOCTYPE")?,
            service: get("ES_SERVICE").unwrap_or_else(|| DEFAULT_SIGNING_SERVICE.to_string()),
            max_in_flight,
            drain_timeout: Duration::from_secs(drain_timeout_secs),
            s3_endpoint_url: get("S3_ENDPOINT_URL"),
        })
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, IndexingError> {
    match value.parse::<usize>() {
        Ok(0) => Err(IndexingError::config(format!("{} must be at least 1", name))),
        Ok(n) => Ok(n),
        Err(e) => Err(IndexingError::config(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("ES_ENDPOINT", "search-logs.eu-west-1.es.amazonaws.com"),
        ("ES_REGION", "eu-west-1"),
        ("ES_INDEX", "cloudtrail"),
        ("ES_DOCTYPE", "event"),
    ];

    #[test]
    fn test_required_settings_with_defaults() {
        let settings = Settings::from_lookup(lookup(REQUIRED)).unwrap();

        assert_eq!(settings.endpoint, "search-logs.eu-west-1.es.amazonaws.com");
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.index, "cloudtrail");
        assert_eq!(settings.doctype, "event");
        assert_eq!(settings.service, "es");
        assert_eq!(settings.max_in_flight, None);
        assert_eq!(settings.drain_timeout, Duration::from_secs(30));
        assert!(settings.s3_endpoint_url.is_none());
    }

    #[test]
    fn test_each_required_value_fails_fast() {
        for missing in ["ES_ENDPOINT", "ES_REGION", "ES_INDEX", "ES_DOCTYPE"] {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();

            let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, IndexingError::ConfigError(_)));
            assert!(err.to_string().contains(missing), "{}", err);
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .map(|&(k, v)| if k == "ES_INDEX" { (k, "   ") } else { (k, v) })
            .collect();

        let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("ES_INDEX"));
    }

    #[test]
    fn test_region_falls_back_to_aws_region() {
        let mut pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "ES_REGION")
            .collect();
        pairs.push(("AWS_REGION", "us-west-2"));

        let settings = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(settings.region, "us-west-2");
    }

    #[test]
    fn test_optional_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("ES_SERVICE", "aoss"),
            ("DISPATCH_MAX_IN_FLIGHT", "8"),
            ("DISPATCH_DRAIN_TIMEOUT_SECS", "5"),
            ("S3_ENDPOINT_URL", "http://localhost:4566"),
        ]);

        let settings = Settings::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(settings.service, "aoss");
        assert_eq!(settings.max_in_flight, Some(8));
        assert_eq!(settings.drain_timeout, Duration::from_secs(5));
        assert_eq!(settings.s3_endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn test_invalid_numbers() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DISPATCH_MAX_IN_FLIGHT", "0"));
        assert!(Settings::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DISPATCH_DRAIN_TIMEOUT_SECS", "soon"));
        assert!(Settings::from_lookup(lookup(&pairs)).is_err());
    }
}
