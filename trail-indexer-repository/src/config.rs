//! Delivery target configuration.

use url::Url;

use crate::errors::DeliveryError;

/// Default signing namespace of the managed search service.
pub const DEFAULT_SIGNING_SERVICE: &str = "es";

/// Where and how records are delivered.
///
/// Built once at start-up and shared read-only (behind an `Arc`) by every
/// delivery. Construction fails if any required value is missing, so a
/// pipeline can never run against a partially configured target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    base_url: Url,
    host: String,
    region: String,
    service: String,
    index: String,
    doctype: String,
}

impl DeliveryTarget {
    /// Create a delivery target.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - A bare host name (https implied) or a full base URL
    /// * `region` - The region the endpoint lives in
    /// * `index` - The index name
    /// * `doctype` - The document type / category name
    ///
    /// # Returns
    ///
    /// * `Ok(DeliveryTarget)` - A validated target
    /// * `Err(DeliveryError::InvalidTarget)` - If a value is blank or the endpoint is not a URL
    pub fn new(
        endpoint: &str,
        region: &str,
        index: &str,
        doctype: &str,
    ) -> Result<Self, DeliveryError> {
        let endpoint = required("endpoint", endpoint)?;
        let region = required("region", region)?;
        let index = required("index", index.trim_matches('/'))?;
        let doctype = required("doctype", doctype.trim_matches('/'))?;

        let base_url = parse_endpoint(endpoint)?;
        let host = match (base_url.host_str(), base_url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(DeliveryError::invalid_target(format!(
                    "endpoint has no host: {}",
                    endpoint
                )))
            }
        };

        Ok(Self {
            base_url,
            host,
            region: region.to_string(),
            service: DEFAULT_SIGNING_SERVICE.to_string(),
            index: index.to_string(),
            doctype: doctype.to_string(),
        })
    }

    /// Override the signing namespace.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// The value of the `host` header: host name, plus port when it is not the scheme default.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn doctype(&self) -> &str {
        &self.doctype
    }

    /// The request path, `/<index>/<doctype>`, with each segment percent-encoded.
    pub fn document_path(&self) -> String {
        let mut url = self.base_url.clone();
        url.set_path("");
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push(&self.index).push(&self.doctype);
        }
        url.path().to_string()
    }

    /// The full URL documents are posted to.
    pub fn document_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&self.document_path());
        url
    }
}

fn required<'a>(name: &str, value: &'a str) -> Result<&'a str, DeliveryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DeliveryError::invalid_target(format!("{} must not be empty", name)));
    }
    Ok(value)
}

fn parse_endpoint(endpoint: &str) -> Result<Url, DeliveryError> {
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| DeliveryError::invalid_target(format!("invalid endpoint {}: {}", endpoint, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DeliveryError::invalid_target(format!(
            "unsupported endpoint scheme: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_defaults_to_https() {
        let target = DeliveryTarget::new(
            "search-logs.eu-west-1.es.amazonaws.com",
            "eu-west-1",
            "cloudtrail",
            "event",
        )
        .unwrap();

        assert_eq!(target.host(), "search-logs.eu-west-1.es.amazonaws.com");
        assert_eq!(target.service(), "es");
        assert_eq!(target.document_path(), "/cloudtrail/event");
        assert_eq!(
            target.document_url().as_str(),
            "https://search-logs.eu-west-1.es.amazonaws.com/cloudtrail/event"
        );
    }

    #[test]
    fn test_full_url_keeps_port() {
        let target =
            DeliveryTarget::new("http://127.0.0.1:9200", "us-east-1", "/logs/", "event").unwrap();

        assert_eq!(target.host(), "127.0.0.1:9200");
        assert_eq!(target.document_path(), "/logs/event");
        assert_eq!(target.document_url().as_str(), "http://127.0.0.1:9200/logs/event");
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let target = DeliveryTarget::new("localhost", "us-east-1", "audit logs", "event").unwrap();
        assert_eq!(target.document_path(), "/audit%20logs/event");
    }

    #[test]
    fn test_blank_values_are_rejected() {
        assert!(matches!(
            DeliveryTarget::new("", "us-east-1", "logs", "event"),
            Err(DeliveryError::InvalidTarget(_))
        ));
        assert!(matches!(
            DeliveryTarget::new("localhost", " ", "logs", "event"),
            Err(DeliveryError::InvalidTarget(_))
        ));
        assert!(matches!(
            DeliveryTarget::new("localhost", "us-east-1", "", "event"),
            Err(DeliveryError::InvalidTarget(_))
        ));
        assert!(matches!(
            DeliveryTarget::new("localhost", "us-east-1", "logs", "/"),
            Err(DeliveryError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_unsupported_scheme() {
        let result = DeliveryTarget::new("ftp://example.com", "us-east-1", "logs", "event");
        assert!(matches!(result, Err(DeliveryError::InvalidTarget(_))));
    }

    #[test]
    fn test_service_override() {
        let target = DeliveryTarget::new("localhost", "us-east-1", "logs", "event")
            .unwrap()
            .with_service("aoss");
        assert_eq!(target.service(), "aoss");
    }
}
