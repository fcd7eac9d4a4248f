//! Signed delivery client implementation.
//!
//! One `deliver` call builds one `POST /<index>/<doctype>` request carrying a
//! single record, signs it with credentials and a timestamp resolved at that
//! moment, sends it, and reads the response body chunk by chunk.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::DeliveryTarget;
use crate::errors::DeliveryError;
use crate::interfaces::{Clock, CredentialSource, DocumentSink, SystemClock};
use crate::signing::{RequestSigner, SignableRequest, SigningOutput};
use crate::types::DeliveryReport;

/// A fully signed request, ready to send.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: Url,
    pub request: SignableRequest,
    pub signing: SigningOutput,
}

/// Delivers records to the indexing endpoint over SigV4-signed HTTP.
///
/// # Example
///
/// ```ignore
/// let target = Arc::new(DeliveryTarget::new(endpoint, "eu-west-1", "cloudtrail", "event")?);
/// let client = SignedDeliveryClient::new(target, Arc::new(credentials));
/// let report = client.deliver(r#"{"eventName":"ConsoleLogin"}"#.to_string()).await?;
/// ```
pub struct SignedDeliveryClient {
    http: reqwest::Client,
    target: Arc<DeliveryTarget>,
    signer: RequestSigner,
    credentials: Arc<dyn CredentialSource>,
    clock: Arc<dyn Clock>,
}

impl SignedDeliveryClient {
    /// Create a client for `target`, signing with `credentials` and the system clock.
    pub fn new(target: Arc<DeliveryTarget>, credentials: Arc<dyn CredentialSource>) -> Self {
        let signer = RequestSigner::new(target.region(), target.service());

        info!(
            url = %target.document_url(),
            region = %target.region(),
            service = %target.service(),
            "Created signed delivery client"
        );

        Self {
            http: reqwest::Client::new(),
            target,
            signer,
            credentials,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for signing.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the underlying HTTP client (timeouts, proxies, TLS settings).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn target(&self) -> &DeliveryTarget {
        &self.target
    }

    /// Build and sign the request for one document.
    ///
    /// Credentials and the clock are both read here, so every call produces
    /// a fresh signature.
    pub async fn sign_document(&self, document: String) -> Result<SignedRequest, DeliveryError> {
        let credentials = self.credentials.credentials().await?;

        let mut request = SignableRequest::new("POST", self.target.document_path(), document)
            .with_header("host", self.target.host())
            .with_header("content-type", "application/json")
            .with_header("presigned-expires", "false");

        let signing = self.signer.sign(&mut request, &credentials, self.clock.now())?;

        Ok(SignedRequest {
            url: self.target.document_url(),
            request,
            signing,
        })
    }

    async fn send(&self, signed: SignedRequest) -> Result<DeliveryReport, DeliveryError> {
        let headers = header_map(&signed.request)?;

        let response = self
            .http
            .post(signed.url)
            .headers(headers)
            .body(signed.request.body)
            .send()
            .await
            .map_err(|e| DeliveryError::transport(e.to_string()))?;

        let status = response.status();
        let mut chunks = response.bytes_stream();
        let mut body = Vec::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| DeliveryError::transport(e.to_string()))?;
            debug!(chunk_len = chunk.len(), "...getting chunk");
            body.extend_from_slice(&chunk);
        }

        let report = DeliveryReport::new(status.as_u16(), String::from_utf8_lossy(&body));

        if report.is_success() {
            info!(status = report.status, response = %report.body, "Finished pushing record");
        } else {
            warn!(
                status = report.status,
                response = %report.body,
                "Indexing endpoint answered with a non-success status"
            );
        }

        Ok(report)
    }
}

#[async_trait]
impl DocumentSink for SignedDeliveryClient {
    #[instrument(skip(self, document), fields(size = document.len()))]
    async fn deliver(&self, document: String) -> Result<DeliveryReport, DeliveryError> {
        let signed = self.sign_document(document).await?;
        self.send(signed).await
    }
}

fn header_map(request: &SignableRequest) -> Result<HeaderMap, DeliveryError> {
    let mut headers = HeaderMap::with_capacity(request.headers.len());

    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DeliveryError::signing(format!("invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| DeliveryError::signing(format!("invalid value for {}: {}", name, e)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::SigningCredentials;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;

    /// Clock returning one instant per call, one second apart.
    struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap();
            let now = *next;
            *next = now + chrono::Duration::seconds(1);
            now
        }
    }

    fn client() -> SignedDeliveryClient {
        let target = DeliveryTarget::new(
            "search-logs.eu-west-1.es.amazonaws.com",
            "eu-west-1",
            "cloudtrail",
            "event",
        )
        .unwrap();
        let clock = SteppingClock {
            next: Mutex::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
        };

        SignedDeliveryClient::new(
            Arc::new(target),
            Arc::new(SigningCredentials::new("AKIDEXAMPLE", "secret")),
        )
        .with_clock(Arc::new(clock))
    }

    #[tokio::test]
    async fn test_sign_document_shape() {
        let signed = client()
            .sign_document(r#"{"eventName":"ConsoleLogin"}"#.to_string())
            .await
            .unwrap();

        assert_eq!(
            signed.url.as_str(),
            "https://search-logs.eu-west-1.es.amazonaws.com/cloudtrail/event"
        );
        assert_eq!(signed.request.method, "POST");
        assert_eq!(signed.request.path, "/cloudtrail/event");
        assert_eq!(
            signed.request.header("host"),
            Some("search-logs.eu-west-1.es.amazonaws.com")
        );
        assert_eq!(signed.request.header("presigned-expires"), Some("false"));
        assert_eq!(signed.request.header("x-amz-date"), Some("20240301T100000Z"));
        assert!(signed
            .signing
            .authorization
            .contains("/20240301/eu-west-1/es/aws4_request"));

        let body: serde_json::Value = serde_json::from_str(&signed.request.body).unwrap();
        assert_eq!(body, serde_json::json!({"eventName": "ConsoleLogin"}));
    }

    #[tokio::test]
    async fn test_each_document_gets_fresh_signature() {
        let client = client();
        let record = r#"{"eventName":"ConsoleLogin"}"#.to_string();

        let first = client.sign_document(record.clone()).await.unwrap();
        let second = client.sign_document(record).await.unwrap();

        assert_eq!(first.request.body, second.request.body);
        assert_eq!(first.signing.amz_date, "20240301T100000Z");
        assert_eq!(second.signing.amz_date, "20240301T100001Z");
        assert_ne!(first.signing.authorization, second.signing.authorization);
        assert_ne!(first.signing.signature, second.signing.signature);
    }

    #[test]
    fn test_header_map_rejects_invalid_values() {
        let request = SignableRequest::new("POST", "/", "").with_header("host", "bad\nvalue");
        assert!(matches!(header_map(&request), Err(DeliveryError::Signing(_))));
    }
}
