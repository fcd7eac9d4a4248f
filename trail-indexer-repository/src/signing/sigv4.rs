//! Signature Version 4 signer.
//!
//! Wraps `aws-sigv4` for one region and service namespace, and writes the
//! `x-amz-date`, `x-amz-security-token` and `authorization` headers onto the
//! request. Every header present on the request at signing time is covered
//! by the signature except `authorization` and `user-agent`.

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, PercentEncodingMode, SignableBody, SignableRequest as AwsSignableRequest,
    SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::SystemTime;

use super::credentials::SigningCredentials;
use crate::errors::DeliveryError;

/// Headers written by the signer; any stale copies are removed before signing.
const SIGNER_HEADERS: &[&str] = &["authorization", "x-amz-date", "x-amz-security-token"];

/// An HTTP request in the form the signer works on.
///
/// Header names are stored lower-cased. `path` is the path exactly as it
/// goes on the wire (already percent-encoded, no query string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl SignableRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Set a header, replacing any previous value.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// What was produced while signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutput {
    pub amz_date: String,
    pub signature: String,
    pub authorization: String,
}

/// Signs requests for one region and service namespace.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    region: String,
    service: String,
}

impl RequestSigner {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    /// Sign `request` in place as of `time`.
    ///
    /// Nothing is cached: calling this twice with different instants yields
    /// two independent signatures.
    ///
    /// # Returns
    ///
    /// * `Ok(SigningOutput)` - The date, signature and authorization value written
    /// * `Err(DeliveryError::Signing)` - If the request cannot be expressed for signing
    pub fn sign(
        &self,
        request: &mut SignableRequest,
        credentials: &SigningCredentials,
        time: DateTime<Utc>,
    ) -> Result<SigningOutput, DeliveryError> {
        for name in SIGNER_HEADERS {
            request.headers.remove(*name);
        }

        let identity: Identity = Credentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token().map(str::to_string),
            None,
            "trail-indexer",
        )
        .into();

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(SystemTime::from(time))
            .settings(self.settings())
            .build()
            .map_err(|e| DeliveryError::signing(e.to_string()))?
            .into();

        let method = request.method.to_ascii_uppercase();
        let signable = AwsSignableRequest::new(
            &method,
            request.path.as_str(),
            request
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
            SignableBody::Bytes(request.body.as_bytes()),
        )
        .map_err(|e| DeliveryError::signing(e.to_string()))?;

        let (instructions, signature) = sign(signable, &params)
            .map_err(|e| DeliveryError::signing(e.to_string()))?
            .into_parts();

        let signed_headers: Vec<(String, String)> = instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        for (name, value) in signed_headers {
            request.set_header(&name, value);
        }

        let amz_date = request.header("x-amz-date").unwrap_or_default().to_string();
        let authorization = request
            .header("authorization")
            .ok_or_else(|| DeliveryError::signing("signer produced no authorization header"))?
            .to_string();

        Ok(SigningOutput {
            amz_date,
            signature,
            authorization,
        })
    }

    /// S3 signs the path as sent; every other service signs it encoded once more.
    fn settings(&self) -> SigningSettings {
        let mut settings = SigningSettings::default();
        settings.percent_encoding_mode = if self.service == "s3" {
            PercentEncodingMode::Single
        } else {
            PercentEncodingMode::Double
        };
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn example_credentials() -> SigningCredentials {
        SigningCredentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
    }

    fn example_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    fn record_request(path: &str) -> SignableRequest {
        SignableRequest::new("POST", path, r#"{"eventName":"x"}"#)
            .with_header("host", "search.example.com")
            .with_header("content-type", "application/json")
            .with_header("presigned-expires", "false")
    }

    #[test]
    fn test_get_vanilla() {
        let signer = RequestSigner::new("us-east-1", "service");
        let mut request =
            SignableRequest::new("GET", "/", "").with_header("Host", "example.amazonaws.com");

        let output = signer
            .sign(&mut request, &example_credentials(), example_time())
            .unwrap();

        assert_eq!(
            output.signature,
            "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
        assert_eq!(
            request.header("authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                 SignedHeaders=host;x-amz-date, \
                 Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
            )
        );
        assert_eq!(request.header("x-amz-date"), Some("20150830T123600Z"));
        assert_eq!(output.amz_date, "20150830T123600Z");
    }

    #[test]
    fn test_session_token_is_sent_and_signed() {
        let signer = RequestSigner::new("eu-west-1", "es");
        let mut request = SignableRequest::new("POST", "/logs/event", "{}")
            .with_header("host", "search.example.com");
        let credentials = example_credentials().with_session_token("session-token");

        let output = signer.sign(&mut request, &credentials, example_time()).unwrap();

        assert_eq!(request.header("x-amz-security-token"), Some("session-token"));
        assert!(output
            .authorization
            .contains("SignedHeaders=host;x-amz-date;x-amz-security-token,"));
    }

    #[test]
    fn test_transmitted_headers_are_signed() {
        let signer = RequestSigner::new("eu-west-1", "es");
        let mut request = record_request("/logs/event").with_header("user-agent", "agent");

        let output = signer
            .sign(&mut request, &example_credentials(), example_time())
            .unwrap();

        assert!(output.authorization.contains(
            "SignedHeaders=content-type;host;presigned-expires;x-amz-date,"
        ));
        assert_eq!(request.header("user-agent"), Some("agent"));
    }

    #[test]
    fn test_canonical_path_encoding() {
        let signer = RequestSigner::new("eu-west-1", "es");
        let mut request = record_request("/audit%20logs/event");

        let output = signer
            .sign(&mut request, &example_credentials(), example_time())
            .unwrap();

        // Signed over `/audit%2520logs/event`.
        assert_eq!(
            output.signature,
            "469512dc515c680ec051dfef2817dd5d57a4ba13b8d37ae0700c939c2ada41ce"
        );
    }

    #[test]
    fn test_distinct_instants_give_distinct_signatures() {
        let signer = RequestSigner::new("eu-west-1", "es");
        let template = record_request("/logs/event");

        let mut first = template.clone();
        let mut second = template;
        let a = signer
            .sign(&mut first, &example_credentials(), example_time())
            .unwrap();
        let b = signer
            .sign(
                &mut second,
                &example_credentials(),
                example_time() + chrono::Duration::seconds(1),
            )
            .unwrap();

        assert_ne!(a.amz_date, b.amz_date);
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_resigning_replaces_signer_headers() {
        let signer = RequestSigner::new("eu-west-1", "es");
        let mut request = record_request("/logs/event");
        let with_token = example_credentials().with_session_token("old-token");

        signer.sign(&mut request, &with_token, example_time()).unwrap();
        let later = example_time() + chrono::Duration::minutes(5);
        let output = signer
            .sign(&mut request, &example_credentials(), later)
            .unwrap();

        assert_eq!(request.header("authorization"), Some(output.authorization.as_str()));
        assert_eq!(request.header("x-amz-date"), Some("20150830T124100Z"));
        assert_eq!(request.header("x-amz-security-token"), None);
        assert!(output
            .authorization
            .contains("SignedHeaders=content-type;host;presigned-expires;x-amz-date,"));
    }
}
