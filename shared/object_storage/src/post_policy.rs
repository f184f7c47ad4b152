//! Presigned POST policy documents
//!
//! S3 browser-based uploads authenticate with a base64 policy document signed
//! using a SigV4 signing key. The SDK has no presigned POST builder, so the
//! document is assembled here and signed with the `aws-sigv4` primitives.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use aws_credential_types::Credentials;
use aws_sigv4::sign::v4::{calculate_signature, generate_signing_key};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

/// Signing algorithm advertised in the form fields
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

const SERVICE: &str = "s3";

/// Form field names used by S3 POST uploads
pub mod field {
    /// Object key
    pub const KEY: &str = "key";
    /// Signing algorithm
    pub const ALGORITHM: &str = "x-amz-algorithm";
    /// Credential scope
    pub const CREDENTIAL: &str = "x-amz-credential";
    /// Signing timestamp
    pub const DATE: &str = "x-amz-date";
    /// Session token for temporary credentials
    pub const SECURITY_TOKEN: &str = "x-amz-security-token";
    /// Base64 policy document
    pub const POLICY: &str = "policy";
    /// Hex signature over the policy
    pub const SIGNATURE: &str = "x-amz-signature";
}

/// POST policy scoped to a single bucket and key
#[derive(Debug, Clone, Copy)]
pub struct PostPolicy<'a> {
    bucket: &'a str,
    key: &'a str,
    expires_in: Duration,
}

impl<'a> PostPolicy<'a> {
    /// Creates a policy for uploading `key` into `bucket`
    #[must_use]
    pub const fn new(bucket: &'a str, key: &'a str, expires_in: Duration) -> Self {
        Self {
            bucket,
            key,
            expires_in,
        }
    }

    /// Signs the policy and returns every form field the upload must carry
    ///
    /// # Arguments
    ///
    /// * `credentials` - Resolved AWS credentials
    /// * `region` - Region the bucket lives in
    /// * `now` - Signing time, also the start of the validity window
    #[must_use]
    pub fn sign(
        &self,
        credentials: &Credentials,
        region: &str,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, String> {
        let credential_scope = format!(
            "{}/{}/{region}/{SERVICE}/aws4_request",
            credentials.access_key_id(),
            now.format("%Y%m%d")
        );

        let mut fields = BTreeMap::from([
            (field::KEY.to_string(), self.key.to_string()),
            (field::ALGORITHM.to_string(), ALGORITHM.to_string()),
            (field::CREDENTIAL.to_string(), credential_scope),
            (
                field::DATE.to_string(),
                now.format("%Y%m%dT%H%M%SZ").to_string(),
            ),
        ]);
        if let Some(token) = credentials.session_token() {
            fields.insert(field::SECURITY_TOKEN.to_string(), token.to_string());
        }

        let policy = STANDARD.encode(self.document(now, &fields).to_string());
        let signing_key = generate_signing_key(
            credentials.secret_access_key(),
            SystemTime::from(now),
            region,
            SERVICE,
        );
        let signature = calculate_signature(signing_key, policy.as_bytes());

        fields.insert(field::POLICY.to_string(), policy);
        fields.insert(field::SIGNATURE.to_string(), signature);
        fields
    }

    /// Every signed field becomes an exact-match condition next to the bucket
    fn document(&self, now: DateTime<Utc>, fields: &BTreeMap<String, String>) -> Value {
        let expiration = now + self.expires_in;

        let mut conditions = vec![json!({ "bucket": self.bucket })];
        conditions.extend(fields.iter().map(|(name, value)| {
            let mut condition = Map::new();
            condition.insert(name.clone(), Value::String(value.clone()));
            Value::Object(condition)
        }));

        json!({
            "expiration": expiration.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "conditions": conditions,
        })
    }
}
