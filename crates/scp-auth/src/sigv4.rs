//! AWS4-HMAC-SHA256 request signing.
//!
//! [`sign_request`] runs the whole flow for one request:
//!
//! 1. Hash the body (`X-Amz-Content-Sha256`).
//! 2. Build the canonical request over the fixed signed-header set.
//! 3. Build the string to sign from the timestamp, credential scope, and
//!    canonical request hash.
//! 4. Derive the scoped signing key with the HMAC-SHA256 chain.
//! 5. Sign and assemble the `Authorization` header.
//!
//! The building blocks are public so that a verifier can recompute each step.

use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::canonical::{SIGNED_HEADERS, build_canonical_request, build_signed_headers_string};
use crate::context::SigningContext;
use crate::credentials::Credentials;
use crate::error::{SignError, SignResult};

/// The only algorithm the open-api accepts.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Fixed suffix terminating every credential scope.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

type HmacSha256 = Hmac<Sha256>;

/// The headers that authenticate one request.
///
/// `host` is recorded because it is signed, but it is not emitted by
/// [`SignedHeaders::to_header_map`]; the transport derives it from the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `Content-Type` value.
    pub content_type: String,
    /// The signed `host[:port]`.
    pub host: String,
    /// `X-Amz-Date` value (`YYYYMMDDThhmmssZ`).
    pub amz_date: String,
    /// `X-Amz-Content-Sha256` value (hex SHA-256 of the body).
    pub content_sha256: String,
    /// `Authorization` value.
    pub authorization: String,
}

impl SignedHeaders {
    /// The four wire headers, in the order the open-api documents them.
    #[must_use]
    pub fn wire_headers(&self) -> [(&'static str, &str); 4] {
        [
            ("Content-Type", self.content_type.as_str()),
            ("X-Amz-Date", self.amz_date.as_str()),
            ("X-Amz-Content-Sha256", self.content_sha256.as_str()),
            ("Authorization", self.authorization.as_str()),
        ]
    }

    /// Convert into an [`http::HeaderMap`].
    pub fn to_header_map(&self) -> SignResult<http::HeaderMap> {
        let mut map = http::HeaderMap::with_capacity(4);
        for (name, value) in self.wire_headers() {
            let header_name = http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SignError::InvalidHeaderValue(name))?;
            let header_value = http::HeaderValue::from_str(value)
                .map_err(|_| SignError::InvalidHeaderValue(name))?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

/// Sign one request.
///
/// # Errors
///
/// Returns a [`SignError`] if the context is malformed (empty host, bad path,
/// non-UTF-8 body). No network access happens here.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use scp_auth::{Credentials, Method, SigningContext, SigningScope, sign_request};
///
/// let creds = Credentials::new("AKIDEXAMPLE", "secret").unwrap();
/// let scope = SigningScope::default();
/// let ctx = SigningContext::new(Method::Get, "scp.example.internal", "/janus/20180725/azs", b"", &scope)
///     .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
///
/// let signed = sign_request(&creds, &ctx).unwrap();
/// assert_eq!(signed.amz_date, "20240101T000000Z");
/// assert!(signed.authorization.starts_with(
///     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240101/cn-south-1/open-api/aws4_request, "
/// ));
/// ```
pub fn sign_request(credentials: &Credentials, ctx: &SigningContext<'_>) -> SignResult<SignedHeaders> {
    ctx.validate()?;

    let scope = ctx.scope();
    let amz_date = ctx.amz_date();
    let date_stamp = ctx.date_stamp();
    let payload_hash = hash_payload(ctx.body());

    let headers = [
        ("content-type", scope.content_type.as_str()),
        ("host", ctx.host()),
        ("x-amz-content-sha256", payload_hash.as_str()),
        ("x-amz-date", amz_date.as_str()),
    ];

    let canonical_request = build_canonical_request(
        ctx.method().as_str(),
        ctx.path(),
        &headers,
        &SIGNED_HEADERS,
        &payload_hash,
    );
    debug!(%canonical_request, "Built canonical request");

    let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));
    let scope_str = credential_scope(&date_stamp, &scope.region, &scope.service);
    let string_to_sign = build_string_to_sign(&amz_date, &scope_str, &canonical_hash);
    debug!(%string_to_sign, "Built string to sign");

    let signing_key = derive_signing_key(
        credentials.secret_key(),
        &date_stamp,
        &scope.region,
        &scope.service,
    );
    let signature = compute_signature(&signing_key, &string_to_sign);

    let authorization = build_authorization_header(
        credentials.access_key(),
        &scope_str,
        &build_signed_headers_string(&SIGNED_HEADERS),
        &signature,
    );

    Ok(SignedHeaders {
        content_type: scope.content_type.clone(),
        host: ctx.host().to_owned(),
        amz_date,
        content_sha256: payload_hash,
        authorization,
    })
}

/// Build the credential scope `date/region/service/aws4_request`.
///
/// # Examples
///
/// ```
/// use scp_auth::sigv4::credential_scope;
///
/// assert_eq!(
///     credential_scope("20240101", "cn-south-1", "open-api"),
///     "20240101/cn-south-1/open-api/aws4_request"
/// );
/// ```
#[must_use]
pub fn credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{date_stamp}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <amz_date>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    amz_date: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the scoped signing key using the HMAC-SHA256 chain.
///
/// ```text
/// kDate    = HMAC-SHA256("AWS4" + secret_key, date_stamp)
/// kRegion  = HMAC-SHA256(kDate, region)
/// kService = HMAC-SHA256(kRegion, service)
/// key      = HMAC-SHA256(kService, "aws4_request")
/// ```
///
/// The key is only valid for this (secret, date, region, service) tuple and is
/// recomputed for every request.
#[must_use]
pub fn derive_signing_key(secret_key: &[u8], date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let mut seed = Vec::with_capacity(secret_key.len() + 4);
    seed.extend_from_slice(b"AWS4");
    seed.extend_from_slice(secret_key);

    let date_key = hmac_sha256(&seed, date_stamp.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, SCOPE_TERMINATOR.as_bytes())
}

/// Compute the hex-encoded HMAC-SHA256 signature of `data`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Assemble the `Authorization` header value.
///
/// Components are separated by `", "`, which the open-api server expects
/// verbatim.
#[must_use]
pub fn build_authorization_header(
    access_key: &str,
    credential_scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{ALGORITHM} Credential={access_key}/{credential_scope}, \
         SignedHeaders={signed_headers}, Signature={signature}"
    )
}

/// Compute the SHA-256 hash of the payload as a hex string.
///
/// # Examples
///
/// ```
/// use scp_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Compute HMAC-SHA256 and return the raw bytes.
pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
