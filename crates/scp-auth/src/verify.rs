//! Server-side signature verification.
//!
//! Recomputes a signature from a received request the way the open-api server
//! does. Mock servers and tests use it to check that what the client signed is
//! exactly what it sent.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::build_canonical_request;
use crate::credentials::CredentialProvider;
use crate::error::{SignError, SignResult};
use crate::sigv4::{
    ALGORITHM, SCOPE_TERMINATOR, build_string_to_sign, compute_signature, credential_scope,
    derive_signing_key, hash_payload,
};

/// Parsed components of an `Authorization` header.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256 Credential=AKID/20240101/cn-south-1/open-api/aws4_request,
///   SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date,
///   Signature=<hex-signature>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAuth {
    /// The access key ID.
    pub access_key: String,
    /// The date component of the credential scope (YYYYMMDD).
    pub date: String,
    /// The region component of the credential scope.
    pub region: String,
    /// The service component of the credential scope.
    pub service: String,
    /// The signed header names (lowercase).
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

/// The outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRequest {
    /// The access key that signed the request.
    pub access_key: String,
    /// The region from the credential scope.
    pub region: String,
    /// The service from the credential scope.
    pub service: String,
}

/// Parse an `Authorization` header value into its components.
///
/// Accepts both `", "` and `","` separators.
///
/// # Errors
///
/// Returns [`SignError::InvalidAuthHeader`] if the header format is invalid,
/// [`SignError::UnsupportedAlgorithm`] for any algorithm but
/// `AWS4-HMAC-SHA256`, or [`SignError::InvalidCredential`] for a malformed scope.
pub fn parse_authorization_header(header: &str) -> SignResult<ParsedAuth> {
    let (algorithm, rest) = header.split_once(' ').ok_or(SignError::InvalidAuthHeader)?;

    if algorithm != ALGORITHM {
        return Err(SignError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(SignError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(SignError::InvalidAuthHeader)?;
    let signature = signature.ok_or(SignError::InvalidAuthHeader)?;

    let cred_parts: Vec<&str> = credential.splitn(5, '/').collect();
    if cred_parts.len() != 5 || cred_parts[4] != SCOPE_TERMINATOR {
        return Err(SignError::InvalidCredential);
    }

    Ok(ParsedAuth {
        access_key: cred_parts[0].to_owned(),
        date: cred_parts[1].to_owned(),
        region: cred_parts[2].to_owned(),
        service: cred_parts[3].to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}

/// Verify a signed request against the body that was actually received.
///
/// The `host` header must be present in `parts` (a server sees it on the wire;
/// a mock transport must add it from the URL).
///
/// # Errors
///
/// Returns a [`SignError`] if the `Authorization` header is missing or
/// malformed, the access key is unknown, a signed header is missing, the
/// declared payload hash does not match `body`, or the signature does not match.
pub fn verify_signed_request(
    parts: &http::request::Parts,
    body: &[u8],
    credential_provider: &dyn CredentialProvider,
) -> SignResult<VerifiedRequest> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(SignError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| SignError::InvalidAuthHeader)?;

    let parsed = parse_authorization_header(auth_header)?;
    let secret_key = credential_provider.get_secret_key(&parsed.access_key)?;

    let amz_date = header_value(parts, "x-amz-date")?;
    let declared_hash = header_value(parts, "x-amz-content-sha256")?;
    let body_hash = hash_payload(body);
    if declared_hash != body_hash {
        return Err(SignError::PayloadHashMismatch);
    }

    debug!(
        access_key = %parsed.access_key,
        date = %parsed.date,
        region = %parsed.region,
        service = %parsed.service,
        "Verifying request signature"
    );

    let signed_header_refs: Vec<&str> = parsed.signed_headers.iter().map(String::as_str).collect();
    let mut header_pairs = Vec::with_capacity(signed_header_refs.len());
    for &name in &signed_header_refs {
        header_pairs.push((name, header_value(parts, name)?));
    }

    let canonical_request = build_canonical_request(
        parts.method.as_str(),
        parts.uri.path(),
        &header_pairs,
        &signed_header_refs,
        &body_hash,
    );
    let canonical_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));

    let scope = credential_scope(&parsed.date, &parsed.region, &parsed.service);
    let string_to_sign = build_string_to_sign(amz_date, &scope, &canonical_hash);
    let signing_key = derive_signing_key(
        secret_key.as_bytes(),
        &parsed.date,
        &parsed.region,
        &parsed.service,
    );
    let expected_signature = compute_signature(&signing_key, &string_to_sign);

    if bool::from(parsed.signature.as_bytes().ct_eq(expected_signature.as_bytes())) {
        Ok(VerifiedRequest {
            access_key: parsed.access_key,
            region: parsed.region,
            service: parsed.service,
        })
    } else {
        debug!(access_key = %parsed.access_key, "Signature mismatch");
        Err(SignError::SignatureDoesNotMatch)
    }
}

fn header_value<'a>(parts: &'a http::request::Parts, name: &str) -> SignResult<&'a str> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| SignError::MissingHeader(name.to_owned()))?
        .to_str()
        .map_err(|_| SignError::MissingHeader(name.to_owned()))
}
