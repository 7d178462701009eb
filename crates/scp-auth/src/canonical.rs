//! Canonical request construction.
//!
//! The open-api server rebuilds this exact string from the received request,
//! so every byte matters:
//!
//! ```text
//! HTTPRequestMethod\n
//! Path\n
//! \n                      (the canonical query string is always empty)
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! The path is used verbatim. The API takes no query parameters, so no
//! URI-encoding pass is applied to either component.

use std::collections::BTreeMap;

/// Header names covered by every open-api signature, in canonical order.
pub const SIGNED_HEADERS: [&str; 4] = ["content-type", "host", "x-amz-content-sha256", "x-amz-date"];

/// Build the full canonical request string from its components.
///
/// # Examples
///
/// ```
/// use scp_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/janus/20180725/azs",
///     &[("host", "scp.example.internal")],
///     &["host"],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/janus/20180725/azs\n\nhost:scp.example.internal\n\nhost\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    payload_hash: &str,
) -> String {
    let canonical_headers = build_canonical_headers(headers, signed_headers);
    let signed_headers_str = build_signed_headers_string(signed_headers);

    format!("{method}\n{path}\n\n{canonical_headers}\n\n{signed_headers_str}\n{payload_hash}")
}

/// Build the canonical headers block.
///
/// Only headers listed in `signed_headers` are included, as `name:value` lines
/// with lowercase names, sorted by name. Values are taken as-is. Repeated
/// header names have their values joined with commas.
///
/// The result carries no trailing newline; [`build_canonical_request`] adds it
/// together with the blank separator line.
///
/// # Examples
///
/// ```
/// use scp_auth::canonical::build_canonical_headers;
///
/// let result = build_canonical_headers(
///     &[("X-Amz-Date", "20240101T000000Z"), ("Host", "scp.example.internal")],
///     &["host", "x-amz-date"],
/// );
/// assert_eq!(result, "host:scp.example.internal\nx-amz-date:20240101T000000Z");
/// ```
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)], signed_headers: &[&str]) -> String {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        header_map
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| (*value).to_owned());
    }

    let mut sorted_signed: Vec<&str> = signed_headers.to_vec();
    sorted_signed.sort_unstable();

    sorted_signed
        .iter()
        .filter_map(|name| header_map.get(*name).map(|value| format!("{name}:{value}")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the signed headers string as a semicolon-separated, sorted list.
///
/// # Examples
///
/// ```
/// use scp_auth::canonical::{SIGNED_HEADERS, build_signed_headers_string};
///
/// assert_eq!(
///     build_signed_headers_string(&SIGNED_HEADERS),
///     "content-type;host;x-amz-content-sha256;x-amz-date"
/// );
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    let mut sorted: Vec<&str> = signed_headers.to_vec();
    sorted.sort_unstable();
    sorted.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_should_keep_signed_headers_constant_in_sorted_order() {
        let mut sorted = SIGNED_HEADERS;
        sorted.sort_unstable();
        assert_eq!(sorted, SIGNED_HEADERS);
    }

    #[test]
    fn test_should_build_canonical_headers_sorted_and_lowercased() {
        let headers = [
            ("X-Amz-Date", "20240101T000000Z"),
            ("Content-Type", "application/json"),
            ("X-Amz-Content-Sha256", EMPTY_HASH),
            ("Host", "scp.example.internal"),
        ];
        let result = build_canonical_headers(&headers, &SIGNED_HEADERS);
        let expected = format!(
            "content-type:application/json\n\
             host:scp.example.internal\n\
             x-amz-content-sha256:{EMPTY_HASH}\n\
             x-amz-date:20240101T000000Z"
        );
        assert_eq!(result, expected);
    }

    #[test]
    fn test_should_not_normalize_header_values() {
        let headers = [("Host", "10.0.0.1:443")];
        assert_eq!(build_canonical_headers(&headers, &["host"]), "host:10.0.0.1:443");
    }

    #[test]
    fn test_should_skip_headers_not_signed() {
        let headers = [("Host", "scp.example.internal"), ("User-Agent", "curl")];
        assert_eq!(
            build_canonical_headers(&headers, &["host"]),
            "host:scp.example.internal"
        );
    }

    #[test]
    fn test_should_build_canonical_request_for_get() {
        use sha2::{Digest, Sha256};

        let headers = [
            ("content-type", "application/json"),
            ("host", "scp.example.internal"),
            ("x-amz-content-sha256", EMPTY_HASH),
            ("x-amz-date", "20240101T000000Z"),
        ];

        let canonical = build_canonical_request(
            "GET",
            "/janus/20180725/azs",
            &headers,
            &SIGNED_HEADERS,
            EMPTY_HASH,
        );

        let expected = "GET\n\
                        /janus/20180725/azs\n\
                        \n\
                        content-type:application/json\n\
                        host:scp.example.internal\n\
                        x-amz-content-sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\n\
                        x-amz-date:20240101T000000Z\n\
                        \n\
                        content-type;host;x-amz-content-sha256;x-amz-date\n\
                        e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(canonical, expected);

        let hash = hex::encode(Sha256::digest(canonical.as_bytes()));
        assert_eq!(
            hash,
            "570c7a219773c565bb32e231f63e67ad0cd193c2b9fcd5abebf5bd5c0c5e03f1"
        );
    }

    #[test]
    fn test_should_use_path_verbatim() {
        let canonical = build_canonical_request(
            "GET",
            "/janus/20180725/storage-tags",
            &[],
            &[],
            EMPTY_HASH,
        );
        assert!(canonical.starts_with("GET\n/janus/20180725/storage-tags\n\n"));
    }
}
