//! RPC request signing
//!
//! Signature version 1.0: sort parameters by key, percent-encode keys and
//! values per RFC 3986, join them into a canonical query, then
//! `base64(HMAC-SHA1(secret + "&", "GET&%2F&" + encode(canonical)))`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::CmsError;

type HmacSha1 = Hmac<Sha1>;

/// Value of the `SignatureMethod` parameter
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Value of the `SignatureVersion` parameter
pub const SIGNATURE_VERSION: &str = "1.0";

/// RFC 3986 encoding; only `A-Z a-z 0-9 - _ . ~` pass through
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Sorted, encoded `k=v&k=v` query
pub fn canonical_query(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the string that gets signed
pub fn string_to_sign(method: &str, canonical_query: &str) -> String {
    format!(
        "{}&{}&{}",
        method,
        percent_encode("/"),
        percent_encode(canonical_query)
    )
}

/// HMAC-SHA1 signature, base64-encoded
pub fn sign(access_key_secret: &str, string_to_sign: &str) -> Result<String, CmsError> {
    let key = format!("{}&", access_key_secret);
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|_| CmsError::InvalidCredentials("access key secret"))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
