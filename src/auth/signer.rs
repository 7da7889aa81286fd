//! Request signing
//!
//! The remote service recomputes the signature from the parameters it
//! receives, so the canonical string built here has to match its algorithm
//! byte for byte: keys sorted ascending, `key=value` pairs joined with `&`,
//! the API secret appended with no delimiter, and `api_key` left out of the
//! signed part even though it is transmitted.

use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

pub const API_KEY_FIELD: &str = "api_key";
pub const SIGNATURE_FIELD: &str = "signature";
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Parameters ready to be transmitted, including `api_key` and `signature`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParams {
    fields: BTreeMap<String, String>,
    signature: String,
}

impl SignedParams {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Fields in canonical (sorted) order, `signature` included
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.fields.into_iter().collect()
    }
}

/// Build the string that gets hashed: sorted `key=value` pairs without
/// `api_key` or `signature`, joined by `&`, with the secret appended.
pub fn string_to_sign(fields: &BTreeMap<String, String>, api_secret: &str) -> String {
    let joined = fields
        .iter()
        .filter(|(key, _)| key.as_str() != API_KEY_FIELD && key.as_str() != SIGNATURE_FIELD)
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{joined}{api_secret}")
}

/// Lowercase hex SHA-1 of the canonical string
pub fn compute_signature(fields: &BTreeMap<String, String>, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(fields, api_secret).as_bytes());
    hex::encode(hasher.finalize())
}

/// Sign a parameter set and return the full list of fields to transmit.
pub fn sign(mut fields: BTreeMap<String, String>, api_key: &str, api_secret: &str) -> SignedParams {
    fields.insert(API_KEY_FIELD.to_string(), api_key.to_string());
    let signature = compute_signature(&fields, api_secret);
    fields.insert(SIGNATURE_FIELD.to_string(), signature.clone());
    SignedParams { fields, signature }
}

/// Current Unix time in seconds, as sent in the `timestamp` field
pub fn unix_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_string_to_sign_layout() {
        let fields = params(&[
            ("timestamp", "1315060510"),
            ("public_id", "sample"),
            ("api_key", "1234"),
        ]);
        assert_eq!(
            string_to_sign(&fields, "abcd"),
            "public_id=sample&timestamp=1315060510abcd"
        );
    }

    #[test]
    fn test_known_signature() {
        // sha1("public_id=sample&timestamp=1315060510abcd")
        let fields = params(&[("public_id", "sample"), ("timestamp", "1315060510")]);
        let signed = sign(fields, "1234", "abcd");
        assert_eq!(signed.signature(), "c3470533147774275dd37996cc4d0e68fd03cd4f");
        assert_eq!(signed.get("api_key"), Some("1234"));
        assert_eq!(signed.get("signature"), Some(signed.signature()));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = sign(params(&[("public_id", "x"), ("timestamp", "1")]), "k", "s");
        let b = sign(params(&[("public_id", "x"), ("timestamp", "1")]), "k", "s");
        assert_eq!(a, b);
        assert_eq!(a.signature().len(), 40);
        assert!(a.signature().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let mut first = BTreeMap::new();
        first.insert("type".to_string(), "upload".to_string());
        first.insert("public_id".to_string(), "a/b".to_string());
        first.insert("timestamp".to_string(), "42".to_string());

        let mut second = BTreeMap::new();
        second.insert("timestamp".to_string(), "42".to_string());
        second.insert("public_id".to_string(), "a/b".to_string());
        second.insert("type".to_string(), "upload".to_string());

        assert_eq!(
            compute_signature(&first, "secret"),
            compute_signature(&second, "secret")
        );
    }

    #[test]
    fn test_any_change_changes_signature() {
        let base = params(&[("public_id", "a"), ("timestamp", "1")]);
        let reference = compute_signature(&base, "secret");

        let other_value = params(&[("public_id", "b"), ("timestamp", "1")]);
        assert_ne!(reference, compute_signature(&other_value, "secret"));
        assert_ne!(reference, compute_signature(&base, "secret2"));
    }

    #[test]
    fn test_api_key_is_transmitted_but_not_signed() {
        let with_key = sign(params(&[("public_id", "a")]), "key-one", "secret");
        let other_key = sign(params(&[("public_id", "a")]), "key-two", "secret");
        assert_eq!(with_key.signature(), other_key.signature());

        let keys: Vec<&str> = with_key.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["api_key", "public_id", "signature"]);
    }
}
