//! Memo hashes for secret attributes.
//!
//! Azure DevOps never echoes secrets back, so a read cannot tell whether the
//! configured secret still matches what was sent. Instead, every flatten
//! stores a SHA-256 memo of the locally configured secret in a computed
//! `<name>_hash` attribute, and the planner compares new configuration values
//! against that memo.

use sha2::{Digest, Sha256};

use crate::{Attribute, ResourceData};

/// Returns the name of the memo attribute for secret attribute `secret_key`.
pub fn secret_hash_key(secret_key: &str) -> String {
    format!("{secret_key}_hash")
}

/// Builds the memo attribute declaration for `secret_key`.
///
/// Returns the memo attribute name together with its declaration so callers
/// can insert both into a schema in one step.
pub fn secret_memo_attribute(secret_key: &str) -> (String, Attribute) {
    let attribute = Attribute::computed_string()
        .sensitive()
        .with_description(format!("SHA-256 hash of {secret_key}, used to detect changes"));
    (secret_hash_key(secret_key), attribute)
}

/// Lowercase hex SHA-256 of `secret`.
pub fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

/// Records the memo of the secret currently held in `data[secret_key]`.
pub fn flatten_secret(data: &mut ResourceData, secret_key: &str) {
    let memo = hash_secret(data.get_str(secret_key));
    data.set(secret_hash_key(secret_key), memo);
}

/// Diff-suppress hook for secret attributes: the change is ignored when the
/// new value hashes to the memo recorded by the last flatten.
pub fn diff_suppress_secret_changed(key: &str, _old: &str, new: &str, data: &ResourceData) -> bool {
    let memo = data.get_str(&secret_hash_key(key));
    !memo.is_empty() && memo == hash_secret(new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sha256_hex() {
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn flatten_records_memo_under_hash_key() {
        let mut data = ResourceData::from_attributes([("pat", "abc")]);
        flatten_secret(&mut data, "pat");
        assert_eq!(data.get_str("pat_hash"), hash_secret("abc"));
    }

    #[test]
    fn unchanged_secret_is_suppressed() {
        let mut data = ResourceData::from_attributes([("pat", "abc")]);
        flatten_secret(&mut data, "pat");
        assert!(diff_suppress_secret_changed("pat", "********", "abc", &data));
        assert!(!diff_suppress_secret_changed("pat", "********", "abd", &data));
    }

    #[test]
    fn missing_memo_never_suppresses() {
        let data = ResourceData::new();
        assert!(!diff_suppress_secret_changed("pat", "", "", &data));
    }

    #[test]
    fn memo_attribute_is_computed_and_sensitive() {
        let (key, attribute) = secret_memo_attribute("pat");
        assert_eq!(key, "pat_hash");
        assert!(attribute.computed && attribute.sensitive && !attribute.is_configurable());
    }
}
