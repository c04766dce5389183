use sha2::{Digest, Sha256};

const PREFIX_LEN: usize = 32;
const HASH_BYTES: usize = 8;

/// File name for a storage key (slot or session marker): `{prefix}-{hash}.json`.
///
/// The SHA-256 of the full key is the identity. The prefix keeps only ASCII
/// letters, digits, `-` and `_` from the start of the key so the file can be
/// recognised on disk; it is dropped when nothing survives.
pub fn slot_filename(key: &str) -> String {
    let prefix: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .take(PREFIX_LEN)
        .collect();
    let hash: String = Sha256::digest(key.as_bytes())
        .iter()
        .take(HASH_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    if prefix.is_empty() {
        format!("{hash}.json")
    } else {
        format!("{prefix}-{hash}.json")
    }
}
