/// Computes the blake3 content digest of a payload as lowercase hex.
///
/// The digest is the deduplication key: two payloads are treated as the same
/// document exactly when their digests match.
pub fn hash_bytes_blake3(payload: &[u8]) -> String {
    blake3::hash(payload).to_hex().to_string()
}
