//! File type inference for extracted payloads.
//!
//! The payload's leading bytes win whenever they match a known signature.
//! The declared content type only picks between Office formats sharing one
//! container, or stands in when no signature matches.

pub mod content_type;
pub mod signature;

pub use content_type::{extension_for_content_type, normalize_content_type};
pub use signature::Signature;

/// Extension used when neither the bytes nor the content type are recognised.
pub const GENERIC_EXTENSION: &str = "bin";

/// Infers a file extension (without the leading dot) for a payload.
pub fn infer_extension(payload: &[u8], content_type: Option<&str>) -> &'static str {
    let normalized = normalize_content_type(content_type.unwrap_or_default());

    if let Some(signature) = Signature::detect(payload) {
        return signature.extension(&normalized);
    }

    extension_for_content_type(&normalized).unwrap_or(GENERIC_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pdf_wins_over_declared_type() {
        let payload = [0x25, 0x50, 0x44, 0x46, 0x2D, 0x31];
        assert_eq!(infer_extension(&payload, Some("image/png")), "pdf");
        assert_eq!(infer_extension(&payload, None), "pdf");
    }

    #[test]
    fn test_zip_with_spreadsheet_type() {
        let payload = [0x50, 0x4B, 0x03, 0x04];
        assert_eq!(
            infer_extension(
                &payload,
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            ),
            "xlsx"
        );
        assert_eq!(infer_extension(&payload, Some("")), "docx");
        assert_eq!(infer_extension(&payload, None), "docx");
    }

    #[test]
    fn test_ole_with_mixed_case_type() {
        let payload = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1];
        assert_eq!(infer_extension(&payload, Some("Application/MSWord")), "doc");
        assert_eq!(infer_extension(&payload, Some("application/octet-stream")), "msg");
    }

    #[test]
    fn test_content_type_fallback() {
        assert_eq!(infer_extension(b"plain words", Some("text/plain; charset=utf-8")), "txt");
        assert_eq!(infer_extension(b"a,b,c", Some("text/csv")), "csv");
    }

    #[test]
    fn test_unrecognised_is_generic() {
        assert_eq!(infer_extension(b"\x00\x01\x02", Some("")), GENERIC_EXTENSION);
        assert_eq!(infer_extension(b"", None), GENERIC_EXTENSION);
    }

    proptest! {
        #[test]
        fn prop_pdf_prefix_always_pdf(tail in proptest::collection::vec(any::<u8>(), 0..64), ct in ".*") {
            let mut payload = b"%PDF".to_vec();
            payload.extend(tail);
            prop_assert_eq!(infer_extension(&payload, Some(ct.as_str())), "pdf");
        }
    }
}
