//! Magic byte detection for the document formats found in attachment tables.

const PDF: &[u8] = b"%PDF";
const OLE_COMPOUND: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
const ZIP: &[u8] = b"PK";
const JPEG: &[u8] = &[0xFF, 0xD8];
const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const GIF87A: &[u8] = b"GIF87a";
const GIF89A: &[u8] = b"GIF89a";

/// Payload formats recognised by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Pdf,
    /// Legacy Office container; the content type picks doc, xls or ppt.
    OleCompound,
    /// Office Open XML or plain archive; the content type picks the extension.
    Zip,
    Jpeg,
    Png,
    Gif,
}

impl Signature {
    /// Matches the leading bytes of `payload` against the known signatures.
    pub fn detect(payload: &[u8]) -> Option<Self> {
        if payload.starts_with(PDF) {
            Some(Signature::Pdf)
        } else if payload.starts_with(OLE_COMPOUND) {
            Some(Signature::OleCompound)
        } else if payload.starts_with(ZIP) {
            Some(Signature::Zip)
        } else if payload.starts_with(JPEG) {
            Some(Signature::Jpeg)
        } else if payload.starts_with(PNG) {
            Some(Signature::Png)
        } else if payload.starts_with(GIF87A) || payload.starts_with(GIF89A) {
            Some(Signature::Gif)
        } else {
            None
        }
    }

    /// Resolves the extension for this signature.
    ///
    /// `content_type` must already be lower-cased. OLE and ZIP containers
    /// hold several Office formats, so the content type decides between them.
    pub fn extension(self, content_type: &str) -> &'static str {
        match self {
            Signature::Pdf => "pdf",
            Signature::Jpeg => "jpg",
            Signature::Png => "png",
            Signature::Gif => "gif",
            Signature::OleCompound => {
                if content_type.contains("word") {
                    "doc"
                } else if content_type.contains("excel") || content_type.contains("spreadsheet") {
                    "xls"
                } else if content_type.contains("powerpoint") {
                    "ppt"
                } else {
                    "msg"
                }
            }
            Signature::Zip => {
                if content_type.contains("word") {
                    "docx"
                } else if content_type.contains("excel") || content_type.contains("spreadsheet") {
                    "xlsx"
                } else if content_type.contains("powerpoint") || content_type.contains("presentation") {
                    "pptx"
                } else {
                    "docx"
                }
            }
        }
    }
}
