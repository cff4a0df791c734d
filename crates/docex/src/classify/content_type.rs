/// Lower-cases a declared content type and drops any `; charset=...` parameters.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Exact lookup of a normalized content type.
pub fn extension_for_content_type(normalized: &str) -> Option<&'static str> {
    let ext = match normalized {
        "application/pdf" => "pdf",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",
        "application/vnd.ms-powerpoint" => "ppt",
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "text/plain" => "txt",
        "text/csv" | "application/csv" => "csv",
        "application/vnd.ms-outlook" | "application/x-msg" | "application/x-ole-storage" => "msg",
        _ => return None,
    };
    Some(ext)
}
