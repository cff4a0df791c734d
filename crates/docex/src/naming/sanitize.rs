/// Placeholder used for segments that are empty after sanitizing.
pub const UNKNOWN_SEGMENT: &str = "Unknown";

/// Folder segments longer than this are truncated.
pub const MAX_FOLDER_NAME_CHARS: usize = 100;

/// Replaces path-unsafe characters with `_` and trims surrounding whitespace.
///
/// Empty, whitespace-only and dot-only input becomes [`UNKNOWN_SEGMENT`].
pub fn sanitize_file_name(name: &str) -> String {
    finish(replace_invalid(name).trim())
}

/// Same as [`sanitize_file_name`], then truncated to [`MAX_FOLDER_NAME_CHARS`].
pub fn sanitize_folder_name(name: &str) -> String {
    let replaced = replace_invalid(name);
    let trimmed = replaced.trim();

    if trimmed.chars().count() > MAX_FOLDER_NAME_CHARS {
        let truncated: String = trimmed.chars().take(MAX_FOLDER_NAME_CHARS).collect();
        finish(truncated.trim_end())
    } else {
        finish(trimmed)
    }
}

fn replace_invalid(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn finish(name: &str) -> String {
    if name.is_empty() || name.chars().all(|c| c == '.') {
        UNKNOWN_SEGMENT.to_string()
    } else {
        name.to_string()
    }
}
