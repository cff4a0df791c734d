use super::sanitize::sanitize_file_name;
use crate::classify::infer_extension;
use percent_encoding::percent_decode_str;
use url::Url;

/// Extensions that say nothing about the content and get replaced.
const PLACEHOLDER_EXTENSIONS: &[&str] = &["bin", "dat"];

const MAX_EXTENSION_CHARS: usize = 5;

/// Candidate name fields of one row, in fallback order.
#[derive(Debug, Clone, Default)]
pub struct NameSources<'a> {
    pub stored_name: Option<&'a str>,
    pub url: Option<&'a str>,
    pub title: Option<&'a str>,
    pub placeholder: String,
}

/// Picks the output file name for a payload.
///
/// Prefers the stored file name, then the last segment of the URL, then the
/// title, then the placeholder. Names without a usable extension, or with a
/// placeholder one, get the extension inferred from the payload.
pub fn resolve_file_name(sources: &NameSources<'_>, payload: &[u8], content_type: Option<&str>) -> String {
    let base = usable_name(sources.stored_name)
        .map(str::to_string)
        .or_else(|| sources.url.and_then(name_from_url))
        .or_else(|| usable_name(sources.title).map(str::to_string))
        .unwrap_or_else(|| sources.placeholder.clone());

    let base = base.trim().trim_end_matches('.').to_string();

    let named = match split_extension(&base) {
        Some((stem, ext)) if PLACEHOLDER_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            format!("{}.{}", stem, infer_extension(payload, content_type))
        }
        Some(_) => base,
        None => format!("{}.{}", base, infer_extension(payload, content_type)),
    };

    sanitize_file_name(&named)
}

/// A name candidate without surrounding blanks or trailing dots. Candidates
/// left empty or without a stem fall through to the next source.
fn usable_name(value: Option<&str>) -> Option<&str> {
    value
        .map(|v| v.trim().trim_end_matches('.').trim_end())
        .filter(|v| !v.is_empty() && !v.starts_with('.'))
}

/// Splits `name` into stem and extension when the extension looks real.
fn split_extension(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind('.')?;
    let (stem, ext) = (&name[..dot], &name[dot + 1..]);

    let plausible = !stem.is_empty()
        && !ext.is_empty()
        && ext.chars().count() <= MAX_EXTENSION_CHARS
        && ext.chars().all(|c| c.is_ascii_alphanumeric());

    plausible.then_some((stem, ext))
}

/// Last path segment of a URL, without query or fragment, percent-decoded.
/// Relative paths and strings that do not parse as a URL are split by hand.
fn name_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let segment = match Url::parse(url).ok().and_then(|parsed| last_segment(&parsed)) {
        Some(segment) => segment,
        None => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            path.rsplit(['/', '\\']).next().unwrap_or_default().to_string()
        }
    };

    let decoded = percent_decode_str(&segment).decode_utf8_lossy();
    usable_name(Some(&*decoded)).map(str::to_string)
}

fn last_segment(url: &Url) -> Option<String> {
    url.path_segments()?.next_back().map(str::to_string)
}
