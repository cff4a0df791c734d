use std::path::{Path, PathBuf};

/// Returns `candidate` if nothing exists there, otherwise the first free
/// `stem_N.ext` sibling counting up from 1.
///
/// The search is not atomic: callers write with create-new semantics so a
/// concurrent writer surfaces as an error instead of an overwrite.
pub fn unique_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|e| e.to_string_lossy().to_string());

    let mut counter: u64 = 1;
    loop {
        let file_name = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let sibling = parent.join(file_name);
        if !sibling.exists() {
            return sibling;
        }
        counter += 1;
    }
}
