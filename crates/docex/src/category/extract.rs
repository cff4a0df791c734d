use super::CategoryDefinition;
use crate::error::Result;
use crate::naming::{resolve_file_name, sanitize_folder_name, NameSources};
use crate::source::SourceRow;
use std::fmt;
use std::path::{Path, PathBuf};

/// A document ready to be written: payload, final file name and the folder
/// it belongs in. The full path is resolved by the driver right before the
/// write.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub payload: Vec<u8>,
    pub file_name: String,
    pub folder: PathBuf,
}

impl DocumentRecord {
    pub fn candidate_path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }
}

/// Expected reasons for a row not producing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoFileData,
    MissingFolderInformation,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFileData => f.write_str("no file data"),
            SkipReason::MissingFolderInformation => f.write_str("missing folder information"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Extracted(DocumentRecord),
    Skipped(SkipReason),
}

/// Maps one result row to a document under `category_root`.
///
/// Absent data is reported as [`RowOutcome::Skipped`]; malformed rows (a
/// column of the wrong type, a column the query did not select) are errors.
pub fn extract_document(
    def: &CategoryDefinition,
    mut row: SourceRow,
    category_root: &Path,
) -> Result<RowOutcome> {
    let payload = match row.take_blob("file_data")? {
        Some(payload) => payload,
        None => return Ok(RowOutcome::Skipped(SkipReason::NoFileData)),
    };

    let segments = match (def.grouping)(&row)? {
        Some(segments) => segments,
        None => return Ok(RowOutcome::Skipped(SkipReason::MissingFolderInformation)),
    };

    let folder = segments
        .iter()
        .fold(category_root.to_path_buf(), |path, segment| path.join(sanitize_folder_name(segment)));

    let stored_name = row.text("file_name")?;
    let url = row.text("file_url")?;
    let title = row.text("title")?;
    let content_type = row.text("content_type")?;
    let placeholder = match row.text("doc_id")? {
        Some(id) => format!("{}_{}", def.category, id),
        None => format!("{}_document", def.category),
    };

    let sources = NameSources {
        stored_name: stored_name.as_deref(),
        url: url.as_deref(),
        title: title.as_deref(),
        placeholder,
    };
    let file_name = resolve_file_name(&sources, &payload, content_type.as_deref());

    Ok(RowOutcome::Extracted(DocumentRecord {
        payload,
        file_name,
        folder,
    }))
}
