use super::{extract_document, CategoryDefinition, RowOutcome, SkipReason};
use crate::error::{DocexError, Result};
use crate::index::{hash_bytes_blake3, DuplicateIndex, FileTracker, InsertOutcome};
use crate::naming::unique_path;
use crate::run::events::publish;
use crate::run::{CancellationToken, LogEntry, LogSink, ProgressBoard};
use crate::source::{SourceConnection, SourceRow};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Wait between checks on a digest another category is still writing.
const PENDING_RETRY: Duration = Duration::from_millis(5);

/// How a category ended when nothing fatal happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Completed,
    Cancelled,
    /// The query could not be run or its rows could not be read.
    SourceFailed(String),
}

enum RowResult {
    Written(FileTracker),
    Duplicate { file_name: String, original: FileTracker },
    Skipped(SkipReason),
}

/// Runs one category definition against an open connection.
///
/// Row problems are counted and logged, never returned. Query problems end
/// the category with [`CategoryOutcome::SourceFailed`]. Only setup failures
/// such as an uncreatable category folder are returned as errors.
pub struct CategoryProcessor<'a> {
    pub index: &'a DuplicateIndex,
    pub progress: &'a ProgressBoard,
    pub sink: &'a dyn LogSink,
    pub cancel: &'a CancellationToken,
    pub output_root: &'a Path,
    pub query_timeout: Duration,
}

impl<'a> CategoryProcessor<'a> {
    pub fn process<S>(&self, def: &CategoryDefinition, conn: &S) -> Result<CategoryOutcome>
    where
        S: SourceConnection + ?Sized,
    {
        let category = def.category;
        let label = category.as_str();
        let category_root = self.output_root.join(def.root_folder);

        fs::create_dir_all(&category_root).map_err(|source| DocexError::CreateFolder {
            path: category_root.clone(),
            source,
        })?;

        publish(self.sink, LogEntry::info(label, format!("Querying {} documents", label)));

        let mut cancelled = false;
        let streamed = conn.stream_rows(def.query, self.query_timeout, &mut |row| {
            if self.cancel.is_cancelled() {
                cancelled = true;
                return ControlFlow::Break(());
            }

            self.progress.update(category, |c| c.total_rows += 1);
            self.handle_row(def, row, &category_root);
            ControlFlow::Continue(())
        });

        if let Err(e) = streamed {
            publish(
                self.sink,
                LogEntry::warning(
                    label,
                    format!("Could not read {} documents, the table may not exist: {}", label, e),
                ),
            );
            return Ok(CategoryOutcome::SourceFailed(e.to_string()));
        }

        self.progress.update(category, |c| c.current_file = None);

        if cancelled {
            publish(self.sink, LogEntry::info(label, "Cancelled"));
            return Ok(CategoryOutcome::Cancelled);
        }

        let counter = self.progress.get(category);
        publish(
            self.sink,
            LogEntry::info(
                label,
                format!(
                    "Finished: {} saved, {} duplicates, {} failed of {} rows",
                    counter.succeeded, counter.duplicates, counter.failed, counter.total_rows
                ),
            ),
        );

        Ok(CategoryOutcome::Completed)
    }

    fn handle_row(&self, def: &CategoryDefinition, row: SourceRow, category_root: &Path) {
        let category = def.category;
        let label = category.as_str();
        let row_id = row
            .text("doc_id")
            .ok()
            .flatten()
            .unwrap_or_else(|| "?".to_string());

        match self.process_row(def, row, category_root) {
            Ok(RowResult::Written(tracker)) => {
                self.progress.update(category, |c| c.succeeded += 1);
                let shown = tracker
                    .path
                    .strip_prefix(self.output_root)
                    .unwrap_or(&tracker.path)
                    .display()
                    .to_string();
                publish(
                    self.sink,
                    LogEntry::success(label, format!("Saved {}", shown))
                        .with_file(tracker.display_name, Some(tracker.size_bytes)),
                );
            }
            Ok(RowResult::Duplicate { file_name, original }) => {
                self.progress.update(category, |c| c.duplicates += 1);
                publish(
                    self.sink,
                    LogEntry::warning(
                        label,
                        format!(
                            "Row {} duplicates {} ({}), skipped",
                            row_id, original.display_name, original.category
                        ),
                    )
                    .with_file(file_name, Some(original.size_bytes)),
                );
            }
            Ok(RowResult::Skipped(reason)) => {
                self.progress.update(category, |c| c.failed += 1);
                publish(
                    self.sink,
                    LogEntry::warning(label, format!("Row {} skipped: {}", row_id, reason)),
                );
            }
            Err(e) => {
                self.progress.update(category, |c| c.failed += 1);
                publish(
                    self.sink,
                    LogEntry::error(label, format!("Row {} failed: {}", row_id, e)),
                );
            }
        }
    }

    fn process_row(&self, def: &CategoryDefinition, row: SourceRow, category_root: &Path) -> Result<RowResult> {
        let doc = match extract_document(def, row, category_root)? {
            RowOutcome::Extracted(doc) => doc,
            RowOutcome::Skipped(reason) => return Ok(RowResult::Skipped(reason)),
        };

        let file_name = doc.file_name.clone();
        self.progress
            .update(def.category, |c| c.current_file = Some(file_name.clone()));

        let hash = hash_bytes_blake3(&doc.payload);
        if let Some(original) = self.index.try_get(&hash) {
            return Ok(RowResult::Duplicate { file_name, original });
        }

        fs::create_dir_all(&doc.folder).map_err(|source| DocexError::CreateFolder {
            path: doc.folder.clone(),
            source,
        })?;

        let path = unique_path(&doc.candidate_path());
        let tracker = FileTracker {
            hash: hash.clone(),
            display_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.clone()),
            size_bytes: doc.payload.len() as u64,
            path,
            category: def.category,
        };

        // another category may have claimed the digest since try_get
        loop {
            match self.index.try_insert(&hash, tracker.clone()) {
                InsertOutcome::Inserted => break,
                InsertOutcome::Duplicate(original) => return Ok(RowResult::Duplicate { file_name, original }),
                InsertOutcome::Pending => thread::sleep(PENDING_RETRY),
            }
        }

        if let Err(e) = write_new_file(&tracker.path, &doc.payload) {
            self.index.release(&hash);
            return Err(e);
        }
        self.index.commit(&hash);

        Ok(RowResult::Written(tracker))
    }
}

/// Writes `payload` to a path that must not exist yet.
fn write_new_file(path: &Path, payload: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| DocexError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;

    if let Err(source) = file.write_all(payload).and_then(|_| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(DocexError::WriteFile {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
