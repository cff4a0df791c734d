use super::events::publish;
use super::{CancellationToken, CategoryStatus, LogEntry, LogSink, ProgressBoard, ProgressCounter, RunTotals};
use crate::category::{CategoryDefinition, CategoryOutcome, CategoryProcessor, DEFINITIONS};
use crate::error::{DocexError, Result};
use crate::index::DuplicateIndex;
use crate::source::{
    check_connection, ConnectionCheck, ConnectionSettings, SourceConnection, SourceConnector, SqliteConnector,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Label used for log entries that belong to the run rather than a category.
pub const RUN_LABEL: &str = "Run";

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run every category on its own thread and connection.
    pub parallel: bool,
    pub query_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            query_timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
    pub categories: Vec<ProgressCounter>,
    pub totals: RunTotals,
}

impl RunSummary {
    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

/// Drives all nine categories against one source.
pub struct Extractor<C: SourceConnector> {
    connector: C,
    output_root: PathBuf,
    options: RunOptions,
    index: DuplicateIndex,
}

impl Extractor<SqliteConnector> {
    /// Builds an extractor for the SQLite database named by `settings`.
    pub fn from_settings(settings: &ConnectionSettings, options: RunOptions) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(
            SqliteConnector::from_settings(settings),
            &settings.output_root,
            options,
        ))
    }
}

impl<C: SourceConnector> Extractor<C> {
    pub fn new<P: AsRef<Path>>(connector: C, output_root: P, options: RunOptions) -> Self {
        Self {
            connector,
            output_root: output_root.as_ref().to_path_buf(),
            options,
            index: DuplicateIndex::new(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn index(&self) -> &DuplicateIndex {
        &self.index
    }

    pub fn verify_connection(&self) -> ConnectionCheck {
        check_connection(&self.connector)
    }

    /// Extracts every category.
    ///
    /// Returns an error only when the run cannot start: the output root cannot
    /// be created or the source cannot be reached. Category and row failures
    /// are reported through `progress` and `sink`.
    pub fn run(
        &self,
        progress: &ProgressBoard,
        sink: &dyn LogSink,
        cancel: &CancellationToken,
    ) -> Result<RunSummary> {
        let started_at = Utc::now();
        self.index.reset();
        progress.reset();

        fs::create_dir_all(&self.output_root).map_err(|source| DocexError::OutputRoot {
            path: self.output_root.clone(),
            source,
        })?;

        let conn = self.connector.connect()?;
        let check = conn.verify();
        if !check.ok {
            return Err(DocexError::Connection(check.message));
        }
        publish(sink, LogEntry::info(RUN_LABEL, check.message));

        let processor = CategoryProcessor {
            index: &self.index,
            progress,
            sink,
            cancel,
            output_root: &self.output_root,
            query_timeout: self.options.query_timeout,
        };

        if self.options.parallel {
            drop(conn);
            self.run_parallel(&processor);
        } else {
            for def in DEFINITIONS.iter() {
                if cancel.is_cancelled() {
                    break;
                }
                run_category(&processor, def, &conn);
            }
        }

        let cancelled = cancel.is_cancelled();
        let summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            cancelled,
            categories: progress.snapshot(),
            totals: progress.totals(),
        };

        let totals = summary.totals;
        let message = format!(
            "{}: {} saved, {} duplicates, {} failed of {} rows",
            if cancelled { "Cancelled" } else { "Finished" },
            totals.succeeded,
            totals.duplicates,
            totals.failed,
            totals.total_rows
        );
        publish(sink, LogEntry::info(RUN_LABEL, message));

        Ok(summary)
    }

    fn run_parallel(&self, processor: &CategoryProcessor<'_>) {
        thread::scope(|scope| {
            for def in DEFINITIONS.iter() {
                scope.spawn(move || {
                    if processor.cancel.is_cancelled() {
                        return;
                    }
                    match self.connector.connect() {
                        Ok(conn) => run_category(processor, def, &conn),
                        Err(e) => {
                            processor.progress.set_status(def.category, CategoryStatus::Error);
                            publish(
                                processor.sink,
                                LogEntry::error(def.category.as_str(), format!("Cannot connect: {}", e)),
                            );
                        }
                    }
                });
            }
        });
    }
}

fn run_category<S>(processor: &CategoryProcessor<'_>, def: &CategoryDefinition, conn: &S)
where
    S: SourceConnection + ?Sized,
{
    let category = def.category;
    processor.progress.set_status(category, CategoryStatus::Processing);

    let status = match processor.process(def, conn) {
        Ok(CategoryOutcome::Completed) => CategoryStatus::Completed,
        Ok(CategoryOutcome::Cancelled) => CategoryStatus::Cancelled,
        Ok(CategoryOutcome::SourceFailed(_)) => CategoryStatus::Error,
        Err(e) => {
            publish(
                processor.sink,
                LogEntry::error(category.as_str(), format!("Fatal error: {}", e)),
            );
            CategoryStatus::Error
        }
    };

    processor.progress.set_status(category, status);
}

/// Validates `settings` and checks the SQLite source they describe.
pub fn verify_connection(settings: &ConnectionSettings) -> ConnectionCheck {
    if let Err(e) = settings.validate() {
        return ConnectionCheck::failure(e.to_string());
    }
    check_connection(&SqliteConnector::from_settings(settings))
}
