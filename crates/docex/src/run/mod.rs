pub mod cancel;
pub mod coordinator;
pub mod events;
pub mod progress;

pub use cancel::CancellationToken;
pub use coordinator::{verify_connection, Extractor, RunOptions, RunSummary, RUN_LABEL};
pub use events::{CollectingSink, LogEntry, LogSink, Severity};
pub use progress::{CategoryStatus, ProgressBoard, ProgressCounter, RunTotals};
