pub mod category;
pub mod classify;
pub mod config;
pub mod error;
pub mod index;
pub mod naming;
pub mod run;
pub mod source;
pub mod util;

pub use category::Category;
pub use config::Config;
pub use error::{DocexError, Result};
pub use run::{CancellationToken, Extractor, LogEntry, LogSink, ProgressBoard, RunOptions, RunSummary, Severity};
pub use source::{ConnectionCheck, ConnectionSettings, SqliteConnector};
