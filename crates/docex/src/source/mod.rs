//! Relational sources holding the attachment tables.
//!
//! The extraction pipeline only needs two things from a source: a
//! connectivity check and a forward-only stream of rows. Rows are handed out
//! one at a time as [`SourceRow`] values so a large payload is never buffered
//! alongside its neighbours.

pub mod row;
pub mod sqlite;

use crate::error::{DocexError, Result};
use serde::Serialize;
use std::fmt;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;

pub use row::{SourceRow, Value};
pub use sqlite::{SqliteConnector, SqliteSource};

/// Where to read from and where to write to.
#[derive(Clone)]
pub struct ConnectionSettings {
    pub server: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub output_root: PathBuf,
}

impl ConnectionSettings {
    /// Checks that every field is filled in.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("server", self.server.trim().is_empty()),
            ("database", self.database.trim().is_empty()),
            ("username", self.username.trim().is_empty()),
            ("password", self.password.is_empty()),
            ("output root", self.output_root.as_os_str().is_empty()),
        ];

        match fields.iter().find(|(_, empty)| *empty) {
            Some((name, _)) => Err(DocexError::Config(format!("{} must not be empty", name))),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("output_root", &self.output_root)
            .finish()
    }
}

/// Result of a connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionCheck {
    pub ok: bool,
    pub message: String,
}

impl ConnectionCheck {
    pub fn success(message: impl Into<String>) -> Self {
        Self { ok: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, message: message.into() }
    }
}

/// One open connection. Never shared between threads.
pub trait SourceConnection {
    fn verify(&self) -> ConnectionCheck;

    /// Runs `query` and feeds each row to `visitor` until the rows run out or
    /// the visitor breaks.
    ///
    /// Errors opening or reading the stream are returned; errors the visitor
    /// handles itself are not.
    fn stream_rows(
        &self,
        query: &str,
        timeout: Duration,
        visitor: &mut dyn FnMut(SourceRow) -> ControlFlow<()>,
    ) -> Result<()>;
}

/// Opens connections to one source. Parallel runs open one per category.
pub trait SourceConnector: Sync {
    type Connection: SourceConnection;

    fn connect(&self) -> Result<Self::Connection>;

    /// Human readable description for logs.
    fn describe(&self) -> String;
}

/// Connects and checks the source without running any extraction.
pub fn check_connection<C: SourceConnector>(connector: &C) -> ConnectionCheck {
    match connector.connect() {
        Ok(conn) => conn.verify(),
        Err(e) => ConnectionCheck::failure(format!(
            "Cannot connect to {}: {}",
            connector.describe(),
            e
        )),
    }
}
