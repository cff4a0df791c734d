use super::{ConnectionCheck, ConnectionSettings, SourceConnection, SourceConnector, SourceRow, Value};
use crate::error::{DocexError, Result};
use rusqlite::{Connection, OpenFlags};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Opens read-only connections to a SQLite database file.
///
/// `server` names the directory holding the database and `database` the file
/// inside it. SQLite has no login, so the credentials are not used.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn from_settings(settings: &ConnectionSettings) -> Self {
        Self::new(Path::new(&settings.server).join(&settings.database))
    }
}

impl SourceConnector for SqliteConnector {
    type Connection = SqliteSource;

    fn connect(&self) -> Result<SqliteSource> {
        if !self.path.is_file() {
            return Err(DocexError::Connection(format!(
                "database file not found: {}",
                self.path.display()
            )));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)?;
        log::debug!("Opened {}", self.path.display());

        Ok(SqliteSource {
            conn,
            label: self.path.display().to_string(),
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct SqliteSource {
    conn: Connection,
    label: String,
}

impl SourceConnection for SqliteSource {
    fn verify(&self) -> ConnectionCheck {
        match self
            .conn
            .query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0))
        {
            Ok(version) => {
                ConnectionCheck::success(format!("Connected to {} (SQLite {})", self.label, version))
            }
            Err(e) => ConnectionCheck::failure(format!("Connection check failed for {}: {}", self.label, e)),
        }
    }

    fn stream_rows(
        &self,
        query: &str,
        timeout: Duration,
        visitor: &mut dyn FnMut(SourceRow) -> ControlFlow<()>,
    ) -> Result<()> {
        self.conn.busy_timeout(timeout)?;

        let mut stmt = self.conn.prepare(query)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                columns.push((name.clone(), Value::from(row.get_ref(i)?)));
            }

            if visitor(SourceRow::new(columns)).is_break() {
                break;
            }
        }

        Ok(())
    }
}
