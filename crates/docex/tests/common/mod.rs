#![allow(dead_code)]

use docex_lib::run::RunOptions;
use docex_lib::{Category, ConnectionSettings, Extractor, Result, SqliteConnector};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

pub const DATABASE_FILE: &str = "source.db";

const SCHEMA: &str = include_str!("../fixtures/source_schema.sql");

/// A source database with one parent record per category and an empty output
/// root, both inside a temp dir.
pub struct SourceFixture {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub output_root: PathBuf,
    pub conn: Connection,
}

impl SourceFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let db_path = temp_dir.path().join(DATABASE_FILE);
        let output_root = temp_dir.path().join("export");

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(SCHEMA)?;
        seed_parents(&conn)?;

        Ok(Self {
            temp_dir,
            db_path,
            output_root,
            conn,
        })
    }

    pub fn settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            server: self.temp_dir.path().to_string_lossy().to_string(),
            database: DATABASE_FILE.to_string(),
            username: "reader".to_string(),
            password: "secret".to_string(),
            output_root: self.output_root.clone(),
        }
    }

    pub fn extractor(&self, options: RunOptions) -> Extractor<SqliteConnector> {
        Extractor::new(SqliteConnector::new(&self.db_path), &self.output_root, options)
    }

    /// Inserts an attachment for `category` pointing at parent record 1.
    pub fn attach(&self, category: Category, file_name: Option<&str>, payload: Option<&[u8]>) -> Result<i64> {
        self.attach_with(category, file_name, None, None, payload)
    }

    pub fn attach_with(
        &self,
        category: Category,
        file_name: Option<&str>,
        title: Option<&str>,
        content_type: Option<&str>,
        payload: Option<&[u8]>,
    ) -> Result<i64> {
        let (table, parent_column) = attachment_table(category);
        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}, file_name, file_url, title, content_type, file_data)
                 VALUES (1, ?1, NULL, ?2, ?3, ?4)",
                table, parent_column
            ),
            (file_name, title, content_type, payload),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn drop_table(&self, category: Category) -> Result<()> {
        let (table, _) = attachment_table(category);
        self.conn.execute_batch(&format!("DROP TABLE {}", table))?;
        Ok(())
    }

    /// Every file under the output root, relative to it, sorted.
    pub fn written_files(&self) -> Vec<PathBuf> {
        let mut relative: Vec<PathBuf> = WalkDir::new(&self.output_root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(&self.output_root).ok().map(Path::to_path_buf))
            .collect();
        relative.sort();
        relative
    }
}

pub fn attachment_table(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Risk => ("risk_attachments", "risk_id"),
        Category::Incident => ("incident_attachments", "incident_id"),
        Category::Control => ("control_attachments", "control_id"),
        Category::Action => ("action_attachments", "action_id"),
        Category::Compliance => ("compliance_attachments", "regulation_id"),
        Category::AuditRecommendation => ("audit_recommendation_attachments", "recommendation_id"),
        Category::AuditDetails => ("audit_attachments", "audit_id"),
        Category::AuditFinding => ("audit_finding_attachments", "finding_id"),
        Category::Policy => ("policy_documents", "policy_id"),
    }
}

/// A small payload that sniffs as PDF and differs per `n`.
pub fn pdf(n: usize) -> Vec<u8> {
    format!("%PDF-1.4\n% document {}\n%%EOF\n", n).into_bytes()
}

fn seed_parents(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "INSERT INTO risk_types (id, name) VALUES (1, 'Operational');
         INSERT INTO risks (id, code, risk_type_id) VALUES (1, 'R-001', 1);
         INSERT INTO incidents (id, code) VALUES (1, 'INC-1');
         INSERT INTO controls (id, reference, title) VALUES (1, 'C-10', 'Access Review');
         INSERT INTO actions (id, code) VALUES (1, 'ACT-7');
         INSERT INTO regulations (id, code, name) VALUES (1, 'GDPR', 'Data Protection');
         INSERT INTO obligations (id, code, name) VALUES (1, 'OB-3', 'Annual Filing');
         INSERT INTO licenses (id, code, name) VALUES (1, 'LIC-9', 'Operating');
         INSERT INTO permits (id, code, name) VALUES (1, 'PRM-2', 'Discharge');
         INSERT INTO audits (id, audit_number) VALUES (1, 'AUD-2024');
         INSERT INTO audit_findings (id, audit_id, finding_number) VALUES (1, 1, 'F-1');
         INSERT INTO audit_recommendations (id, finding_id, recommendation_number) VALUES (1, 1, 'REC-1');
         INSERT INTO policies (id, code, title) VALUES (1, 'POL-1', 'Acceptable Use');",
    )?;
    Ok(())
}
