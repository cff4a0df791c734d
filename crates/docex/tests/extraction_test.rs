mod common;

use common::{pdf, SourceFixture};
use docex_lib::run::{verify_connection, CategoryStatus, CollectingSink, ProgressBoard, RunOptions, RunTotals};
use docex_lib::{CancellationToken, Category, DocexError, Extractor, LogEntry, Severity, SqliteConnector};
use std::path::PathBuf;

fn run_sequential(fixture: &SourceFixture) -> (docex_lib::RunSummary, CollectingSink) {
    let extractor = fixture.extractor(RunOptions::default());
    let sink = CollectingSink::new();
    let summary = extractor
        .run(&ProgressBoard::new(), &sink, &CancellationToken::new())
        .unwrap();
    (summary, sink)
}

#[test]
fn test_every_category_extracts_into_its_folder() {
    let fixture = SourceFixture::new().unwrap();
    for (i, category) in Category::ALL.iter().enumerate() {
        let name = format!("doc{}.pdf", i);
        fixture.attach(*category, Some(name.as_str()), Some(pdf(i).as_slice())).unwrap();
    }

    let (summary, sink) = run_sequential(&fixture);

    assert!(!summary.cancelled);
    assert!(summary
        .categories
        .iter()
        .all(|c| c.status == CategoryStatus::Completed));
    assert_eq!(
        summary.totals,
        RunTotals {
            total_rows: 9,
            succeeded: 9,
            failed: 0,
            duplicates: 0,
        }
    );
    assert_eq!(sink.with_severity(Severity::Success).len(), 9);

    let expected: Vec<PathBuf> = [
        "Action/ACT-7/doc3.pdf",
        "AuditDetails/AUD-2024/doc6.pdf",
        "AuditFinding/AUD-2024/F-1/doc7.pdf",
        "AuditRecommendation/AUD-2024/REC-1/doc5.pdf",
        "Compliance/Regulations/GDPR_Data Protection/doc4.pdf",
        "Control/C-10_Access Review/doc2.pdf",
        "Incident/INC-1/doc1.pdf",
        "Policy/POL-1_Acceptable Use/doc8.pdf",
        "Risk/Operational/R-001/doc0.pdf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(fixture.written_files(), expected);

    let written = std::fs::read(fixture.output_root.join("Incident/INC-1/doc1.pdf")).unwrap();
    assert_eq!(written, pdf(1));
}

#[test]
fn test_duplicate_payload_across_categories_written_once() {
    let fixture = SourceFixture::new().unwrap();
    fixture.attach(Category::Risk, Some("assessment.pdf"), Some(pdf(1).as_slice())).unwrap();
    fixture.attach(Category::Policy, Some("copy.pdf"), Some(pdf(1).as_slice())).unwrap();

    let (summary, sink) = run_sequential(&fixture);

    assert_eq!(summary.totals.succeeded, 1);
    assert_eq!(summary.totals.duplicates, 1);
    assert_eq!(summary.categories[Category::Policy as usize].duplicates, 1);
    assert_eq!(
        fixture.written_files(),
        vec![PathBuf::from("Risk/Operational/R-001/assessment.pdf")]
    );

    let warnings = sink.with_severity(Severity::Warning);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].category, "Policy");
    assert!(warnings[0].message.contains("assessment.pdf"));
}

#[test]
fn test_name_collision_gets_numbered_suffix() {
    let fixture = SourceFixture::new().unwrap();
    fixture.attach(Category::Incident, Some("report.pdf"), Some(pdf(1).as_slice())).unwrap();
    fixture.attach(Category::Incident, Some("report.pdf"), Some(pdf(2).as_slice())).unwrap();
    fixture.attach(Category::Incident, Some("report.pdf"), Some(pdf(3).as_slice())).unwrap();

    let (summary, _) = run_sequential(&fixture);

    assert_eq!(summary.totals.succeeded, 3);
    assert_eq!(
        fixture.written_files(),
        vec![
            PathBuf::from("Incident/INC-1/report.pdf"),
            PathBuf::from("Incident/INC-1/report_1.pdf"),
            PathBuf::from("Incident/INC-1/report_2.pdf"),
        ]
    );
}

#[test]
fn test_missing_table_fails_only_that_category() {
    let fixture = SourceFixture::new().unwrap();
    for (i, category) in Category::ALL.iter().enumerate() {
        fixture.attach(*category, Some("doc.pdf"), Some(pdf(i).as_slice())).unwrap();
    }
    fixture.drop_table(Category::Action).unwrap();

    let (summary, sink) = run_sequential(&fixture);

    for counter in &summary.categories {
        let expected = if counter.category == Category::Action {
            CategoryStatus::Error
        } else {
            CategoryStatus::Completed
        };
        assert_eq!(counter.status, expected, "{}", counter.category);
    }
    assert_eq!(summary.totals.succeeded, 8);

    let mut summed = RunTotals::default();
    for counter in &summary.categories {
        summed += counter.totals();
    }
    assert_eq!(summary.totals, summed);

    assert!(sink
        .with_severity(Severity::Warning)
        .iter()
        .any(|e| e.category == "Action"));
}

#[test]
fn test_uncreatable_category_folder_is_fatal_for_that_category() {
    let fixture = SourceFixture::new().unwrap();
    for (i, category) in Category::ALL.iter().enumerate() {
        fixture.attach(*category, Some("doc.pdf"), Some(pdf(i).as_slice())).unwrap();
    }
    std::fs::create_dir_all(&fixture.output_root).unwrap();
    std::fs::write(fixture.output_root.join("Incident"), b"a file in the way").unwrap();

    let (summary, sink) = run_sequential(&fixture);

    assert!(!summary.cancelled);
    for counter in &summary.categories {
        let expected = if counter.category == Category::Incident {
            CategoryStatus::Error
        } else {
            CategoryStatus::Completed
        };
        assert_eq!(counter.status, expected, "{}", counter.category);
    }
    assert_eq!(summary.categories[Category::Incident as usize].total_rows, 0);
    assert_eq!(summary.totals.succeeded, 8);

    let errors = sink.with_severity(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].category, "Incident");
    assert!(errors[0].message.contains("Fatal error"));
}

#[test]
fn test_unusable_rows_counted_as_failed() {
    let fixture = SourceFixture::new().unwrap();
    fixture.attach(Category::Incident, Some("empty.pdf"), None).unwrap();
    fixture.attach(Category::Incident, Some("zero.pdf"), Some(&b""[..])).unwrap();
    fixture.attach(Category::Incident, Some("good.pdf"), Some(pdf(1).as_slice())).unwrap();

    let (summary, sink) = run_sequential(&fixture);

    let incident = &summary.categories[Category::Incident as usize];
    assert_eq!(incident.status, CategoryStatus::Completed);
    assert_eq!(incident.total_rows, 3);
    assert_eq!(incident.failed, 2);
    assert_eq!(incident.succeeded, 1);

    let skipped: Vec<_> = sink
        .with_severity(Severity::Warning)
        .into_iter()
        .filter(|e| e.message.contains("no file data"))
        .collect();
    assert_eq!(skipped.len(), 2);
}

#[test]
fn test_name_and_extension_inferred_when_missing() {
    let fixture = SourceFixture::new().unwrap();
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    fixture
        .attach_with(Category::AuditDetails, None, Some("Site Photo"), None, Some(&png[..]))
        .unwrap();
    fixture
        .attach_with(Category::AuditDetails, Some("notes.bin"), None, Some("application/pdf"), Some(pdf(4).as_slice()))
        .unwrap();

    run_sequential(&fixture);

    assert_eq!(
        fixture.written_files(),
        vec![
            PathBuf::from("AuditDetails/AUD-2024/Site Photo.png"),
            PathBuf::from("AuditDetails/AUD-2024/notes.pdf"),
        ]
    );
}

#[test]
fn test_rerun_never_overwrites_existing_files() {
    let fixture = SourceFixture::new().unwrap();
    fixture.attach(Category::Action, Some("plan.pdf"), Some(pdf(1).as_slice())).unwrap();

    run_sequential(&fixture);
    let (summary, _) = run_sequential(&fixture);

    // the index starts empty on each run
    assert_eq!(summary.totals.succeeded, 1);
    assert_eq!(
        fixture.written_files(),
        vec![
            PathBuf::from("Action/ACT-7/plan.pdf"),
            PathBuf::from("Action/ACT-7/plan_1.pdf"),
        ]
    );
}

#[test]
fn test_cancelled_run_leaves_categories_pending() {
    let fixture = SourceFixture::new().unwrap();
    fixture.attach(Category::Risk, Some("a.pdf"), Some(pdf(1).as_slice())).unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let extractor = fixture.extractor(RunOptions::default());
    let summary = extractor
        .run(&ProgressBoard::new(), &CollectingSink::new(), &cancel)
        .unwrap();

    assert!(summary.cancelled);
    assert!(summary
        .categories
        .iter()
        .all(|c| c.status == CategoryStatus::Pending));
    assert!(fixture.written_files().is_empty());
}

#[test]
fn test_cancel_mid_run_keeps_finished_counts() {
    let fixture = SourceFixture::new().unwrap();
    fixture.attach(Category::Risk, Some("r.pdf"), Some(pdf(1).as_slice())).unwrap();
    fixture.attach(Category::Incident, Some("i1.pdf"), Some(pdf(2).as_slice())).unwrap();
    fixture.attach(Category::Incident, Some("i2.pdf"), Some(pdf(3).as_slice())).unwrap();
    fixture.attach(Category::Policy, Some("p.pdf"), Some(pdf(4).as_slice())).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let sink = move |entry: LogEntry| {
        if entry.category == "Incident" && entry.severity == Severity::Success {
            trigger.cancel();
        }
    };

    let extractor = fixture.extractor(RunOptions::default());
    let summary = extractor.run(&ProgressBoard::new(), &sink, &cancel).unwrap();

    assert!(summary.cancelled);
    let risk = &summary.categories[Category::Risk as usize];
    assert_eq!(risk.status, CategoryStatus::Completed);
    assert_eq!(risk.succeeded, 1);

    let incident = &summary.categories[Category::Incident as usize];
    assert_eq!(incident.status, CategoryStatus::Cancelled);
    assert_eq!(incident.total_rows, 1);
    assert_eq!(incident.succeeded, 1);

    for category in &Category::ALL[2..] {
        assert_eq!(summary.categories[*category as usize].status, CategoryStatus::Pending);
    }
    assert_eq!(fixture.written_files().len(), 2);
}

#[test]
fn test_parallel_run_writes_shared_payload_once() {
    let fixture = SourceFixture::new().unwrap();
    for category in Category::ALL {
        fixture.attach(category, Some("shared.pdf"), Some(pdf(0).as_slice())).unwrap();
        fixture
            .attach(category, Some("own.pdf"), Some(pdf(category as usize + 1).as_slice()))
            .unwrap();
    }

    let extractor = fixture.extractor(RunOptions {
        parallel: true,
        ..RunOptions::default()
    });
    let progress = ProgressBoard::new();
    let summary = extractor
        .run(&progress, &CollectingSink::new(), &CancellationToken::new())
        .unwrap();

    assert!(summary
        .categories
        .iter()
        .all(|c| c.status == CategoryStatus::Completed));
    assert_eq!(summary.totals.total_rows, 18);
    assert_eq!(summary.totals.succeeded, 10);
    assert_eq!(summary.totals.duplicates, 8);
    assert_eq!(extractor.index().len(), 10);

    let shared = fixture
        .written_files()
        .into_iter()
        .filter(|p| p.file_name().is_some_and(|n| n == "shared.pdf"))
        .count();
    assert_eq!(shared, 1);
    assert_eq!(fixture.written_files().len(), 10);
}

#[test]
fn test_connection_check() {
    let fixture = SourceFixture::new().unwrap();

    let check = verify_connection(&fixture.settings());
    assert!(check.ok, "{}", check.message);

    let mut wrong = fixture.settings();
    wrong.database = "absent.db".to_string();
    let check = verify_connection(&wrong);
    assert!(!check.ok);
    assert!(check.message.contains("absent.db"));
}

#[test]
fn test_from_settings_rejects_blank_fields() {
    let fixture = SourceFixture::new().unwrap();
    let mut settings = fixture.settings();
    settings.username = "  ".to_string();

    let result = Extractor::from_settings(&settings, RunOptions::default());
    assert!(matches!(result, Err(DocexError::Config(_))));

    let extractor: Extractor<SqliteConnector> =
        Extractor::from_settings(&fixture.settings(), RunOptions::default()).unwrap();
    assert!(extractor.verify_connection().ok);
}
