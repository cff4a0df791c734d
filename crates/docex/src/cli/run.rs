use super::{resolve_settings, SourceArgs};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use docex_lib::run::{CategoryStatus, ProgressBoard, RunSummary};
use docex_lib::util::{create_spinner, format_duration, format_timestamp};
use docex_lib::{CancellationToken, Config, Extractor, LogEntry, Result, Severity};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

pub struct RunArgs {
    pub source: SourceArgs,
    pub output: Option<PathBuf>,
    pub parallel: bool,
    pub query_timeout: Option<u64>,
    pub log_file: Option<PathBuf>,
}

/// Returns true when every category completed.
pub fn handle_run_command(config: &Config, args: RunArgs, verbose: bool) -> Result<bool> {
    let settings = resolve_settings(config, args.source, args.output)?;

    let mut options = config.run.options();
    options.parallel |= args.parallel;
    if let Some(secs) = args.query_timeout {
        options.query_timeout = Duration::from_secs(secs);
    }

    let extractor = Extractor::from_settings(&settings, options)?;

    let log_writer = match &args.log_file {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log::warn!("Ctrl-C will not stop the run cleanly: {}", e);
    }

    println!(
        "{} {} → {}",
        style("Extracting").bold().cyan(),
        settings.database,
        extractor.output_root().display()
    );

    let progress = ProgressBoard::new();
    let spinner = create_spinner("Connecting");
    let (tx, rx) = mpsc::channel::<LogEntry>();

    let result = thread::scope(|scope| {
        let printer_spinner = spinner.clone();
        let board = &progress;
        let printer = scope.spawn(move || print_entries(rx, board, &printer_spinner, log_writer, verbose));

        let result = extractor.run(&progress, &tx, &cancel);
        drop(tx);

        if let Ok(Err(e)) = printer.join() {
            log::warn!("Could not write log file: {}", e);
        }
        result
    });

    spinner.finish_and_clear();
    let summary = result?;

    show_summary(&summary);
    if let Some(path) = &args.log_file {
        println!("Log written to {}", path.display());
    }

    let clean = !summary.cancelled
        && summary
            .categories
            .iter()
            .all(|c| c.status == CategoryStatus::Completed);
    Ok(clean)
}

fn print_entries(
    rx: Receiver<LogEntry>,
    progress: &ProgressBoard,
    spinner: &ProgressBar,
    mut log_writer: Option<BufWriter<File>>,
    verbose: bool,
) -> io::Result<()> {
    for entry in rx {
        if let Some(writer) = log_writer.as_mut() {
            serde_json::to_writer(&mut *writer, &entry)?;
            writer.write_all(b"\n")?;
        }

        if verbose || entry.severity != Severity::Info {
            spinner.println(format_entry(&entry));
        }
        spinner.set_message(progress_message(progress));
    }

    if let Some(writer) = log_writer.as_mut() {
        writer.flush()?;
    }
    Ok(())
}

fn format_entry(entry: &LogEntry) -> String {
    let mut line = format!("{} {:<20} {}", style(format_timestamp(&entry.timestamp)).dim(), entry.category, entry.message);
    if let (Some(name), Some(size)) = (&entry.file_name, entry.display_size()) {
        line.push_str(&format!(" {}", style(format!("({}, {})", name, size)).dim()));
    }

    match entry.severity {
        Severity::Info => style(line).dim().to_string(),
        Severity::Success => format!("{} {}", style("✓").green(), line),
        Severity::Warning => format!("{} {}", style("!").yellow(), style(line).yellow()),
        Severity::Error => format!("{} {}", style("✗").red(), style(line).red()),
    }
}

fn progress_message(progress: &ProgressBoard) -> String {
    let snapshot = progress.snapshot();
    let active: Vec<String> = snapshot
        .iter()
        .filter(|c| c.status == CategoryStatus::Processing)
        .map(|c| match &c.current_file {
            Some(file) => format!("{} ({})", c.category, file),
            None => c.category.to_string(),
        })
        .collect();

    let totals = progress.totals();
    format!(
        "{} | {} saved, {} duplicates, {} failed",
        if active.is_empty() { "Waiting".to_string() } else { active.join(", ") },
        totals.succeeded,
        totals.duplicates,
        totals.failed
    )
}

fn status_cell(status: CategoryStatus) -> Cell {
    let color = match status {
        CategoryStatus::Completed => Color::Green,
        CategoryStatus::Error => Color::Red,
        CategoryStatus::Cancelled => Color::Yellow,
        CategoryStatus::Pending | CategoryStatus::Processing => Color::Grey,
    };
    Cell::new(status.as_str()).fg(color)
}

fn show_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Rows").fg(Color::Cyan),
        Cell::new("Saved").fg(Color::Cyan),
        Cell::new("Duplicates").fg(Color::Cyan),
        Cell::new("Failed").fg(Color::Cyan),
    ]);

    for counter in &summary.categories {
        table.add_row(vec![
            Cell::new(counter.category.as_str()),
            status_cell(counter.status),
            Cell::new(counter.total_rows),
            Cell::new(counter.succeeded),
            Cell::new(counter.duplicates),
            Cell::new(counter.failed),
        ]);
    }

    let totals = summary.totals;
    table.add_row(vec![
        Cell::new("Total").fg(Color::Cyan),
        Cell::new(""),
        Cell::new(totals.total_rows),
        Cell::new(totals.succeeded),
        Cell::new(totals.duplicates),
        Cell::new(totals.failed),
    ]);

    println!("\n{}", table);

    let headline = if summary.cancelled {
        style("Run cancelled").yellow().bold()
    } else {
        style("Run finished").green().bold()
    };
    println!("{} in {}", headline, format_duration(summary.elapsed()));
}
