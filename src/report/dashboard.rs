//! Watch-mode dashboard: last results plus a short run history.

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{Stream, Style};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io::{Write, stdout};

use super::table::print_report;
use crate::logger::{clock, paint};
use crate::pipeline::{BatchReport, RunRecord};
use crate::utils::fmt::plural_count;

/// The most recent runs, newest last.
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<RunRecord>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, record: RunRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One-line outcome: `"3 files, 1.2KB saved, 2 issues"`.
#[allow(clippy::cast_precision_loss)]
pub fn summary(record: &RunRecord) -> String {
    if !record.success {
        return on_stdout("failed", Style::new().red());
    }
    let mut parts = vec![plural_count(record.file_count, "file")];
    parts.push(if record.bytes_saved >= 102 {
        let saved = format!("{:.1}KB saved", record.bytes_saved as f64 / 1024.0);
        on_stdout(&saved, Style::new().green())
    } else if record.bytes_saved > 0 {
        on_stdout(&format!("{}B saved", record.bytes_saved), Style::new().green())
    } else {
        on_stdout("no savings", Style::new().dimmed())
    });
    if record.irregularity_count > 0 {
        let issues = plural_count(record.irregularity_count, "issue");
        parts.push(on_stdout(&issues, Style::new().yellow()));
    }
    parts.join(", ")
}

fn on_stdout(text: &str, style: Style) -> String {
    paint(Stream::Stdout, text, style)
}

/// History table, newest first.
pub fn render_history(history: &History) -> String {
    let rows: Vec<(String, &str, String)> = history
        .records
        .iter()
        .rev()
        .map(|r| (clock(r.timestamp), r.trigger.as_str(), summary(r)))
        .collect();

    let trigger_width = rows
        .iter()
        .map(|(_, trigger, _)| trigger.chars().count())
        .chain(std::iter::once("Trigger".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    writeln!(
        out,
        "{}  {}  {}",
        on_stdout(&format!("{:<8}", "Time"), Style::new().bold()),
        on_stdout(&format!("{:<trigger_width$}", "Trigger"), Style::new().bold()),
        on_stdout("Result", Style::new().bold())
    )
    .ok();
    for (time, trigger, result) in rows {
        writeln!(
            out,
            "{}  {}  {}",
            on_stdout(&time, Style::new().dimmed()),
            on_stdout(&format!("{trigger:<trigger_width$}"), Style::new().dimmed()),
            result
        )
        .ok();
    }
    out
}

/// Redraw the whole screen.
pub fn print_dashboard(report: Option<&BatchReport>, history: &History, pattern: &str) {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0)).ok();

    println!(
        "{} {}",
        on_stdout("svgpress", Style::new().bright_cyan().bold()),
        on_stdout("• geometry healing", Style::new().dimmed())
    );
    if let Some(report) = report {
        print_report(report);
    }
    println!();
    if !history.is_empty() {
        print!("{}", render_history(history));
    }
    println!(
        "  {}",
        on_stdout(
            &format!("Watching {pattern} - press Ctrl+C to stop"),
            Style::new().dimmed()
        )
    );
    out.flush().ok();
}
