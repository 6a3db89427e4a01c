//! Results table and irregularity report.

use owo_colors::{Stream, Style};
use std::fmt::Write;

use crate::geometry::IrregularityKind;
use crate::logger::paint;
use crate::pipeline::{BatchReport, FileDiagnostics, FileResult};
use crate::utils::display_path;
use crate::utils::fmt::{fmt_kb, fmt_savings, fmt_time};

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy)]
enum Tone {
    Path,
    Plain,
    Success,
    Info,
    Dim,
}

struct Column {
    header: &'static str,
    align: Align,
    tone: Tone,
}

const COLUMNS: [Column; 6] = [
    Column { header: "File", align: Align::Left, tone: Tone::Path },
    Column { header: "Original", align: Align::Right, tone: Tone::Plain },
    Column { header: "Optimized", align: Align::Right, tone: Tone::Plain },
    Column { header: "Savings", align: Align::Right, tone: Tone::Success },
    Column { header: "Cleanup", align: Align::Left, tone: Tone::Info },
    Column { header: "Time", align: Align::Right, tone: Tone::Dim },
];

const GAP: &str = "  ";

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

fn on_stdout(text: &str, style: Style) -> String {
    paint(Stream::Stdout, text, style)
}

fn cell(text: &str, tone: Tone, bold: bool) -> String {
    let style = match tone {
        Tone::Path => Style::new().cyan(),
        Tone::Plain => Style::new(),
        Tone::Success => Style::new().green(),
        Tone::Info => Style::new().blue(),
        Tone::Dim => Style::new().dimmed(),
    };
    on_stdout(text, if bold { style.bold() } else { style })
}

fn row(result: &FileResult) -> [String; 6] {
    let path = display_path(&result.path);
    let file = if result.cached {
        format!("{path} (cached)")
    } else {
        path
    };
    [
        file,
        fmt_kb(result.original_size),
        fmt_kb(result.optimized_size),
        fmt_savings(result.saved(), result.original_size),
        result.stats.map_or_else(|| "nothing".to_string(), |s| s.to_string()),
        fmt_time(result.elapsed),
    ]
}

fn footer(results: &[FileResult]) -> [String; 6] {
    let original: u64 = results.iter().map(|r| r.original_size).sum();
    let optimized: u64 = results.iter().map(|r| r.optimized_size).sum();
    let cleaned: usize = results
        .iter()
        .filter_map(|r| r.stats.map(|s| s.total()))
        .sum();
    let elapsed: f64 = results.iter().map(|r| r.elapsed).sum();

    [
        "Total Summary".to_string(),
        fmt_kb(original),
        fmt_kb(optimized),
        fmt_savings(original.saturating_sub(optimized), original),
        if cleaned > 0 {
            format!("{cleaned} items")
        } else {
            String::new()
        },
        fmt_time(elapsed),
    ]
}

/// Aligned table of per-file results with a totals footer.
pub fn render_results(results: &[FileResult]) -> String {
    let rows: Vec<[String; 6]> = results.iter().map(row).collect();
    let totals = footer(results);

    let mut widths = COLUMNS.map(|c| c.header.len());
    for cells in rows.iter().chain(std::iter::once(&totals)) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| cells.join(GAP).trim_end().to_string();
    let mut out = String::new();

    let header = COLUMNS
        .iter()
        .zip(widths)
        .map(|(c, w)| on_stdout(&pad(c.header, w, c.align), Style::new().bold().magenta()))
        .collect();
    writeln!(out, "{}", line(header)).ok();

    for cells in &rows {
        let styled = COLUMNS
            .iter()
            .zip(widths)
            .zip(cells)
            .map(|((c, w), text)| cell(&pad(text, w, c.align), c.tone, false))
            .collect();
        writeln!(out, "{}", line(styled)).ok();
    }

    let styled = COLUMNS
        .iter()
        .zip(widths)
        .zip(&totals)
        .map(|((c, w), text)| {
            let tone = if matches!(c.tone, Tone::Path) { Tone::Plain } else { c.tone };
            cell(&pad(text, w, c.align), tone, true)
        })
        .collect();
    writeln!(out, "{}", line(styled)).ok();

    out
}

/// `"2.45 KB"` at or above 102 bytes, else `"57 B"`.
#[allow(clippy::cast_precision_loss)]
fn reclaimed(bytes: u64) -> String {
    if bytes >= 102 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Table plus closing line for a finished batch.
pub fn print_report(report: &BatchReport) {
    if report.results.is_empty() {
        if report.failed.is_empty() && report.stage_failure.is_none() {
            println!("{}", on_stdout("No files to optimize.", Style::new().dimmed()));
        } else {
            println!(
                "{}",
                on_stdout("Optimization failed for all files.", Style::new().red().bold())
            );
        }
        return;
    }

    print!("{}", render_results(&report.results));
    println!(
        "  {} Total storage reclaimed: {}",
        on_stdout("✔ Optimization complete!", Style::new().green()),
        on_stdout(&reclaimed(report.total_saved()), Style::new().bold())
    );
    for diagnostics in &report.diagnostics {
        eprint!("{}", render_irregularities(diagnostics));
    }
}

// ============================================================================
// Irregularities
// ============================================================================

/// Color for each finding kind. Exhaustive, so a new kind needs a color.
fn kind_style(kind: IrregularityKind) -> Style {
    match kind {
        IrregularityKind::ZeroLength => Style::new().yellow(),
        IrregularityKind::DegenerateBezier => Style::new().truecolor(255, 135, 0),
        IrregularityKind::DirectionReversal => Style::new().red(),
        IrregularityKind::LengthJump => Style::new().magenta(),
    }
}

/// Irregularity blocks go to stderr.
fn on_stderr(text: &str, style: Style) -> String {
    paint(Stream::Stderr, text, style)
}

/// Block listing every finding of one file, grouped by path element.
pub fn render_irregularities(diagnostics: &FileDiagnostics) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} {}",
        on_stderr("Path irregularities detected in", Style::new().yellow()),
        on_stderr(&display_path(&diagnostics.path), Style::new().cyan())
    )
    .ok();
    for findings in &diagnostics.findings {
        writeln!(out, "  {}", on_stderr(&findings.label, Style::new().bold())).ok();
        for issue in &findings.issues {
            let tag = format!("⚠ {}", issue.kind);
            writeln!(
                out,
                "    {}: {}",
                on_stderr(&tag, kind_style(issue.kind)),
                on_stderr(&issue.detail, Style::new().dimmed())
            )
            .ok();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{PathFindings, PathIrregularity};
    use crate::svg::CleanupStats;
    use std::path::PathBuf;

    fn result(path: &str, orig: u64, new: u64, cached: bool) -> FileResult {
        FileResult {
            path: PathBuf::from(path),
            original_size: orig,
            optimized_size: new,
            elapsed: 0.25,
            stats: Some(CleanupStats {
                attrs_removed: 3,
                groups_removed: 1,
                comments_removed: 0,
            }),
            cached,
        }
    }

    #[test]
    fn test_render_results_plain() {
        owo_colors::set_override(false);
        let table = render_results(&[
            result("/x/a.svg", 4096, 1024, false),
            result("/x/b.svg", 2048, 2048, true),
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("File"));
        assert!(lines[1].contains("4.0K"));
        assert!(lines[1].contains("3.0K (75.0%)"));
        assert!(lines[1].contains("3 attrs, 1 empty group"));
        assert!(lines[2].contains("(cached)"));
        assert!(lines[3].starts_with("Total Summary"));
        assert!(lines[3].contains("8 items"));
        assert!(lines[3].contains("500ms"));

        // Columns line up: every data row places "Original" at the same offset
        let col = lines[0].find("Original").unwrap() + "Original".len();
        assert!(lines[1][..col].ends_with("4.0K"));
        assert!(lines[2][..col].ends_with("2.0K"));
    }

    #[test]
    fn test_render_irregularities_plain() {
        owo_colors::set_override(false);
        let diagnostics = FileDiagnostics {
            path: PathBuf::from("/x/a.svg"),
            findings: vec![PathFindings {
                label: "outline".to_string(),
                issues: vec![PathIrregularity::new(
                    IrregularityKind::DirectionReversal,
                    2,
                    "segment #2 (L) reverses direction".to_string(),
                )],
            }],
        };
        let text = render_irregularities(&diagnostics);
        assert!(text.contains("  outline\n"));
        assert!(text.contains("⚠ direction-reversal: segment #2 (L) reverses direction"));
    }

    #[test]
    fn test_reclaimed() {
        assert_eq!(reclaimed(50), "50 B");
        assert_eq!(reclaimed(2048), "2.00 KB");
    }
}
