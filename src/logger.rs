//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `ProgressLine` for single-line stage progress with multiple counters
//! - `WatchStatus` for watch mode status messages
//!
//! Everything is written to stderr so that `--json` output on stdout stays
//! machine-readable.
//!
//! # Example
//!
//! ```ignore
//! log!("cache"; "{} hit(s), {} miss(es)", hits, misses);
//!
//! let progress = ProgressLine::new("optimize", &[("vpype", 1), ("svgo", 1), ("xml", 12)]);
//! progress.inc("xml");
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Active progress line count (for log coordination)
static BAR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Apply `style` when `stream` takes colors, honoring `--color`.
pub fn paint(stream: Stream, text: &str, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut out = stderr().lock();

    let bar_count = BAR_COUNT.load(Ordering::SeqCst);
    if bar_count > 0 {
        // Progress line has no trailing newline; wipe it, the next update redraws it
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
    } else {
        execute!(out, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    let style = match module_lower {
        "cache" => Style::new().bright_blue(),
        "watch" => Style::new().bright_green(),
        "diagnose" => Style::new().bright_magenta(),
        "error" => Style::new().bright_red(),
        "warning" => Style::new().yellow(),
        _ => Style::new().bright_yellow(),
    };
    paint(Stream::Stderr, &prefix, style.bold())
}

// ============================================================================
// Watch Status (single-line status with overwrite)
// ============================================================================

/// Current wall-clock time as HH:MM:SS (UTC).
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    clock(secs)
}

/// Format unix seconds as HH:MM:SS.
pub fn clock(secs: u64) -> String {
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Single-line status display for watch mode
///
/// Status messages overwrite the previous one so the terminal keeps one
/// block per state (waiting, running, failed).
pub struct WatchStatus {
    /// Lines of previous output to clear
    last_lines: usize,
}

impl WatchStatus {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(paint(Stream::Stderr, "✗", Style::new().red()), &message);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut out = stderr().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(out, cursor::MoveUp(lines)).ok();
            execute!(out, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = paint(Stream::Stderr, &format!("[{}]", now()), Style::new().dimmed());
        let line = format!("{timestamp} {symbol} {message}");

        writeln!(out, "{line}").ok();
        out.flush().ok();

        self.last_lines = line_count(message);
    }

    /// Forget the previous block so the next message prints below it.
    pub fn detach(&mut self) {
        self.last_lines = 0;
    }
}

fn line_count(message: &str) -> usize {
    message.matches('\n').count() + 1
}

// ============================================================================
// Progress Line (single-line counters)
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[optimize] vpype(1/1) svgo(1/1) xml(7/12)`
///
/// Counters update in place. `inc` uses `try_lock` so Stage C workers never
/// block on the terminal; a skipped refresh is caught up by the next one.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
    lock: Mutex<()>,
    enabled: bool,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Create a new progress display. Only counters with total > 0 are shown.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        Self::with_enabled(module, items, true)
    }

    /// A progress line that tracks counts but never draws.
    pub fn hidden(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        Self::with_enabled(module, items, false)
    }

    fn with_enabled(module: &'static str, items: &[(&'static str, usize)], enabled: bool) -> Self {
        let counters: Vec<_> = items
            .iter()
            .filter(|(_, total)| *total > 0)
            .map(|(name, total)| Counter {
                name,
                total: *total,
                current: AtomicUsize::new(0),
            })
            .collect();

        if enabled {
            BAR_COUNT.store(1, Ordering::SeqCst);
        }

        let progress = Self {
            module,
            counters,
            lock: Mutex::new(()),
            enabled,
        };
        progress.display(false);
        progress
    }

    /// Increment the counter with the given name.
    #[inline]
    pub fn inc(&self, name: &str) {
        if let Some(counter) = self.counters.iter().find(|c| c.name == name) {
            counter.current.fetch_add(1, Ordering::Relaxed);
            if let Some(_guard) = self.lock.try_lock() {
                self.display(false);
            }
        }
    }

    fn render(&self) -> String {
        self.counters
            .iter()
            .map(|c| {
                format!(
                    "{}({}/{})",
                    c.name,
                    c.current.load(Ordering::Relaxed),
                    c.total
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn display(&self, newline: bool) {
        if !self.enabled || self.counters.is_empty() {
            return;
        }
        let prefix = colorize_prefix(self.module, self.module);
        let line = self.render();

        let mut out = stderr().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        if newline {
            writeln!(out, "{prefix} {line}").ok();
        } else {
            write!(out, "{prefix} {line}").ok();
        }
        out.flush().ok();
    }

    /// Finish progress display, keep the final line.
    pub fn finish(self) {
        if self.enabled {
            BAR_COUNT.store(0, Ordering::SeqCst);
            let _guard = self.lock.lock();
            self.display(true);
        }
        std::mem::forget(self);
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        if !self.enabled {
            return;
        }
        BAR_COUNT.store(0, Ordering::SeqCst);

        let mut out = stderr().lock();
        execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_format() {
        assert_eq!(clock(0), "00:00:00");
        assert_eq!(clock(3661), "01:01:01");
        assert_eq!(clock(86_399), "23:59:59");
        assert_eq!(clock(86_400), "00:00:00");
    }

    #[test]
    fn test_paint_honors_color_override() {
        owo_colors::set_override(false);
        let text = paint(Stream::Stdout, "saved", Style::new().green().bold());
        assert_eq!(text, "saved");
        assert_eq!(colorize_prefix("cache", "cache"), "[cache]");
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count("done"), 1);
        assert_eq!(line_count("vpype failed\nexit status: 1\nbad input"), 3);
    }

    #[test]
    fn test_progress_counts_without_drawing() {
        let progress = ProgressLine::hidden("optimize", &[("vpype", 1), ("svgo", 0), ("xml", 3)]);
        progress.inc("xml");
        progress.inc("xml");
        progress.inc("svgo"); // zero-total counters are not tracked
        assert_eq!(progress.render(), "vpype(0/1) xml(2/3)");
        progress.finish();
    }
}
