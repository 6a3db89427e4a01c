//! Human-readable formatting for sizes, durations and counts.

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization (`"1 file"`, `"3 files"`).
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

/// Size in kibibytes with one decimal: `2048` -> `"2.0K"`.
#[allow(clippy::cast_precision_loss)]
pub fn fmt_kb(bytes: u64) -> String {
    format!("{:.1}K", bytes as f64 / 1024.0)
}

/// Elapsed time: `"340ms"`, `"2.5s"` or `"3m 07s"`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fmt_time(secs: f64) -> String {
    if secs < 1.0 {
        format!("{}ms", (secs * 1000.0) as u64)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let whole = secs as u64;
        format!("{}m {:02}s", whole / 60, whole % 60)
    }
}

/// Savings column: `"-"` when nothing was saved, raw bytes below 100B,
/// otherwise kibibytes plus percentage of the original.
#[allow(clippy::cast_precision_loss)]
pub fn fmt_savings(saved: u64, original: u64) -> String {
    if saved == 0 {
        return "-".to_string();
    }
    if saved < 102 {
        return format!("{saved}B");
    }
    let pct = if original == 0 {
        0.0
    } else {
        saved as f64 / original as f64 * 100.0
    };
    format!("{} ({pct:.1}%)", fmt_kb(saved))
}
