//! Irregularity vocabulary and detection thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a suspicious path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IrregularityKind {
    /// A drawing segment whose start and end coincide.
    ZeroLength,
    /// A bezier whose control handle sits on its anchor.
    DegenerateBezier,
    /// A segment that doubles back on the previous one.
    DirectionReversal,
    /// A segment far longer than both neighbors.
    LengthJump,
}

impl IrregularityKind {
    pub const ALL: [Self; 4] = [
        Self::ZeroLength,
        Self::DegenerateBezier,
        Self::DirectionReversal,
        Self::LengthJump,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ZeroLength => "zero-length",
            Self::DegenerateBezier => "degenerate-bezier",
            Self::DirectionReversal => "direction-reversal",
            Self::LengthJump => "length-jump",
        }
    }
}

impl fmt::Display for IrregularityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding on one segment of a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathIrregularity {
    pub kind: IrregularityKind,
    pub detail: String,
    pub segment_index: usize,
}

impl PathIrregularity {
    pub fn new(kind: IrregularityKind, segment_index: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            segment_index,
        }
    }
}

/// Numeric thresholds used by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Lengths below this are treated as zero.
    pub zero_epsilon: f64,
    /// Chords at or below this are too short for handle checks.
    pub min_chord: f64,
    /// Handle-to-anchor distance as a fraction of the chord.
    pub handle_ratio: f64,
    /// Turn angle (degrees) from which a segment counts as reversing.
    pub reversal_degrees: f64,
    /// Length relative to the neighbor average that counts as a jump.
    pub length_jump_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            zero_epsilon: 1e-6,
            min_chord: 1e-3,
            handle_ratio: 0.01,
            reversal_degrees: 150.0,
            length_jump_ratio: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<_> = IrregularityKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            ["zero-length", "degenerate-bezier", "direction-reversal", "length-jump"]
        );
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&IrregularityKind::DegenerateBezier).unwrap();
        assert_eq!(json, "\"degenerate-bezier\"");
    }
}
