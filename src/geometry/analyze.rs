//! Path irregularity detection.
//!
//! Segments are placed in absolute coordinates (cursor starts at the origin,
//! `Z` returns to the last moveto) and four independent checks run over them:
//! zero-length draws, collapsed bezier handles, sharp reversals and length
//! outliers. Findings are ordered by segment index.

use super::irregularity::{IrregularityKind, PathIrregularity, Thresholds};
use super::tokenize::{Segment, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[inline]
    fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point mirrored through `center`.
    #[inline]
    fn reflect(self, center: Self) -> Self {
        Self::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }
}

/// Control points of a curve segment, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Handles {
    None,
    Cubic { cp1: Point, cp2: Point },
    /// Smooth cubic: `cp1` is only known when the previous segment was cubic.
    Smooth { cp1: Option<Point>, cp2: Point },
    Quadratic { cp: Point },
}

/// A segment resolved against the running cursor.
#[derive(Debug, Clone)]
struct Placed {
    command: char,
    start: Point,
    end: Point,
    handles: Handles,
}

/// Analyze path data with default thresholds.
pub fn analyze_path(d: &str) -> Vec<PathIrregularity> {
    analyze_path_with(d, &Thresholds::default())
}

/// Analyze path data with explicit thresholds.
pub fn analyze_path_with(d: &str, thresholds: &Thresholds) -> Vec<PathIrregularity> {
    let placed = place(&tokenize(d));
    if placed.is_empty() {
        return Vec::new();
    }

    let mut findings = Vec::new();
    check_zero_length(&placed, thresholds, &mut findings);
    check_handles(&placed, thresholds, &mut findings);
    check_reversals(&placed, thresholds, &mut findings);
    check_length_jumps(&placed, thresholds, &mut findings);

    // Stable: checks keep their relative order within one segment
    findings.sort_by_key(|f| f.segment_index);
    findings
}

// ============================================================================
// Reconstruction
// ============================================================================

fn place(segments: &[Segment]) -> Vec<Placed> {
    let mut cursor = Point::ORIGIN;
    let mut subpath_start = Point::ORIGIN;
    let mut last_cubic_cp2: Option<Point> = None;
    let mut placed = Vec::with_capacity(segments.len());

    for seg in segments {
        let a = &seg.args;
        let base = if seg.is_relative() { cursor } else { Point::ORIGIN };
        let at = |i: usize| base.offset(a[i], a[i + 1]);

        let (end, handles) = match seg.kind() {
            'M' | 'L' | 'T' => (at(0), Handles::None),
            'H' => {
                let x = if seg.is_relative() { cursor.x + a[0] } else { a[0] };
                (Point::new(x, cursor.y), Handles::None)
            }
            'V' => {
                let y = if seg.is_relative() { cursor.y + a[0] } else { a[0] };
                (Point::new(cursor.x, y), Handles::None)
            }
            'C' => (
                at(4),
                Handles::Cubic {
                    cp1: at(0),
                    cp2: at(2),
                },
            ),
            'S' => (
                at(2),
                Handles::Smooth {
                    cp1: last_cubic_cp2.map(|cp| cp.reflect(cursor)),
                    cp2: at(0),
                },
            ),
            'Q' => (at(2), Handles::Quadratic { cp: at(0) }),
            'A' => (at(5), Handles::None),
            _ => (subpath_start, Handles::None), // Z
        };

        last_cubic_cp2 = match handles {
            Handles::Cubic { cp2, .. } | Handles::Smooth { cp2, .. } => Some(cp2),
            _ => None,
        };

        if seg.kind() == 'M' {
            subpath_start = end;
        }

        placed.push(Placed {
            command: seg.command,
            start: cursor,
            end,
            handles,
        });
        cursor = end;
    }

    placed
}

// ============================================================================
// Checks
// ============================================================================

fn check_zero_length(placed: &[Placed], t: &Thresholds, out: &mut Vec<PathIrregularity>) {
    for (i, seg) in placed.iter().enumerate() {
        if matches!(seg.command.to_ascii_uppercase(), 'M' | 'Z') {
            continue;
        }
        if seg.start.distance(seg.end) < t.zero_epsilon {
            out.push(PathIrregularity::new(
                IrregularityKind::ZeroLength,
                i,
                format!(
                    "segment #{i} ({}) has length ≈0 at ({:.2},{:.2})",
                    seg.command, seg.start.x, seg.start.y
                ),
            ));
        }
    }
}

fn check_handles(placed: &[Placed], t: &Thresholds, out: &mut Vec<PathIrregularity>) {
    for (i, seg) in placed.iter().enumerate() {
        let chord = seg.start.distance(seg.end);
        if chord <= t.min_chord {
            continue;
        }
        let collapsed = |d: f64| d / chord < t.handle_ratio;

        match seg.handles {
            Handles::Cubic { cp1, cp2 } => {
                let d1 = seg.start.distance(cp1);
                let d2 = seg.end.distance(cp2);
                if collapsed(d1) || collapsed(d2) {
                    out.push(PathIrregularity::new(
                        IrregularityKind::DegenerateBezier,
                        i,
                        format!(
                            "segment #{i} ({}) has control point(s) collapsed onto anchor \
                             (cp1_dist={d1:.3}, cp2_dist={d2:.3}, seg={chord:.3})",
                            seg.command
                        ),
                    ));
                }
            }
            Handles::Smooth { cp1, cp2 } => {
                let d2 = seg.end.distance(cp2);
                let d1 = cp1.map(|cp| seg.start.distance(cp));
                if collapsed(d2) || d1.is_some_and(collapsed) {
                    let d1_text = d1.map_or_else(|| "-".to_string(), |d| format!("{d:.3}"));
                    out.push(PathIrregularity::new(
                        IrregularityKind::DegenerateBezier,
                        i,
                        format!(
                            "segment #{i} ({}) has control point(s) collapsed onto anchor \
                             (cp1_dist={d1_text}, cp2_dist={d2:.3}, seg={chord:.3})",
                            seg.command
                        ),
                    ));
                }
            }
            Handles::Quadratic { cp } => {
                let dc = seg.start.distance(cp).min(seg.end.distance(cp));
                if collapsed(dc) {
                    out.push(PathIrregularity::new(
                        IrregularityKind::DegenerateBezier,
                        i,
                        format!(
                            "segment #{i} ({}) quadratic control point collapsed \
                             (cp_dist={dc:.3}, seg={chord:.3})",
                            seg.command
                        ),
                    ));
                }
            }
            Handles::None => {}
        }
    }
}

/// Displacement of each segment's endpoint from the previous endpoint.
fn endpoint_vectors(placed: &[Placed]) -> Vec<(f64, f64)> {
    let mut prev = Point::ORIGIN;
    placed
        .iter()
        .map(|seg| {
            let v = (seg.end.x - prev.x, seg.end.y - prev.y);
            prev = seg.end;
            v
        })
        .collect()
}

fn check_reversals(placed: &[Placed], t: &Thresholds, out: &mut Vec<PathIrregularity>) {
    let vectors = endpoint_vectors(placed);

    for i in 1..vectors.len() {
        let (a, b) = (vectors[i - 1], vectors[i]);
        let mag = a.0.hypot(a.1) * b.0.hypot(b.1);
        if mag < 1e-9 {
            continue;
        }
        let cos = ((a.0 * b.0 + a.1 * b.1) / mag).clamp(-1.0, 1.0);
        let angle = cos.acos().to_degrees();
        if angle >= t.reversal_degrees {
            out.push(PathIrregularity::new(
                IrregularityKind::DirectionReversal,
                i,
                format!(
                    "segment #{i} ({}) reverses direction by {angle:.1}° relative to previous segment",
                    placed[i].command
                ),
            ));
        }
    }
}

fn check_length_jumps(placed: &[Placed], t: &Thresholds, out: &mut Vec<PathIrregularity>) {
    let lengths: Vec<f64> = endpoint_vectors(placed)
        .iter()
        .map(|(dx, dy)| dx.hypot(*dy))
        .collect();

    for i in 1..lengths.len().saturating_sub(1) {
        let (before, after) = (lengths[i - 1], lengths[i + 1]);
        if before < t.zero_epsilon || after < t.zero_epsilon {
            continue;
        }
        let average = (before + after) / 2.0;
        let ratio = lengths[i] / average;
        if ratio > t.length_jump_ratio {
            out.push(PathIrregularity::new(
                IrregularityKind::LengthJump,
                i,
                format!(
                    "segment #{i} ({}) is {ratio:.1}x longer than its neighbors (len={:.2})",
                    placed[i].command, lengths[i]
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(d: &str) -> Vec<(IrregularityKind, usize)> {
        analyze_path(d)
            .into_iter()
            .map(|f| (f.kind, f.segment_index))
            .collect()
    }

    #[test]
    fn test_clean_square() {
        assert!(analyze_path("M0,0 L10,0 L10,10 L0,10 Z").is_empty());
    }

    #[test]
    fn test_zero_length_line() {
        assert_eq!(kinds("M0,0 L0,0"), vec![(IrregularityKind::ZeroLength, 1)]);
    }

    #[test]
    fn test_zero_length_relative() {
        assert_eq!(
            kinds("M5,5 l0,0"),
            vec![(IrregularityKind::ZeroLength, 1)]
        );
        let finding = &analyze_path("M5,5 l0,0")[0];
        assert_eq!(finding.detail, "segment #1 (l) has length ≈0 at (5.00,5.00)");
    }

    #[test]
    fn test_moveto_and_close_never_zero_length() {
        // Z back onto the start point and a moveto to the cursor are fine
        assert!(kinds("M0,0 M0,0").is_empty());
        assert!(
            !kinds("M0,0 L10,0 L10,10 L0,0 Z")
                .iter()
                .any(|(k, _)| *k == IrregularityKind::ZeroLength)
        );
    }

    #[test]
    fn test_full_reversal() {
        let findings = analyze_path("M0,0 L10,0 L0,0");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IrregularityKind::DirectionReversal);
        assert_eq!(findings[0].segment_index, 2);
        assert!(findings[0].detail.contains("180.0°"));
    }

    #[test]
    fn test_right_angle_is_not_reversal() {
        assert!(analyze_path("M0,0 L10,0 L10,10").is_empty());
    }

    #[test]
    fn test_degenerate_cubic_handle() {
        // cp1 sits on the start anchor
        let findings = kinds("M0,0 C0,0 5,10 10,0");
        assert_eq!(findings, vec![(IrregularityKind::DegenerateBezier, 1)]);
    }

    #[test]
    fn test_healthy_cubic() {
        assert!(kinds("M0,0 C3,5 7,5 10,0").is_empty());
    }

    #[test]
    fn test_relative_cubic_handles() {
        // cp2 = end anchor after resolving against the cursor
        assert_eq!(
            kinds("M10,10 c3,5 10,0 10,0"),
            vec![(IrregularityKind::DegenerateBezier, 1)]
        );
    }

    #[test]
    fn test_smooth_cubic_reflected_handle() {
        // Previous cp2 == end anchor (10,0), so the reflected cp1 is on the start
        assert_eq!(
            kinds("M0,0 C3,5 10,0 10,0 S17,5 20,0"),
            vec![
                (IrregularityKind::DegenerateBezier, 1),
                (IrregularityKind::DegenerateBezier, 2),
            ]
        );
    }

    #[test]
    fn test_smooth_cubic_without_previous_cubic() {
        // No reflected handle to check; explicit cp2 is healthy
        assert!(
            !kinds("M0,0 L0,0.5 S7,5 10,0")
                .iter()
                .any(|(k, _)| *k == IrregularityKind::DegenerateBezier)
        );
    }

    #[test]
    fn test_degenerate_quadratic_near_end_anchor() {
        assert_eq!(
            kinds("M0,0 Q10,0.01 10,0"),
            vec![(IrregularityKind::DegenerateBezier, 1)]
        );
        assert!(kinds("M0,0 Q5,5 10,0").is_empty());
    }

    #[test]
    fn test_short_chord_skips_handle_check() {
        assert!(
            !kinds("M0,0 C0,0 0,0 0.0005,0")
                .iter()
                .any(|(k, _)| *k == IrregularityKind::DegenerateBezier)
        );
    }

    #[test]
    fn test_length_jump() {
        let findings = kinds("M0,0 L1,0 L1,100 L2,100");
        assert!(findings.contains(&(IrregularityKind::LengthJump, 2)));
    }

    #[test]
    fn test_length_jump_needs_nonzero_neighbors() {
        // Neighbor before is the moveto from the origin with length 0
        assert!(
            !kinds("M0,0 L100,0 L101,0")
                .iter()
                .any(|(k, _)| *k == IrregularityKind::LengthJump)
        );
    }

    #[test]
    fn test_arc_and_smooth_quadratic_not_checked_for_handles() {
        assert!(
            !kinds("M0,0 A5,5 0 0 1 10,0 T20,0")
                .iter()
                .any(|(k, _)| *k == IrregularityKind::DegenerateBezier)
        );
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        // After Z the cursor is (10,10); l0,0 is zero-length there
        let findings = analyze_path("M0,0 L20,0 M10,10 L20,10 Z l0,0");
        let zero = findings
            .iter()
            .find(|f| f.kind == IrregularityKind::ZeroLength)
            .unwrap();
        assert_eq!(zero.segment_index, 5);
        assert!(zero.detail.ends_with("(10.00,10.00)"));
    }

    #[test]
    fn test_output_ordered_by_segment() {
        let findings = analyze_path("M0,0 L10,0 L0,0 L0,0 C0,0 5,5 10,0");
        let indices: Vec<_> = findings.iter().map(|f| f.segment_index).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_deterministic() {
        let d = "M0,0 C0,0 5,10 10,0 L0,0 L0,0 l50,50 z";
        assert_eq!(analyze_path(d), analyze_path(d));
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(analyze_path("").is_empty());
        assert!(analyze_path("not a path").is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let t = Thresholds {
            reversal_degrees: 80.0,
            ..Thresholds::default()
        };
        let findings = analyze_path_with("M0,0 L10,0 L10,10", &t);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, IrregularityKind::DirectionReversal);
    }
}
