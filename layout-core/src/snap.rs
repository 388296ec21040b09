//! Alignment snapping of a dragged layer against its siblings.
//!
//! Each axis is handled independently. On the x axis the dragged box's
//! left, right and centre are compared with every target's left, right
//! and centre (left-left, left-right, right-left, right-right,
//! centre-centre); the y axis does the same with top, bottom and centre.
//! Every comparison closer than [`SNAP_THRESHOLD`] produces a guide line;
//! one of them per axis moves the candidate so the two edges coincide.

use serde::{Deserialize, Serialize};

use crate::{Bounds, LayerId, Point};

/// Maximum distance (document pixels, exclusive) at which edges snap together.
pub const SNAP_THRESHOLD: f32 = 5.0;

/// Extra length added to both ends of a guide line.
pub const GUIDE_PADDING: f32 = 10.0;

/// A fixed sibling box to snap against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapTarget {
    /// Layer the box belongs to.
    pub id: LayerId,
    /// Bounding box at the time the drag started.
    pub bounds: Bounds,
}

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A vertical line at a fixed x, marking an x-axis snap.
    Vertical,
    /// A horizontal line at a fixed y, marking a y-axis snap.
    Horizontal,
}

/// A transient alignment indicator shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    /// Line direction.
    pub orientation: GuideOrientation,
    /// Fixed coordinate of the line (x for vertical, y for horizontal).
    pub position: f32,
    /// Start along the line's own axis.
    pub start: f32,
    /// End along the line's own axis.
    pub end: f32,
}

/// How to choose between several matching comparisons on one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// The last match in evaluation order wins.
    #[default]
    LastMatch,
    /// The match with the smallest distance wins; earlier matches win ties.
    Nearest,
}

/// Outcome of snapping one candidate position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Final top-left position, snapped on zero, one or both axes.
    pub position: Point,
    /// Guides for every comparison inside the threshold.
    pub guides: Vec<GuideLine>,
    /// Whether the x coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the y coordinate was snapped.
    pub snapped_y: bool,
}

/// The three alignment lines of a box along one axis.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f32,
    end: f32,
    center: f32,
}

impl Span {
    fn horizontal(b: &Bounds) -> Self {
        Self {
            start: b.left(),
            end: b.right(),
            center: b.center_x(),
        }
    }

    fn vertical(b: &Bounds) -> Self {
        Self {
            start: b.top(),
            end: b.bottom(),
            center: b.center_y(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisMatch {
    /// Snapped top-left coordinate on this axis.
    value: f32,
    /// Coordinate where the edges coincide (guide position).
    line: f32,
    distance: f32,
    target: usize,
}

/// Snap a candidate box against the targets.
///
/// Every comparison inside the threshold produces a guide (identical
/// guides are reported once); the policy picks the single snapped value
/// per axis. With no targets, or no comparison inside the threshold, the
/// candidate position is returned unchanged and no guides are produced.
#[must_use]
pub fn snap(candidate: Bounds, targets: &[SnapTarget], policy: SnapPolicy) -> SnapResult {
    let x_matches = axis_matches(
        Span::horizontal(&candidate),
        candidate.size.width,
        targets.iter().map(|t| Span::horizontal(&t.bounds)),
    );
    let y_matches = axis_matches(
        Span::vertical(&candidate),
        candidate.size.height,
        targets.iter().map(|t| Span::vertical(&t.bounds)),
    );
    let x = choose(&x_matches, policy);
    let y = choose(&y_matches, policy);

    let mut result = SnapResult {
        position: candidate.origin,
        guides: Vec::new(),
        snapped_x: x.is_some(),
        snapped_y: y.is_some(),
    };
    if let Some(m) = x {
        result.position.x = m.value;
    }
    if let Some(m) = y {
        result.position.y = m.value;
    }

    let own_vertical = Span::vertical(&candidate);
    for m in &x_matches {
        let other = Span::vertical(&targets[m.target].bounds);
        push_guide(
            &mut result.guides,
            GuideOrientation::Vertical,
            m.line,
            own_vertical,
            other,
        );
    }
    let own_horizontal = Span::horizontal(&candidate);
    for m in &y_matches {
        let other = Span::horizontal(&targets[m.target].bounds);
        push_guide(
            &mut result.guides,
            GuideOrientation::Horizontal,
            m.line,
            own_horizontal,
            other,
        );
    }

    if result.snapped_x || result.snapped_y {
        tracing::trace!(
            x = result.position.x,
            y = result.position.y,
            guides = result.guides.len(),
            "Snapped drag candidate"
        );
    }
    result
}

fn push_guide(
    guides: &mut Vec<GuideLine>,
    orientation: GuideOrientation,
    position: f32,
    own: Span,
    other: Span,
) {
    let guide = GuideLine {
        orientation,
        position,
        start: own.start.min(other.start) - GUIDE_PADDING,
        end: own.end.max(other.end) + GUIDE_PADDING,
    };
    if !guides.contains(&guide) {
        guides.push(guide);
    }
}

/// All comparisons inside the threshold, in evaluation order.
fn axis_matches(own: Span, extent: f32, targets: impl Iterator<Item = Span>) -> Vec<AxisMatch> {
    let mut matches = Vec::new();

    for (index, other) in targets.enumerate() {
        // (own edge, target edge, resulting top-left coordinate)
        let comparisons = [
            (own.start, other.start, other.start),
            (own.start, other.end, other.end),
            (own.end, other.start, other.start - extent),
            (own.end, other.end, other.end - extent),
            (own.center, other.center, other.center - extent / 2.0),
        ];

        for (edge, line, value) in comparisons {
            let distance = (edge - line).abs();
            if distance.is_nan() || distance >= SNAP_THRESHOLD {
                continue;
            }
            matches.push(AxisMatch {
                value,
                line,
                distance,
                target: index,
            });
        }
    }

    matches
}

fn choose(matches: &[AxisMatch], policy: SnapPolicy) -> Option<AxisMatch> {
    match policy {
        SnapPolicy::LastMatch => matches.last().copied(),
        SnapPolicy::Nearest => matches
            .iter()
            .copied()
            .reduce(|best, m| if m.distance < best.distance { m } else { best }),
    }
}
