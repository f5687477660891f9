//! Design rule checks.
//!
//! Five rule classes over the full element collection, re-run after every
//! committed mutation or rule edit. All results are advisory except the
//! via↔via clearance, which also backs two hard guards in the editor.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, Trace};
use crate::geometry;

/// User-editable clearance and width rules, in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub min_trace_width: f64,
    pub min_clearance_trace_trace: f64,
    pub clearance_pad_trace: f64,
    pub clearance_via_via: f64,
    pub clearance_footprint: f64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            min_trace_width: 0.15,
            min_clearance_trace_trace: 0.15,
            clearance_pad_trace: 0.2,
            clearance_via_via: 0.3,
            clearance_footprint: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    TraceWidth,
    TraceClearance,
    PadClearance,
    ViaClearance,
    FootprintOverlap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: RuleKind,
    /// The offending elements, one or two ids.
    pub elements: Vec<ElementId>,
    pub message: String,
}

/// Run every rule class. Not incremental: the full collection is checked
/// each time.
pub fn check_rules(elements: &[Element], rules: &RuleSet) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_trace_widths(elements, rules, &mut violations);
    check_trace_clearance(elements, rules, &mut violations);
    check_pad_trace_clearance(elements, rules, &mut violations);
    check_via_clearance(elements, rules, &mut violations);
    check_footprint_overlap(elements, rules, &mut violations);
    violations
}

fn traces(elements: &[Element]) -> impl Iterator<Item = &Trace> {
    elements.iter().filter_map(|e| match e {
        Element::Trace(t) => Some(t),
        _ => None,
    })
}

fn check_trace_widths(elements: &[Element], rules: &RuleSet, out: &mut Vec<Violation>) {
    for trace in traces(elements) {
        if trace.width < rules.min_trace_width {
            out.push(Violation {
                kind: RuleKind::TraceWidth,
                elements: vec![trace.id],
                message: format!(
                    "Trace width {:.2}mm below minimum {:.2}mm",
                    trace.width, rules.min_trace_width
                ),
            });
        }
    }
}

/// Edge-to-edge gap between two polylines: minimum centerline distance
/// over all segment pairs, minus both half widths.
fn trace_gap(a: &Trace, b: &Trace) -> f64 {
    let mut min_dist = f64::INFINITY;
    for (a1, a2) in a.segments() {
        for (b1, b2) in b.segments() {
            min_dist = min_dist.min(geometry::segment_segment_distance(a1, a2, b1, b2));
        }
    }
    min_dist - a.width / 2.0 - b.width / 2.0
}

fn check_trace_clearance(elements: &[Element], rules: &RuleSet, out: &mut Vec<Violation>) {
    let all: Vec<&Trace> = traces(elements).collect();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            let gap = trace_gap(a, b);
            if gap < rules.min_clearance_trace_trace {
                out.push(Violation {
                    kind: RuleKind::TraceClearance,
                    elements: vec![a.id, b.id],
                    message: format!(
                        "Trace clearance {:.2}mm below minimum {:.2}mm",
                        gap.max(0.0),
                        rules.min_clearance_trace_trace
                    ),
                });
            }
        }
    }
}

/// Copper landing shapes that traces must keep clear of.
enum CopperShape {
    Circle { center: Point, radius: f64 },
    Rect(Rect),
}

impl CopperShape {
    fn gap_to_segment(&self, a: Point, b: Point) -> f64 {
        match self {
            CopperShape::Circle { center, radius } => {
                geometry::point_segment_distance(*center, a, b) - radius
            }
            CopperShape::Rect(rect) => geometry::segment_rect_distance(a, b, *rect),
        }
    }
}

fn copper_shapes(elements: &[Element]) -> Vec<(ElementId, CopperShape)> {
    let mut shapes = Vec::new();
    for element in elements {
        match element {
            Element::Pad(p) => shapes.push((
                p.id,
                CopperShape::Circle {
                    center: p.position,
                    radius: p.diameter / 2.0,
                },
            )),
            Element::Via(v) => shapes.push((
                v.id,
                CopperShape::Circle {
                    center: v.position,
                    radius: v.diameter / 2.0,
                },
            )),
            Element::Component(c) => {
                for i in 0..c.pads.len() {
                    shapes.push((c.id, CopperShape::Rect(c.pad_bounds(i))));
                }
            }
            _ => {}
        }
    }
    shapes
}

fn check_pad_trace_clearance(elements: &[Element], rules: &RuleSet, out: &mut Vec<Violation>) {
    let shapes = copper_shapes(elements);
    for trace in traces(elements) {
        for (owner, shape) in &shapes {
            let gap = trace
                .segments()
                .map(|(a, b)| shape.gap_to_segment(a, b))
                .fold(f64::INFINITY, f64::min)
                - trace.width / 2.0;
            if gap < rules.clearance_pad_trace {
                out.push(Violation {
                    kind: RuleKind::PadClearance,
                    elements: vec![*owner, trace.id],
                    message: format!(
                        "Pad-to-trace clearance {:.2}mm below minimum {:.2}mm",
                        gap.max(0.0),
                        rules.clearance_pad_trace
                    ),
                });
            }
        }
    }
}

fn check_via_clearance(elements: &[Element], rules: &RuleSet, out: &mut Vec<Violation>) {
    let vias: Vec<_> = elements
        .iter()
        .filter_map(|e| match e {
            Element::Via(v) => Some(v),
            _ => None,
        })
        .collect();
    for (i, a) in vias.iter().enumerate() {
        for b in &vias[i + 1..] {
            let gap = a.position.distance(b.position) - a.diameter / 2.0 - b.diameter / 2.0;
            if gap < rules.clearance_via_via {
                out.push(Violation {
                    kind: RuleKind::ViaClearance,
                    elements: vec![a.id, b.id],
                    message: format!(
                        "Via clearance {:.2}mm below minimum {:.2}mm",
                        gap.max(0.0),
                        rules.clearance_via_via
                    ),
                });
            }
        }
    }
}

fn check_footprint_overlap(elements: &[Element], rules: &RuleSet, out: &mut Vec<Violation>) {
    let comps: Vec<_> = elements
        .iter()
        .filter_map(|e| match e {
            Element::Component(c) => Some(c),
            _ => None,
        })
        .collect();
    let c = rules.clearance_footprint;
    for (i, a) in comps.iter().enumerate() {
        for b in &comps[i + 1..] {
            if geometry::rects_overlap(a.bounds().inflate(c, c), b.bounds().inflate(c, c)) {
                out.push(Violation {
                    kind: RuleKind::FootprintOverlap,
                    elements: vec![a.id, b.id],
                    message: format!(
                        "Footprints {} and {} closer than {:.2}mm",
                        a.footprint, b.footprint, c
                    ),
                });
            }
        }
    }
}

/// Hard guard: would a via of `diameter` at `position` keep the via↔via
/// clearance against every existing via? `ignore` excludes the via being
/// moved from the check.
pub fn via_placement_ok(
    elements: &[Element],
    position: Point,
    diameter: f64,
    rules: &RuleSet,
    ignore: Option<ElementId>,
) -> bool {
    elements.iter().all(|e| match e {
        Element::Via(v) if Some(v.id) != ignore => {
            v.position.distance(position) - v.diameter / 2.0 - diameter / 2.0
                >= rules.clearance_via_via
        }
        _ => true,
    })
}
