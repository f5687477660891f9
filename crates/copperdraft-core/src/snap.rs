//! Cursor snapping with strict priority: element centers, then trace
//! points, then angle quantization, then plain grid.

use kurbo::Point;

use crate::element::{Element, ElementId};
use crate::geometry;

/// What a snap resolved to, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    PadCenter,
    TracePoint,
    Angle,
    Grid,
    None,
}

/// The element a snapped point belongs to, with its net for inheritance.
/// For component pads the element is the owning component.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapSource {
    pub element: ElementId,
    pub net: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub point: Point,
    pub kind: SnapKind,
    pub source: Option<SnapSource>,
}

impl SnapResult {
    fn raw(point: Point) -> Self {
        Self {
            point,
            kind: SnapKind::None,
            source: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    pub elements: &'a [Element],
    pub grid_size: f64,
    pub grid_enabled: bool,
    /// Capture radius in world units.
    pub tolerance: f64,
    /// Start point while drawing a trace; enables angle quantization.
    pub anchor: Option<Point>,
    /// Element drag in progress: grid is the only active rule.
    pub dragging: bool,
}

/// Resolve `cursor` against the snap priority list. The first matching
/// rule wins; later rules never override an earlier match.
pub fn resolve(cursor: Point, ctx: &SnapContext) -> SnapResult {
    if ctx.dragging {
        return grid_fallback(cursor, ctx);
    }

    if let Some(hit) = nearest_center(cursor, ctx) {
        return hit;
    }
    if let Some(hit) = nearest_trace_point(cursor, ctx) {
        return hit;
    }
    if let Some(anchor) = ctx.anchor {
        if let Some(hit) = angle_quantize(cursor, anchor, ctx) {
            return hit;
        }
    }
    grid_fallback(cursor, ctx)
}

/// Rule 1: nearest pad, via, or component-pad center within tolerance.
fn nearest_center(cursor: Point, ctx: &SnapContext) -> Option<SnapResult> {
    let mut best: Option<(f64, Point, SnapSource)> = None;
    let mut consider = |dist: f64, point: Point, source: SnapSource| {
        if dist <= ctx.tolerance && best.as_ref().map_or(true, |(d, _, _)| dist < *d) {
            best = Some((dist, point, source));
        }
    };

    for element in ctx.elements {
        match element {
            Element::Pad(p) => consider(
                cursor.distance(p.position),
                p.position,
                SnapSource {
                    element: p.id,
                    net: p.net.clone(),
                },
            ),
            Element::Via(v) => consider(
                cursor.distance(v.position),
                v.position,
                SnapSource {
                    element: v.id,
                    net: v.net.clone(),
                },
            ),
            Element::Component(c) => {
                for i in 0..c.pads.len() {
                    let center = c.pad_center(i);
                    consider(
                        cursor.distance(center),
                        center,
                        SnapSource {
                            element: c.id,
                            net: c.pads[i].net.clone(),
                        },
                    );
                }
            }
            _ => {}
        }
    }

    best.map(|(_, point, source)| SnapResult {
        point,
        kind: SnapKind::PadCenter,
        source: Some(source),
    })
}

/// Rule 2: nearest trace vertex or segment midpoint within tolerance.
fn nearest_trace_point(cursor: Point, ctx: &SnapContext) -> Option<SnapResult> {
    let mut best: Option<(f64, Point, SnapSource)> = None;
    for element in ctx.elements {
        let trace = match element {
            Element::Trace(t) => t,
            _ => continue,
        };
        let candidates = trace
            .points
            .iter()
            .copied()
            .chain(trace.segments().map(|(a, b)| a.midpoint(b)));
        for candidate in candidates {
            let dist = cursor.distance(candidate);
            if dist <= ctx.tolerance && best.as_ref().map_or(true, |(d, _, _)| dist < *d) {
                best = Some((
                    dist,
                    candidate,
                    SnapSource {
                        element: trace.id,
                        net: trace.net.clone(),
                    },
                ));
            }
        }
    }
    best.map(|(_, point, source)| SnapResult {
        point,
        kind: SnapKind::TracePoint,
        source: Some(source),
    })
}

/// Rule 3: quantize the anchor→cursor direction to the nearest 45°,
/// preserving the radius, then re-snap the result to the grid when grid
/// snapping is on. Like the other rules it only captures within
/// tolerance; a cursor far off any 45° ray falls through to the grid.
fn angle_quantize(cursor: Point, anchor: Point, ctx: &SnapContext) -> Option<SnapResult> {
    let delta = cursor - anchor;
    let radius = delta.hypot();
    if radius < f64::EPSILON {
        return None;
    }
    let step = std::f64::consts::FRAC_PI_4;
    let angle = (delta.y.atan2(delta.x) / step).round() * step;
    let mut point = Point::new(
        anchor.x + radius * angle.cos(),
        anchor.y + radius * angle.sin(),
    );
    if cursor.distance(point) > ctx.tolerance {
        return None;
    }
    if ctx.grid_enabled {
        point = geometry::snap_point_to_grid(point, ctx.grid_size);
    }
    Some(SnapResult {
        point,
        kind: SnapKind::Angle,
        source: None,
    })
}

/// Rule 4: plain grid snap, or the raw cursor when grid snapping is off.
fn grid_fallback(cursor: Point, ctx: &SnapContext) -> SnapResult {
    if ctx.grid_enabled {
        SnapResult {
            point: geometry::snap_point_to_grid(cursor, ctx.grid_size),
            kind: SnapKind::Grid,
            source: None,
        }
    } else {
        SnapResult::raw(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Layer, Pad, Trace};

    fn ctx<'a>(elements: &'a [Element]) -> SnapContext<'a> {
        SnapContext {
            elements,
            grid_size: 1.0,
            grid_enabled: true,
            tolerance: 0.5,
            anchor: None,
            dragging: false,
        }
    }

    #[test]
    fn test_pad_center_beats_grid() {
        let mut pad = Pad::new(Layer::Top, Point::new(5.3, 5.3), 1.5);
        pad.net = Some("VCC".into());
        let elements = vec![Element::Pad(pad)];
        // Cursor near the pad but nearer to grid point (5, 5)
        let result = resolve(Point::new(5.1, 5.1), &ctx(&elements));
        assert_eq!(result.kind, SnapKind::PadCenter);
        assert_eq!(result.point, Point::new(5.3, 5.3));
        assert_eq!(result.source.unwrap().net.as_deref(), Some("VCC"));
    }

    #[test]
    fn test_trace_point_snap_includes_midpoints() {
        let elements = vec![Element::Trace(Trace::new(
            Layer::Top,
            0.3,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        ))];
        let result = resolve(Point::new(5.2, 0.3), &ctx(&elements));
        assert_eq!(result.kind, SnapKind::TracePoint);
        assert_eq!(result.point, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_angle_quantization_with_anchor() {
        let elements = Vec::new();
        let mut c = ctx(&elements);
        c.anchor = Some(Point::ZERO);
        c.grid_enabled = false;
        c.tolerance = 1.0;
        // 43° off horizontal quantizes to 45° (within tolerance)
        let r = 10.0;
        let cursor = Point::new(r * 43f64.to_radians().cos(), r * 43f64.to_radians().sin());
        let result = resolve(cursor, &c);
        assert_eq!(result.kind, SnapKind::Angle);
        assert!((result.point.x - result.point.y).abs() < 1e-9);
        assert!((result.point.to_vec2().hypot() - r).abs() < 1e-9);
    }

    #[test]
    fn test_angle_skipped_when_far_from_diagonal() {
        let elements = Vec::new();
        let mut c = ctx(&elements);
        c.anchor = Some(Point::ZERO);
        c.tolerance = 0.5;
        let result = resolve(Point::new(10.2, 4.1), &c);
        assert_eq!(result.kind, SnapKind::Grid);
        assert_eq!(result.point, Point::new(10.0, 4.0));
    }

    #[test]
    fn test_grid_fallback_when_nothing_near() {
        let elements = Vec::new();
        let result = resolve(Point::new(2.4, 7.6), &ctx(&elements));
        assert_eq!(result.kind, SnapKind::Grid);
        assert_eq!(result.point, Point::new(2.0, 8.0));
        assert!(result.source.is_none());
    }

    #[test]
    fn test_dragging_uses_grid_only() {
        let elements = vec![Element::Pad(Pad::new(Layer::Top, Point::new(5.3, 5.3), 1.5))];
        let mut c = ctx(&elements);
        c.dragging = true;
        let result = resolve(Point::new(5.2, 5.2), &c);
        assert_eq!(result.kind, SnapKind::Grid);
        assert_eq!(result.point, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_snap_disabled_returns_raw_cursor() {
        let elements = Vec::new();
        let mut c = ctx(&elements);
        c.grid_enabled = false;
        let cursor = Point::new(2.37, 7.61);
        let result = resolve(cursor, &c);
        assert_eq!(result.kind, SnapKind::None);
        assert_eq!(result.point, cursor);
    }
}
