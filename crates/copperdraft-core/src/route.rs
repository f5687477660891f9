//! Two-point chamfered routing.
//!
//! Connects two points with axis-aligned runs joined by 45° chamfers, the
//! standard look for hand-routed copper.

use kurbo::Point;

use crate::geometry;

/// Segments shorter than this are discarded instead of committed.
pub const MIN_TRACE_LENGTH: f64 = 0.1;

const EPS: f64 = 1e-9;

/// Route from `a` to `b`.
///
/// Axis-aligned or exactly diagonal spans route as a single segment.
/// Otherwise the polyline is `[a, a + s·m/2, b − s·m/2, b]` where
/// `m = min(|dx|, |dy|)` and `s` is the per-axis sign of the delta: a 45°
/// chamfer out of `a`, a straight middle run, and a 45° chamfer into `b`.
pub fn chamfer_route(a: Point, b: Point) -> Vec<Point> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let m = dx.abs().min(dy.abs());

    let direct = m < EPS || (dx.abs() - dy.abs()).abs() < EPS;
    if direct {
        return vec![a, b];
    }

    let sx = dx.signum();
    let sy = dy.signum();
    let half = m / 2.0;
    vec![
        a,
        Point::new(a.x + sx * half, a.y + sy * half),
        Point::new(b.x - sx * half, b.y - sy * half),
        b,
    ]
}

/// A new trace may not start where an existing trace starts. Only start
/// points block; endpoints stay open for chaining.
pub fn start_blocked(elements: &[crate::element::Element], point: Point, trace_width: f64) -> bool {
    let tol = (trace_width / 2.0).max(0.1);
    elements.iter().any(|e| match e {
        crate::element::Element::Trace(t) => t.start().distance(point) <= tol,
        _ => false,
    })
}

/// Total length of the routed polyline.
pub fn route_length(points: &[Point]) -> f64 {
    geometry::polyline_length(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, Layer, Trace};

    fn assert_points(actual: &[Point], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len());
        for (p, &(x, y)) in actual.iter().zip(expected) {
            assert!(
                (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
                "got {p:?}, expected ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_horizontal_is_direct() {
        let pts = chamfer_route(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_points(&pts, &[(0.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn test_exact_diagonal_is_direct() {
        let pts = chamfer_route(Point::new(0.0, 0.0), Point::new(7.0, -7.0));
        assert_points(&pts, &[(0.0, 0.0), (7.0, -7.0)]);
    }

    #[test]
    fn test_chamfered_polyline() {
        let pts = chamfer_route(Point::new(0.0, 0.0), Point::new(10.0, 4.0));
        assert_points(&pts, &[(0.0, 0.0), (2.0, 2.0), (8.0, 2.0), (10.0, 4.0)]);
        // Middle run is parallel to the dominant axis
        assert!((pts[1].y - pts[2].y).abs() < 1e-9);
    }

    #[test]
    fn test_chamfer_negative_direction() {
        let pts = chamfer_route(Point::new(10.0, 4.0), Point::new(0.0, 0.0));
        assert_points(&pts, &[(10.0, 4.0), (8.0, 2.0), (2.0, 2.0), (0.0, 0.0)]);
    }

    #[test]
    fn test_chamfer_vertical_dominant() {
        let pts = chamfer_route(Point::new(0.0, 0.0), Point::new(4.0, 10.0));
        assert_points(&pts, &[(0.0, 0.0), (2.0, 2.0), (2.0, 8.0), (4.0, 10.0)]);
        assert!((pts[1].x - pts[2].x).abs() < 1e-9);
    }

    #[test]
    fn test_start_blocked_only_by_trace_starts() {
        let existing = Element::Trace(Trace::new(
            Layer::Top,
            0.3,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        ));
        let elements = vec![existing];
        assert!(start_blocked(&elements, Point::new(0.0, 0.0), 0.3));
        // The far endpoint stays open for chaining
        assert!(!start_blocked(&elements, Point::new(10.0, 0.0), 0.3));
    }
}
