//! Shared geometric math for the board editor.
//!
//! All distances are in world units (millimeters).

use kurbo::{Point, Rect, Vec2};

/// Snap a scalar to the nearest grid multiple.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Snap a point to the nearest grid intersection.
pub fn snap_point_to_grid(point: Point, grid: f64) -> Point {
    Point::new(snap_to_grid(point.x, grid), snap_to_grid(point.y, grid))
}

/// Distance from a point to a line segment (a→b).
pub fn point_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_polyline_distance(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_segment_distance(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| ((w[1].x - w[0].x).powi(2) + (w[1].y - w[0].y).powi(2)).sqrt())
        .sum()
}

/// Test if two line segments (a-b) and (c-d) intersect.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross = |o: Point, p: Point, q: Point| -> f64 {
        (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x)
    };
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear cases: endpoint lies on the other segment
    let on_segment = |p: Point, q: Point, r: Point| -> bool {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1.abs() < 1e-10 && on_segment(c, d, a))
        || (d2.abs() < 1e-10 && on_segment(c, d, b))
        || (d3.abs() < 1e-10 && on_segment(a, b, c))
        || (d4.abs() < 1e-10 && on_segment(a, b, d))
}

/// Minimum distance between two line segments.
///
/// Zero when the segments cross; otherwise the smallest of the four
/// endpoint-to-opposite-segment distances.
pub fn segment_segment_distance(a1: Point, a2: Point, b1: Point, b2: Point) -> f64 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }
    point_segment_distance(a1, b1, b2)
        .min(point_segment_distance(a2, b1, b2))
        .min(point_segment_distance(b1, a1, a2))
        .min(point_segment_distance(b2, a1, a2))
}

/// Minimum distance from a line segment to an axis-aligned rectangle.
///
/// Zero when the segment touches or enters the rectangle.
pub fn segment_rect_distance(a: Point, b: Point, rect: Rect) -> f64 {
    if rect.contains(a) || rect.contains(b) {
        return 0.0;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    let mut best = f64::INFINITY;
    for &(c, d) in &edges {
        let dist = segment_segment_distance(a, b, c, d);
        if dist == 0.0 {
            return 0.0;
        }
        best = best.min(dist);
    }
    best
}

/// Test if two axis-aligned rectangles overlap (shared edge counts).
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Axis-aligned bounding box of a rectangle of the given size centered at
/// `center` and rotated by `rotation_deg`.
pub fn rotated_rect_bounds(center: Point, width: f64, height: f64, rotation_deg: f64) -> Rect {
    let rad = rotation_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let half_w = (width * cos).abs() / 2.0 + (height * sin).abs() / 2.0;
    let half_h = (width * sin).abs() / 2.0 + (height * cos).abs() / 2.0;
    Rect::new(
        center.x - half_w,
        center.y - half_h,
        center.x + half_w,
        center.y + half_h,
    )
}

/// Rotate an offset vector by `rotation_deg` around the origin.
pub fn rotate_offset(offset: Vec2, rotation_deg: f64) -> Vec2 {
    let rad = rotation_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_snap_rounding() {
        assert_eq!(snap_to_grid(2.37, 1.0), 2.0);
        assert_eq!(snap_to_grid(2.6, 1.0), 3.0);
        assert_eq!(snap_to_grid(-0.6, 0.5), -0.5);
    }

    #[test]
    fn test_grid_snap_idempotent() {
        for &v in &[0.0, 2.37, 2.6, -13.91, 100.049] {
            for &g in &[0.1, 0.5, 1.0, 2.54] {
                let once = snap_to_grid(v, g);
                assert_eq!(snap_to_grid(once, g), once);
            }
        }
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_segment_distance(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        // Beyond the endpoint the distance is to the endpoint itself
        assert!((point_segment_distance(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Point::new(3.0, 4.0);
        let a = Point::new(0.0, 0.0);
        assert!((point_segment_distance(p, a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_segment_parallel() {
        let d = segment_segment_distance(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.4),
            Point::new(10.0, 0.4),
        );
        assert!((d - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_segment_segment_crossing() {
        let d = segment_segment_distance(
            Point::new(-1.0, -1.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, 1.0),
            Point::new(1.0, -1.0),
        );
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_segment_rect_distance() {
        let rect = Rect::new(0.0, 0.0, 2.0, 2.0);
        // Segment passing through
        assert_eq!(
            segment_rect_distance(Point::new(-1.0, 1.0), Point::new(3.0, 1.0), rect),
            0.0
        );
        // Segment to the right
        let d = segment_rect_distance(Point::new(5.0, 0.0), Point::new(5.0, 2.0), rect);
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(rects_overlap(a, Rect::new(1.0, 1.0, 3.0, 3.0)));
        assert!(!rects_overlap(a, Rect::new(2.5, 0.0, 3.0, 1.0)));
    }

    #[test]
    fn test_rotated_rect_bounds() {
        let b = rotated_rect_bounds(Point::new(1.0, 1.0), 2.0, 1.0, 90.0);
        assert!((b.width() - 1.0).abs() < 1e-9);
        assert!((b.height() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_polyline_length() {
        let pts = [Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.0, 4.0)];
        assert!((polyline_length(&pts) - 7.0).abs() < 1e-12);
    }
}
