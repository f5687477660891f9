//! Viewport camera mapping world millimeters to screen pixels.
//!
//! World origin projects to the viewport center when the pan offset is zero.
//! Zoom is expressed in pixels per millimeter.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Pick radius in screen pixels, kept visually constant across zoom.
const PICK_RADIUS_PX: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in screen pixels, applied after centering.
    pub offset: Vec2,
    /// Pixels per world millimeter.
    pub zoom: f64,
    /// Viewport size in pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl Camera {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        let c = self.center();
        Point::new(
            world.x * self.zoom + c.x + self.offset.x,
            world.y * self.zoom + c.y + self.offset.y,
        )
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        let c = self.center();
        Point::new(
            (screen.x - c.x - self.offset.x) / self.zoom,
            (screen.y - c.y - self.offset.y) / self.zoom,
        )
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiply zoom by `factor`, keeping the world point under
    /// `screen_point` fixed on screen. Zoom is clamped to [MIN_ZOOM, MAX_ZOOM].
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let anchor = self.screen_to_world(screen_point);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.world_to_screen(anchor);
        self.offset += screen_point - after;
    }

    /// Hit-test tolerance in world units for the current zoom.
    pub fn pick_tolerance(&self) -> f64 {
        PICK_RADIUS_PX / self.zoom
    }

    /// Convert a screen-pixel radius to world units at the current zoom.
    pub fn screen_radius_to_world(&self, radius_px: f64) -> f64 {
        radius_px / self.zoom
    }

    /// The world-space rectangle currently visible in the viewport.
    pub fn world_viewport(&self) -> Rect {
        let tl = self.screen_to_world(Point::ZERO);
        let br = self.screen_to_world(Point::new(self.viewport.width, self.viewport.height));
        Rect::new(tl.x, tl.y, br.x, br.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_origin_maps_to_viewport_center() {
        let cam = Camera::new(Size::new(800.0, 600.0));
        assert!(close(cam.world_to_screen(Point::ZERO), Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_round_trip() {
        let mut cam = Camera::new(Size::new(1024.0, 768.0));
        cam.zoom = 2.5;
        cam.offset = Vec2::new(40.0, -17.0);
        let world = Point::new(12.34, -56.78);
        assert!(close(cam.screen_to_world(cam.world_to_screen(world)), world));
    }

    #[test]
    fn test_zoom_at_keeps_cursor_fixed() {
        let mut cam = Camera::new(Size::new(800.0, 600.0));
        let cursor = Point::new(150.0, 450.0);
        let anchor = cam.screen_to_world(cursor);
        cam.zoom_at(cursor, 1.1);
        assert!(close(cam.world_to_screen(anchor), cursor));
        cam.zoom_at(cursor, 0.9);
        assert!(close(cam.world_to_screen(anchor), cursor));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = Camera::default();
        cam.zoom_at(Point::new(400.0, 300.0), 1e6);
        assert_eq!(cam.zoom, MAX_ZOOM);
        cam.zoom_at(Point::new(400.0, 300.0), 1e-9);
        assert_eq!(cam.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_pick_tolerance_scales_inverse_to_zoom() {
        let mut cam = Camera::default();
        cam.zoom = 1.0;
        let base = cam.pick_tolerance();
        cam.zoom = 4.0;
        assert!((cam.pick_tolerance() - base / 4.0).abs() < 1e-12);
    }
}
