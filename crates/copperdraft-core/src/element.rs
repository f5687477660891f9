//! Board element data model.
//!
//! Every object on the board is one `Element` variant. Elements carry stable
//! `Uuid` ids that survive undo/redo and serialization.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::footprint::SilkShape;
use crate::geometry;

pub type ElementId = Uuid;

/// Minimum copper ring around a via hole, per side.
pub const MIN_ANNULUS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    Top,
    Bottom,
    SilkTop,
    SilkBottom,
    Drill,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::Top,
        Layer::Bottom,
        Layer::SilkTop,
        Layer::SilkBottom,
        Layer::Drill,
    ];

    /// Display color as RGBA8.
    pub fn color(&self) -> [u8; 4] {
        match self {
            Layer::Top => [0xDC, 0x26, 0x26, 0xFF],
            Layer::Bottom => [0x25, 0x63, 0xEB, 0xFF],
            Layer::SilkTop => [0xFF, 0xFF, 0xFF, 0xFF],
            Layer::SilkBottom => [0xFC, 0xD3, 0x4D, 0xFF],
            Layer::Drill => [0x00, 0x00, 0x00, 0xFF],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Layer::Top => "Top Copper",
            Layer::Bottom => "Bottom Copper",
            Layer::SilkTop => "Top Silkscreen",
            Layer::SilkBottom => "Bottom Silkscreen",
            Layer::Drill => "Drill",
        }
    }
}

/// A copper trace: an open polyline with uniform width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub id: ElementId,
    pub layer: Layer,
    pub width: f64,
    #[serde(default)]
    pub net: Option<String>,
    pub points: Vec<Point>,
}

impl Trace {
    pub fn new(layer: Layer, width: f64, points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            width,
            net: None,
            points,
        }
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn length(&self) -> f64 {
        geometry::polyline_length(&self.points)
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Drop consecutive coincident points. Keeps at least the first point.
    pub fn dedup_points(&mut self) {
        self.points
            .dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    }
}

/// A standalone circular pad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub id: ElementId,
    pub layer: Layer,
    pub position: Point,
    pub diameter: f64,
    #[serde(default)]
    pub net: Option<String>,
}

impl Pad {
    pub fn new(layer: Layer, position: Point, diameter: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            position,
            diameter,
            net: None,
        }
    }
}

/// A plated through-hole connecting top and bottom copper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub id: ElementId,
    pub position: Point,
    pub diameter: f64,
    pub hole_diameter: f64,
    #[serde(default)]
    pub net: Option<String>,
}

impl Via {
    pub fn new(position: Point, diameter: f64, hole_diameter: f64) -> Self {
        let mut via = Self {
            id: Uuid::new_v4(),
            position,
            diameter,
            hole_diameter,
            net: None,
        };
        via.clamp_annulus();
        via
    }

    /// Shrink the outer diameter request so the annulus invariant holds.
    pub fn set_diameter(&mut self, diameter: f64) {
        self.diameter = diameter.max(self.hole_diameter + 2.0 * MIN_ANNULUS);
    }

    /// Shrink the hole request so the annulus invariant holds.
    pub fn set_hole_diameter(&mut self, hole_diameter: f64) {
        self.hole_diameter = hole_diameter
            .max(0.0)
            .min(self.diameter - 2.0 * MIN_ANNULUS);
    }

    fn clamp_annulus(&mut self) {
        if self.diameter < self.hole_diameter + 2.0 * MIN_ANNULUS {
            self.diameter = self.hole_diameter + 2.0 * MIN_ANNULUS;
        }
    }
}

/// A pad owned by a placed component instance. Offsets are relative to the
/// component position, before rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadInstance {
    pub offset: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub hole: Option<f64>,
    #[serde(default)]
    pub net: Option<String>,
}

/// A placed footprint: owns a mutable clone of the footprint's pads so
/// per-instance nets never touch the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    pub id: ElementId,
    pub footprint: String,
    pub layer: Layer,
    pub position: Point,
    /// Rotation in degrees, counter-clockwise.
    #[serde(default)]
    pub rotation: f64,
    pub pads: Vec<PadInstance>,
    #[serde(default)]
    pub silk: Vec<SilkShape>,
}

impl ComponentInstance {
    /// Absolute center of pad `index` after rotation.
    pub fn pad_center(&self, index: usize) -> Point {
        let pad = &self.pads[index];
        let rotated = geometry::rotate_offset(pad.offset.to_vec2(), self.rotation);
        self.position + rotated
    }

    /// Axis-aligned bounds of pad `index` after rotation.
    pub fn pad_bounds(&self, index: usize) -> Rect {
        let pad = &self.pads[index];
        geometry::rotated_rect_bounds(self.pad_center(index), pad.width, pad.height, self.rotation)
    }

    /// Index of the pad under `point`, if any (inflated by `tol`).
    pub fn pad_at(&self, point: Point, tol: f64) -> Option<usize> {
        (0..self.pads.len()).find(|&i| self.pad_bounds(i).inflate(tol, tol).contains(point))
    }

    /// Union of all pad bounds; a zero-size rect at the position when the
    /// footprint has no pads.
    pub fn bounds(&self) -> Rect {
        let mut iter = (0..self.pads.len()).map(|i| self.pad_bounds(i));
        match iter.next() {
            Some(first) => iter.fold(first, |acc, r| acc.union(r)),
            None => Rect::from_origin_size(self.position, (0.0, 0.0)),
        }
    }
}

/// A board-edge outline segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub id: ElementId,
    pub layer: Layer,
    pub width: f64,
    pub start: Point,
    pub end: Point,
}

impl Outline {
    pub fn new(layer: Layer, width: f64, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            width,
            start,
            end,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Free-standing text annotation. Bounds use a monospace glyph estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: ElementId,
    pub layer: Layer,
    pub position: Point,
    pub text: String,
    pub size: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Text {
    pub fn new(layer: Layer, position: Point, text: String, size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            position,
            text,
            size,
            rotation: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        let width = self.text.chars().count() as f64 * self.size * 0.6;
        geometry::rotated_rect_bounds(
            Point::new(self.position.x + width / 2.0, self.position.y),
            width.max(self.size * 0.6),
            self.size,
            self.rotation,
        )
    }
}

/// A display-only distance annotation between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: ElementId,
    pub start: Point,
    pub end: Point,
}

impl Measurement {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
        }
    }

    /// Measured distance in millimeters.
    pub fn value(&self) -> f64 {
        self.start.distance(self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Trace(Trace),
    Pad(Pad),
    Via(Via),
    Component(ComponentInstance),
    Outline(Outline),
    Text(Text),
    Measurement(Measurement),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Trace(t) => t.id,
            Element::Pad(p) => p.id,
            Element::Via(v) => v.id,
            Element::Component(c) => c.id,
            Element::Outline(o) => o.id,
            Element::Text(t) => t.id,
            Element::Measurement(m) => m.id,
        }
    }

    /// Layer the element lives on; `None` for layer-less annotations and vias.
    pub fn layer(&self) -> Option<Layer> {
        match self {
            Element::Trace(t) => Some(t.layer),
            Element::Pad(p) => Some(p.layer),
            Element::Via(_) => None,
            Element::Component(c) => Some(c.layer),
            Element::Outline(o) => Some(o.layer),
            Element::Text(t) => Some(t.layer),
            Element::Measurement(_) => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Trace(t) => {
                let half = t.width / 2.0;
                let origin = t.points.first().copied().unwrap_or(Point::ZERO);
                t.points
                    .iter()
                    .fold(Rect::from_origin_size(origin, (0.0, 0.0)), |acc, p| {
                        acc.union_pt(*p)
                    })
                    .inflate(half, half)
            }
            Element::Pad(p) => {
                let r = p.diameter / 2.0;
                Rect::new(
                    p.position.x - r,
                    p.position.y - r,
                    p.position.x + r,
                    p.position.y + r,
                )
            }
            Element::Via(v) => {
                let r = v.diameter / 2.0;
                Rect::new(
                    v.position.x - r,
                    v.position.y - r,
                    v.position.x + r,
                    v.position.y + r,
                )
            }
            Element::Component(c) => c.bounds(),
            Element::Outline(o) => {
                let half = o.width / 2.0;
                Rect::from_points(o.start, o.end).inflate(half, half)
            }
            Element::Text(t) => t.bounds(),
            Element::Measurement(m) => Rect::from_points(m.start, m.end),
        }
    }

    /// True when `point` is within `tol` of the element's visible geometry.
    pub fn hit_test(&self, point: Point, tol: f64) -> bool {
        match self {
            Element::Trace(t) => {
                geometry::point_polyline_distance(point, &t.points) <= t.width / 2.0 + tol
            }
            Element::Pad(p) => point.distance(p.position) <= p.diameter / 2.0 + tol,
            Element::Via(v) => point.distance(v.position) <= v.diameter / 2.0 + tol,
            Element::Component(c) => c.pad_at(point, tol).is_some(),
            Element::Outline(o) => {
                geometry::point_segment_distance(point, o.start, o.end) <= o.width / 2.0 + tol
            }
            Element::Text(t) => t.bounds().inflate(tol, tol).contains(point),
            Element::Measurement(m) => {
                geometry::point_segment_distance(point, m.start, m.end) <= tol
            }
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Trace(t) => {
                for p in &mut t.points {
                    *p += delta;
                }
            }
            Element::Pad(p) => p.position += delta,
            Element::Via(v) => v.position += delta,
            Element::Component(c) => c.position += delta,
            Element::Outline(o) => {
                o.start += delta;
                o.end += delta;
            }
            Element::Text(t) => t.position += delta,
            Element::Measurement(m) => {
                m.start += delta;
                m.end += delta;
            }
        }
    }

    /// Net label for elements that carry one.
    pub fn net(&self) -> Option<&str> {
        match self {
            Element::Trace(t) => t.net.as_deref(),
            Element::Pad(p) => p.net.as_deref(),
            Element::Via(v) => v.net.as_deref(),
            _ => None,
        }
    }

    /// Assign a net label. Returns false for element kinds without nets
    /// (component pads are addressed individually, not here).
    pub fn set_net(&mut self, net: Option<String>) -> bool {
        match self {
            Element::Trace(t) => {
                t.net = net;
                true
            }
            Element::Pad(p) => {
                p.net = net;
                true
            }
            Element::Via(v) => {
                v.net = net;
                true
            }
            _ => false,
        }
    }

    /// True when the element or one of its pads carries `net`.
    pub fn carries_net(&self, net: &str) -> bool {
        match self {
            Element::Component(c) => c.pads.iter().any(|p| p.net.as_deref() == Some(net)),
            other => other.net() == Some(net),
        }
    }
}
