//! Board export: vector shapes + SVG, rasterized PNG, and a structured
//! JSON dump. All exporters are pure functions over the element list.

use kurbo::{Point, Rect};
use thiserror::Error;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::element::{Element, Layer};

/// Raster export scale.
pub const PNG_PIXELS_PER_MM: f64 = 10.0;

/// Breathing room around the board bounds in exports.
const MARGIN_MM: f64 = 5.0;

const BACKGROUND: [u8; 4] = [0x1A, 0x1A, 0x2E, 0xFF];
const DRILL: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to allocate {width}x{height} raster surface")]
    SurfaceTooLarge { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Backend-neutral drawing primitive, millimeter units.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorShape {
    Polyline {
        points: Vec<Point>,
        color: [u8; 4],
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: [u8; 4],
    },
    Rect {
        rect: Rect,
        fill: [u8; 4],
    },
}

/// Flatten copper and outline geometry to vector shapes, in z-order.
/// Text and measurements are screen annotations and stay out of exports.
pub fn vector_shapes(elements: &[Element]) -> Vec<VectorShape> {
    let mut shapes = Vec::new();
    for element in elements {
        match element {
            Element::Trace(t) => shapes.push(VectorShape::Polyline {
                points: t.points.clone(),
                color: t.layer.color(),
                width: t.width,
            }),
            Element::Pad(p) => shapes.push(VectorShape::Circle {
                center: p.position,
                radius: p.diameter / 2.0,
                fill: p.layer.color(),
            }),
            Element::Via(v) => {
                shapes.push(VectorShape::Circle {
                    center: v.position,
                    radius: v.diameter / 2.0,
                    fill: Layer::Top.color(),
                });
                shapes.push(VectorShape::Circle {
                    center: v.position,
                    radius: v.hole_diameter / 2.0,
                    fill: DRILL,
                });
            }
            Element::Component(c) => {
                for (i, pad) in c.pads.iter().enumerate() {
                    shapes.push(VectorShape::Rect {
                        rect: c.pad_bounds(i),
                        fill: c.layer.color(),
                    });
                    if let Some(hole) = pad.hole {
                        shapes.push(VectorShape::Circle {
                            center: c.pad_center(i),
                            radius: hole / 2.0,
                            fill: DRILL,
                        });
                    }
                }
            }
            Element::Outline(o) => shapes.push(VectorShape::Polyline {
                points: vec![o.start, o.end],
                color: o.layer.color(),
                width: o.width,
            }),
            Element::Text(_) | Element::Measurement(_) => {}
        }
    }
    shapes
}

/// Export frame: the union of element bounds plus a margin. An empty
/// board exports a fixed 100×100mm frame centered on the origin.
pub fn bounding_box(elements: &[Element]) -> Rect {
    let mut iter = elements.iter().map(|e| e.bounds());
    let bounds = match iter.next() {
        Some(first) => iter.fold(first, |acc, r| acc.union(r)),
        None => Rect::new(-50.0, -50.0, 50.0, 50.0),
    };
    bounds.inflate(MARGIN_MM, MARGIN_MM)
}

fn hex(color: [u8; 4]) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

/// Render the board as a standalone SVG document, 1 user unit = 1mm.
pub fn to_svg(elements: &[Element]) -> String {
    let frame = bounding_box(elements);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{:.3} {:.3} {:.3} {:.3}\" width=\"{:.1}mm\" height=\"{:.1}mm\">\n",
        frame.x0,
        frame.y0,
        frame.width(),
        frame.height(),
        frame.width(),
        frame.height(),
    );
    svg.push_str(&format!(
        "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"{}\"/>\n",
        frame.x0,
        frame.y0,
        frame.width(),
        frame.height(),
        hex(BACKGROUND),
    ));
    for shape in vector_shapes(elements) {
        match shape {
            VectorShape::Polyline {
                points,
                color,
                width,
            } => {
                let coords: Vec<String> =
                    points.iter().map(|p| format!("{:.3},{:.3}", p.x, p.y)).collect();
                svg.push_str(&format!(
                    "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.3}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
                    coords.join(" "),
                    hex(color),
                    width,
                ));
            }
            VectorShape::Circle {
                center,
                radius,
                fill,
            } => {
                svg.push_str(&format!(
                    "<circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\" fill=\"{}\"/>\n",
                    center.x,
                    center.y,
                    radius,
                    hex(fill),
                ));
            }
            VectorShape::Rect { rect, fill } => {
                svg.push_str(&format!(
                    "<rect x=\"{:.3}\" y=\"{:.3}\" width=\"{:.3}\" height=\"{:.3}\" fill=\"{}\"/>\n",
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height(),
                    hex(fill),
                ));
            }
        }
    }
    svg.push_str("</svg>\n");
    svg
}

/// Rasterize the board to an encoded PNG at `pixels_per_mm`.
pub fn to_png(elements: &[Element], pixels_per_mm: f64) -> Result<Vec<u8>, ExportError> {
    let frame = bounding_box(elements);
    let width = (frame.width() * pixels_per_mm).ceil() as u32;
    let height = (frame.height() * pixels_per_mm).ceil() as u32;
    let mut pixmap =
        Pixmap::new(width.max(1), height.max(1)).ok_or(ExportError::SurfaceTooLarge {
            width,
            height,
        })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        BACKGROUND[0],
        BACKGROUND[1],
        BACKGROUND[2],
        BACKGROUND[3],
    ));

    let to_px = |p: Point| -> (f32, f32) {
        (
            ((p.x - frame.x0) * pixels_per_mm) as f32,
            ((p.y - frame.y0) * pixels_per_mm) as f32,
        )
    };
    let scale = pixels_per_mm as f32;
    let mut paint = Paint::default();
    paint.anti_alias = true;

    for shape in vector_shapes(elements) {
        match shape {
            VectorShape::Polyline {
                points,
                color,
                width,
            } => {
                if points.len() < 2 {
                    continue;
                }
                let mut pb = PathBuilder::new();
                let (x, y) = to_px(points[0]);
                pb.move_to(x, y);
                for p in &points[1..] {
                    let (x, y) = to_px(*p);
                    pb.line_to(x, y);
                }
                let path = match pb.finish() {
                    Some(path) => path,
                    None => continue,
                };
                paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
                let stroke = Stroke {
                    width: width as f32 * scale,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
            VectorShape::Circle {
                center,
                radius,
                fill,
            } => {
                let (cx, cy) = to_px(center);
                let path = match PathBuilder::from_circle(cx, cy, radius as f32 * scale) {
                    Some(path) => path,
                    None => continue,
                };
                paint.set_color_rgba8(fill[0], fill[1], fill[2], fill[3]);
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
            VectorShape::Rect { rect, fill } => {
                let (x0, y0) = to_px(Point::new(rect.x0, rect.y0));
                let (x1, y1) = to_px(Point::new(rect.x1, rect.y1));
                let r = match tiny_skia::Rect::from_ltrb(x0, y0, x1, y1) {
                    Some(r) => r,
                    None => continue,
                };
                paint.set_color_rgba8(fill[0], fill[1], fill[2], fill[3]);
                pixmap.fill_rect(r, &paint, Transform::identity(), None);
            }
        }
    }

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))
}

/// Structured dump of the raw elements; round-trips through serde.
pub fn to_json(elements: &[Element]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(elements)?)
}
