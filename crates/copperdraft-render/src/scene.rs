//! Scene building: editor state in, layered display list out.
//!
//! Layer order, back to front: grid, committed elements in insertion
//! order, the transient element, selection outlines, the marquee
//! rectangle. The builder is pure; rebuild after any state change.

use std::collections::HashSet;

use kurbo::{BezPath, Circle, Point, Rect, Shape};
use peniko::Color;

use copperdraft_core::camera::Camera;
use copperdraft_core::drc::Violation;
use copperdraft_core::editor::{Editor, LayerSettings};
use copperdraft_core::element::{Element, ElementId, Layer};
use copperdraft_core::footprint::SilkShape;

/// Grid lines disappear below this on-screen spacing.
const MIN_GRID_SPACING_PX: f64 = 5.0;

const GRID_COLOR: Color = Color::rgba8(0xFF, 0xFF, 0xFF, 0x14);
const SELECTION_COLOR: Color = Color::rgba8(0x00, 0xFF, 0x88, 0xFF);
const NET_HIGHLIGHT_COLOR: Color = Color::rgba8(0x22, 0xD3, 0xEE, 0xFF);
const VIOLATION_COLOR: Color = Color::rgba8(0xFF, 0x3B, 0x30, 0xFF);
const MARQUEE_COLOR: Color = Color::rgba8(0x4C, 0xC9, 0xF0, 0xFF);
const SILK_COLOR: Color = Color::rgba8(0xFF, 0xFF, 0xFF, 0xFF);
const DRILL_COLOR: Color = Color::rgba8(0x00, 0x00, 0x00, 0xFF);

/// Transparency for the element being drawn.
const TRANSIENT_ALPHA: f64 = 0.6;

const CIRCLE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        color: Color,
        /// Stroke width in world millimeters.
        width: f64,
        dashed: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

pub struct SceneInput<'a> {
    pub elements: &'a [Element],
    pub camera: &'a Camera,
    pub layers: &'a LayerSettings,
    pub selection: &'a HashSet<ElementId>,
    pub active_net: Option<&'a str>,
    pub violations: &'a [Violation],
    pub transient: Option<&'a Element>,
    pub marquee: Option<Rect>,
    pub grid_size: f64,
}

impl<'a> SceneInput<'a> {
    pub fn from_editor(editor: &'a Editor) -> Self {
        Self {
            elements: editor.document.elements(),
            camera: &editor.camera,
            layers: &editor.layers,
            selection: &editor.selection,
            active_net: editor.active_net.as_deref(),
            violations: editor.violations(),
            transient: editor.transient(),
            marquee: editor.marquee_rect(),
            grid_size: editor.grid_size,
        }
    }
}

fn with_alpha(color: Color, alpha: f64) -> Color {
    let a = (color.a as f64 * alpha.clamp(0.0, 1.0)).round() as u8;
    Color::rgba8(color.r, color.g, color.b, a)
}

fn layer_color(layer: Layer) -> Color {
    let [r, g, b, a] = layer.color();
    Color::rgba8(r, g, b, a)
}

pub fn build_scene(input: &SceneInput) -> Scene {
    let mut scene = Scene::default();
    push_grid(&mut scene, input);

    for element in input.elements {
        if let Some(layer) = element.layer() {
            if !input.layers.is_visible(layer) {
                continue;
            }
        }
        let alpha = element
            .layer()
            .map_or(1.0, |layer| input.layers.opacity(layer));
        push_element(&mut scene, element, alpha, input.camera);
    }

    if let Some(net) = input.active_net {
        push_net_highlight(&mut scene, input, net);
    }
    push_violation_markers(&mut scene, input);

    if let Some(transient) = input.transient {
        push_element(&mut scene, transient, TRANSIENT_ALPHA, input.camera);
    }

    push_selection(&mut scene, input);

    if let Some(rect) = input.marquee {
        scene.primitives.push(Primitive::Stroke {
            path: rect.to_path(CIRCLE_TOLERANCE),
            color: MARQUEE_COLOR,
            width: input.camera.screen_radius_to_world(1.0),
            dashed: true,
        });
    }

    scene
}

fn push_grid(scene: &mut Scene, input: &SceneInput) {
    if input.grid_size * input.camera.zoom < MIN_GRID_SPACING_PX {
        return;
    }
    let view = input.camera.world_viewport();
    let step = input.grid_size;
    let mut path = BezPath::new();
    let mut x = (view.x0 / step).floor() * step;
    while x <= view.x1 {
        path.move_to(Point::new(x, view.y0));
        path.line_to(Point::new(x, view.y1));
        x += step;
    }
    let mut y = (view.y0 / step).floor() * step;
    while y <= view.y1 {
        path.move_to(Point::new(view.x0, y));
        path.line_to(Point::new(view.x1, y));
        y += step;
    }
    scene.primitives.push(Primitive::Stroke {
        path,
        color: GRID_COLOR,
        width: input.camera.screen_radius_to_world(1.0),
        dashed: false,
    });
}

fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

fn push_element(scene: &mut Scene, element: &Element, alpha: f64, camera: &Camera) {
    match element {
        Element::Trace(t) => scene.primitives.push(Primitive::Stroke {
            path: polyline_path(&t.points),
            color: with_alpha(layer_color(t.layer), alpha),
            width: t.width,
            dashed: false,
        }),
        Element::Pad(p) => scene.primitives.push(Primitive::Fill {
            path: Circle::new(p.position, p.diameter / 2.0).to_path(CIRCLE_TOLERANCE),
            color: with_alpha(layer_color(p.layer), alpha),
        }),
        Element::Via(v) => {
            scene.primitives.push(Primitive::Fill {
                path: Circle::new(v.position, v.diameter / 2.0).to_path(CIRCLE_TOLERANCE),
                color: with_alpha(layer_color(Layer::Top), alpha),
            });
            scene.primitives.push(Primitive::Fill {
                path: Circle::new(v.position, v.hole_diameter / 2.0).to_path(CIRCLE_TOLERANCE),
                color: with_alpha(DRILL_COLOR, alpha),
            });
        }
        Element::Component(c) => {
            for (i, pad) in c.pads.iter().enumerate() {
                scene.primitives.push(Primitive::Fill {
                    path: c.pad_bounds(i).to_path(CIRCLE_TOLERANCE),
                    color: with_alpha(layer_color(c.layer), alpha),
                });
                if let Some(hole) = pad.hole {
                    scene.primitives.push(Primitive::Fill {
                        path: Circle::new(c.pad_center(i), hole / 2.0).to_path(CIRCLE_TOLERANCE),
                        color: with_alpha(DRILL_COLOR, alpha),
                    });
                }
            }
            push_silk(scene, c, alpha);
        }
        Element::Outline(o) => scene.primitives.push(Primitive::Stroke {
            path: polyline_path(&[o.start, o.end]),
            color: with_alpha(layer_color(o.layer), alpha),
            width: o.width,
            dashed: false,
        }),
        Element::Text(t) => scene.primitives.push(Primitive::Stroke {
            path: t.bounds().to_path(CIRCLE_TOLERANCE),
            color: with_alpha(layer_color(t.layer), alpha),
            width: camera.screen_radius_to_world(1.0),
            dashed: false,
        }),
        Element::Measurement(m) => scene.primitives.push(Primitive::Stroke {
            path: polyline_path(&[m.start, m.end]),
            color: with_alpha(SELECTION_COLOR, alpha),
            width: camera.screen_radius_to_world(1.0),
            dashed: true,
        }),
    }
}

fn push_silk(scene: &mut Scene, c: &copperdraft_core::element::ComponentInstance, alpha: f64) {
    let color = with_alpha(SILK_COLOR, alpha);
    let origin = c.position;
    // Silk shapes are footprint-local; rotation is left to pad geometry,
    // silk renders unrotated like the source library draws it
    for shape in &c.silk {
        let primitive = match *shape {
            SilkShape::Rect {
                x,
                y,
                width,
                height,
            } => Primitive::Stroke {
                path: Rect::new(
                    origin.x + x,
                    origin.y + y,
                    origin.x + x + width,
                    origin.y + y + height,
                )
                .to_path(CIRCLE_TOLERANCE),
                color,
                width: 0.15,
                dashed: false,
            },
            SilkShape::Circle { x, y, radius } => Primitive::Stroke {
                path: Circle::new(Point::new(origin.x + x, origin.y + y), radius)
                    .to_path(CIRCLE_TOLERANCE),
                color,
                width: 0.15,
                dashed: false,
            },
            SilkShape::Dot { x, y, radius } => Primitive::Fill {
                path: Circle::new(Point::new(origin.x + x, origin.y + y), radius)
                    .to_path(CIRCLE_TOLERANCE),
                color,
            },
            SilkShape::Line { x1, y1, x2, y2 } => Primitive::Stroke {
                path: polyline_path(&[
                    Point::new(origin.x + x1, origin.y + y1),
                    Point::new(origin.x + x2, origin.y + y2),
                ]),
                color,
                width: 0.15,
                dashed: false,
            },
        };
        scene.primitives.push(primitive);
    }
}

fn push_net_highlight(scene: &mut Scene, input: &SceneInput, net: &str) {
    let width = input.camera.screen_radius_to_world(2.0);
    for element in input.elements {
        if element.carries_net(net) {
            scene.primitives.push(Primitive::Stroke {
                path: element.bounds().inflate(0.2, 0.2).to_path(CIRCLE_TOLERANCE),
                color: NET_HIGHLIGHT_COLOR,
                width,
                dashed: false,
            });
        }
    }
}

fn push_violation_markers(scene: &mut Scene, input: &SceneInput) {
    let mut flagged: HashSet<ElementId> = HashSet::new();
    for violation in input.violations {
        flagged.extend(violation.elements.iter().copied());
    }
    let width = input.camera.screen_radius_to_world(2.0);
    for element in input.elements {
        if flagged.contains(&element.id()) {
            scene.primitives.push(Primitive::Stroke {
                path: element.bounds().inflate(0.3, 0.3).to_path(CIRCLE_TOLERANCE),
                color: VIOLATION_COLOR,
                width,
                dashed: true,
            });
        }
    }
}

fn push_selection(scene: &mut Scene, input: &SceneInput) {
    let width = input.camera.screen_radius_to_world(1.5);
    for element in input.elements {
        if input.selection.contains(&element.id()) {
            scene.primitives.push(Primitive::Stroke {
                path: element.bounds().inflate(0.3, 0.3).to_path(CIRCLE_TOLERANCE),
                color: SELECTION_COLOR,
                width,
                dashed: true,
            });
        }
    }
}
