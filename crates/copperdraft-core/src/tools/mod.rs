//! Tool dispatch.
//!
//! Every tool implements [`ToolHandler`]; the active tool is resolved
//! through a static dispatch table, so adding a tool means adding one
//! handler and one table row.

use kurbo::{Point, Rect};

use crate::editor::{Editor, Gesture};
use crate::element::{Element, Measurement, Outline, Pad, Text, Trace, Via};
use crate::input::Modifiers;
use crate::route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Trace,
    Pad,
    Via,
    Outline,
    Text,
    Measurement,
}

/// A pointer gesture runs down → move* → up against the active handler.
pub trait ToolHandler {
    fn on_down(&self, editor: &mut Editor, point: Point, modifiers: Modifiers);
    fn on_move(&self, editor: &mut Editor, point: Point, modifiers: Modifiers);
    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers);
}

pub fn handler(kind: ToolKind) -> &'static dyn ToolHandler {
    match kind {
        ToolKind::Select => &SelectTool,
        ToolKind::Trace => &TraceTool,
        ToolKind::Pad => &PadTool,
        ToolKind::Via => &ViaTool,
        ToolKind::Outline => &OutlineTool,
        ToolKind::Text => &TextTool,
        ToolKind::Measurement => &MeasureTool,
    }
}

struct SelectTool;

impl ToolHandler for SelectTool {
    fn on_down(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        let tol = editor.camera.pick_tolerance();
        let hit = editor.document.element_at(point, tol).map(|e| {
            let pad = match e {
                Element::Component(c) => c.pad_at(point, tol),
                _ => None,
            };
            (e.id(), pad)
        });

        match hit {
            Some((id, pad_index)) => {
                editor.select(id, pad_index, modifiers.shift);
                let last = editor.snap_for_drag(point);
                editor.gesture = Gesture::Drag {
                    last,
                    backup: editor.document.elements().to_vec(),
                    moved: false,
                };
            }
            None => {
                if !modifiers.shift {
                    editor.clear_selection();
                }
                editor.gesture = Gesture::Marquee {
                    start: point,
                    current: point,
                };
            }
        }
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        match editor.gesture {
            Gesture::Drag { .. } => {
                let snapped = editor.snap_for_drag(point);
                let mut delta = None;
                if let Gesture::Drag { last, moved, .. } = &mut editor.gesture {
                    let d = snapped - *last;
                    if d.hypot() > 1e-12 {
                        *last = snapped;
                        *moved = true;
                        delta = Some(d);
                    }
                }
                if let Some(d) = delta {
                    editor.translate_selection(d);
                }
            }
            Gesture::Marquee { .. } => {
                if let Gesture::Marquee { current, .. } = &mut editor.gesture {
                    *current = point;
                }
            }
            _ => {}
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        match std::mem::replace(&mut editor.gesture, Gesture::Idle) {
            Gesture::Drag { backup, moved, .. } => {
                if moved {
                    editor.finish_drag(backup);
                }
            }
            Gesture::Marquee { start, .. } => {
                let rect = Rect::from_points(start, point);
                editor.select_in_rect(rect, modifiers.shift);
            }
            _ => {}
        }
    }
}

struct TraceTool;

impl ToolHandler for TraceTool {
    fn on_down(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snap = editor.resolve_snap(point, None);
        if route::start_blocked(editor.document.elements(), snap.point, editor.trace_width) {
            log::info!("trace start rejected: on top of an existing trace start");
            return;
        }
        let mut trace = Trace::new(
            editor.current_layer,
            editor.trace_width,
            vec![snap.point, snap.point],
        );
        trace.net = snap.source.and_then(|s| s.net);
        editor.transient = Some(Element::Trace(trace));
        editor.gesture = Gesture::Draw;
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let start = match &editor.transient {
            Some(Element::Trace(t)) => t.start(),
            _ => return,
        };
        let snap = editor.resolve_snap(point, Some(start));
        let points = route::chamfer_route(start, snap.point);
        if let Some(Element::Trace(t)) = &mut editor.transient {
            t.points = points;
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        self.on_move(editor, point, modifiers);
        editor.gesture = Gesture::Idle;
        let mut trace = match editor.transient.take() {
            Some(Element::Trace(t)) => t,
            _ => return,
        };
        trace.dedup_points();
        if trace.points.len() < 2 || trace.length() < route::MIN_TRACE_LENGTH {
            return;
        }
        editor.document.add(Element::Trace(trace));
        editor.commit();
    }
}

struct PadTool;

impl ToolHandler for PadTool {
    fn on_down(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snap = editor.resolve_snap(point, None);
        editor.transient = Some(Element::Pad(Pad::new(
            editor.current_layer,
            snap.point,
            editor.defaults.pad_diameter,
        )));
        editor.gesture = Gesture::Draw;
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snapped = editor.resolve_snap(point, None).point;
        if let Some(Element::Pad(p)) = &mut editor.transient {
            p.position = snapped;
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        self.on_move(editor, point, modifiers);
        editor.gesture = Gesture::Idle;
        if let Some(pad @ Element::Pad(_)) = editor.transient.take() {
            editor.document.add(pad);
            editor.commit();
        }
    }
}

struct ViaTool;

impl ToolHandler for ViaTool {
    fn on_down(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snap = editor.resolve_snap(point, None);
        editor.transient = Some(Element::Via(Via::new(
            snap.point,
            editor.defaults.via_diameter,
            editor.defaults.via_hole_diameter,
        )));
        editor.gesture = Gesture::Draw;
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snapped = editor.resolve_snap(point, None).point;
        if let Some(Element::Via(v)) = &mut editor.transient {
            v.position = snapped;
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        self.on_move(editor, point, modifiers);
        editor.gesture = Gesture::Idle;
        if let Some(Element::Via(via)) = editor.transient.take() {
            editor.try_place_via(via);
        }
    }
}

struct OutlineTool;

impl ToolHandler for OutlineTool {
    fn on_down(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snap = editor.resolve_snap(point, None);
        editor.transient = Some(Element::Outline(Outline::new(
            editor.current_layer,
            editor.trace_width,
            snap.point,
            snap.point,
        )));
        editor.gesture = Gesture::Draw;
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let start = match &editor.transient {
            Some(Element::Outline(o)) => o.start,
            _ => return,
        };
        let snapped = editor.resolve_snap(point, Some(start)).point;
        if let Some(Element::Outline(o)) = &mut editor.transient {
            o.end = snapped;
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        self.on_move(editor, point, modifiers);
        editor.gesture = Gesture::Idle;
        if let Some(Element::Outline(outline)) = editor.transient.take() {
            if outline.length() >= route::MIN_TRACE_LENGTH {
                editor.document.add(Element::Outline(outline));
                editor.commit();
            }
        }
    }
}

struct TextTool;

/// Placeholder content for freshly placed annotations.
const DEFAULT_TEXT: &str = "TEXT";
const DEFAULT_TEXT_SIZE: f64 = 1.5;

impl ToolHandler for TextTool {
    fn on_down(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snap = editor.resolve_snap(point, None);
        editor.transient = Some(Element::Text(Text::new(
            editor.current_layer,
            snap.point,
            DEFAULT_TEXT.to_string(),
            DEFAULT_TEXT_SIZE,
        )));
        editor.gesture = Gesture::Draw;
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snapped = editor.resolve_snap(point, None).point;
        if let Some(Element::Text(t)) = &mut editor.transient {
            t.position = snapped;
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        self.on_move(editor, point, modifiers);
        editor.gesture = Gesture::Idle;
        if let Some(text @ Element::Text(_)) = editor.transient.take() {
            editor.document.add(text);
            editor.commit();
        }
    }
}

struct MeasureTool;

impl ToolHandler for MeasureTool {
    fn on_down(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snap = editor.resolve_snap(point, None);
        editor.transient = Some(Element::Measurement(Measurement::new(snap.point, snap.point)));
        editor.gesture = Gesture::Draw;
    }

    fn on_move(&self, editor: &mut Editor, point: Point, _modifiers: Modifiers) {
        let snapped = editor.resolve_snap(point, None).point;
        if let Some(Element::Measurement(m)) = &mut editor.transient {
            m.end = snapped;
        }
    }

    fn on_up(&self, editor: &mut Editor, point: Point, modifiers: Modifiers) {
        self.on_move(editor, point, modifiers);
        editor.gesture = Gesture::Idle;
        if let Some(Element::Measurement(m)) = editor.transient.take() {
            if m.value() >= route::MIN_TRACE_LENGTH {
                editor.document.add(Element::Measurement(m));
                editor.commit();
            }
        }
    }
}
