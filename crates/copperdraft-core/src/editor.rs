//! The editor: one self-contained interaction controller per board.
//!
//! All state lives on the `Editor` value, so several editors can coexist
//! in one process. Pointer gestures are routed through the tool dispatch
//! table; every completed mutation commits atomically (history push plus
//! a DRC rerun) or is rejected whole.

use std::collections::HashSet;

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::board::BoardDocument;
use crate::camera::Camera;
use crate::drc::{self, RuleSet, Violation};
use crate::element::{ComponentInstance, Element, ElementId, Layer, PadInstance, Via};
use crate::footprint;
use crate::input::{Modifiers, PointerButton, PointerEvent};
use crate::net::{self, PadRef};
use crate::snap::{self, SnapContext, SnapResult};
use crate::tools::{self, ToolKind};

/// Snap capture radius in screen pixels.
const SNAP_RADIUS_PX: f64 = 8.0;

/// Sizes applied to newly placed elements, adjustable and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingDefaults {
    pub pad_diameter: f64,
    pub via_diameter: f64,
    pub via_hole_diameter: f64,
}

impl Default for DrawingDefaults {
    fn default() -> Self {
        Self {
            pad_diameter: 1.5,
            via_diameter: 0.8,
            via_hole_diameter: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayerState {
    visible: bool,
    opacity: f64,
}

/// Per-layer visibility and opacity, render-time only.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    states: [LayerState; Layer::ALL.len()],
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            states: [LayerState {
                visible: true,
                opacity: 1.0,
            }; Layer::ALL.len()],
        }
    }
}

impl LayerSettings {
    fn idx(layer: Layer) -> usize {
        Layer::ALL.iter().position(|&l| l == layer).unwrap_or(0)
    }

    pub fn is_visible(&self, layer: Layer) -> bool {
        self.states[Self::idx(layer)].visible
    }

    pub fn opacity(&self, layer: Layer) -> f64 {
        self.states[Self::idx(layer)].opacity
    }

    pub fn set_visible(&mut self, layer: Layer, visible: bool) {
        self.states[Self::idx(layer)].visible = visible;
    }

    pub fn set_opacity(&mut self, layer: Layer, opacity: f64) {
        self.states[Self::idx(layer)].opacity = opacity.clamp(0.0, 1.0);
    }
}

/// Which rule a `set_rule` command edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    MinTraceWidth,
    TraceClearance,
    PadClearance,
    ViaClearance,
    FootprintClearance,
}

/// Transient pointer-gesture state; never survives past the up event.
#[derive(Debug, Clone)]
pub(crate) enum Gesture {
    Idle,
    /// Moving the selection; `backup` restores the pre-drag state when a
    /// hard guard rejects the result.
    Drag {
        last: Point,
        backup: Vec<Element>,
        moved: bool,
    },
    Marquee {
        start: Point,
        current: Point,
    },
    /// A drawing tool owns the transient element.
    Draw,
}

pub struct Editor {
    pub document: BoardDocument,
    pub camera: Camera,
    pub selection: HashSet<ElementId>,
    pub tool: ToolKind,
    pub current_layer: Layer,
    pub trace_width: f64,
    pub grid_size: f64,
    pub snap_enabled: bool,
    pub rules: RuleSet,
    pub layers: LayerSettings,
    pub active_net: Option<String>,
    pub defaults: DrawingDefaults,
    violations: Vec<Violation>,
    last_selected: Option<ElementId>,
    selected_pad: Option<PadRef>,
    pub(crate) transient: Option<Element>,
    pub(crate) gesture: Gesture,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            document: BoardDocument::new(),
            camera: Camera::default(),
            selection: HashSet::new(),
            tool: ToolKind::default(),
            current_layer: Layer::Top,
            trace_width: 0.3,
            grid_size: 1.0,
            snap_enabled: true,
            rules: RuleSet::default(),
            layers: LayerSettings::default(),
            active_net: None,
            defaults: DrawingDefaults::default(),
            violations: Vec::new(),
            last_selected: None,
            selected_pad: None,
            transient: None,
            gesture: Gesture::Idle,
        }
    }

    pub fn with_viewport(viewport: Size) -> Self {
        let mut editor = Self::new();
        editor.camera.viewport = viewport;
        editor
    }

    // --- pointer input ---------------------------------------------------

    /// Screen-space entry point; primary-button gestures go to the active
    /// tool, everything else is ignored.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: PointerButton::Primary,
                modifiers,
            } => {
                let world = self.camera.screen_to_world(position);
                self.pointer_down(world, modifiers);
            }
            PointerEvent::Move {
                position,
                modifiers,
            } => {
                let world = self.camera.screen_to_world(position);
                self.pointer_move(world, modifiers);
            }
            PointerEvent::Up {
                position,
                button: PointerButton::Primary,
                modifiers,
            } => {
                let world = self.camera.screen_to_world(position);
                self.pointer_up(world, modifiers);
            }
            _ => {}
        }
    }

    pub fn pointer_down(&mut self, world: Point, modifiers: Modifiers) {
        tools::handler(self.tool).on_down(self, world, modifiers);
    }

    pub fn pointer_move(&mut self, world: Point, modifiers: Modifiers) {
        tools::handler(self.tool).on_move(self, world, modifiers);
    }

    pub fn pointer_up(&mut self, world: Point, modifiers: Modifiers) {
        tools::handler(self.tool).on_up(self, world, modifiers);
    }

    // --- snapping --------------------------------------------------------

    fn snap_tolerance(&self) -> f64 {
        self.camera.screen_radius_to_world(SNAP_RADIUS_PX)
    }

    /// Full-priority snap for drawing tools.
    pub fn resolve_snap(&self, cursor: Point, anchor: Option<Point>) -> SnapResult {
        snap::resolve(
            cursor,
            &SnapContext {
                elements: self.document.elements(),
                grid_size: self.grid_size,
                grid_enabled: self.snap_enabled,
                tolerance: self.snap_tolerance(),
                anchor,
                dragging: false,
            },
        )
    }

    /// Grid-only snap used while dragging elements.
    pub fn snap_for_drag(&self, cursor: Point) -> Point {
        snap::resolve(
            cursor,
            &SnapContext {
                elements: self.document.elements(),
                grid_size: self.grid_size,
                grid_enabled: self.snap_enabled,
                tolerance: self.snap_tolerance(),
                anchor: None,
                dragging: true,
            },
        )
        .point
    }

    // --- selection -------------------------------------------------------

    pub(crate) fn select(&mut self, id: ElementId, pad_index: Option<usize>, additive: bool) {
        if !additive && !self.selection.contains(&id) {
            self.selection.clear();
        }
        self.selection.insert(id);
        self.last_selected = Some(id);
        self.selected_pad = pad_index.map(|pad_index| PadRef {
            component: id,
            pad_index,
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.last_selected = None;
        self.selected_pad = None;
    }

    pub(crate) fn select_in_rect(&mut self, rect: Rect, additive: bool) {
        if !additive {
            self.clear_selection();
        }
        let hits: Vec<ElementId> = self.document.elements_in_rect(rect).map(|e| e.id()).collect();
        for id in hits {
            self.selection.insert(id);
            self.last_selected = Some(id);
        }
    }

    pub fn selected_pad(&self) -> Option<PadRef> {
        self.selected_pad
    }

    // --- gesture support -------------------------------------------------

    pub(crate) fn translate_selection(&mut self, delta: Vec2) {
        for element in self.document.elements_mut() {
            if self.selection.contains(&element.id()) {
                element.translate(delta);
            }
        }
    }

    /// Close out a drag: commit, unless a selected via landed within the
    /// via clearance of another via, in which case the whole drag rolls
    /// back to `backup`.
    pub(crate) fn finish_drag(&mut self, backup: Vec<Element>) {
        let ok = self.document.elements().iter().all(|e| match e {
            Element::Via(v) if self.selection.contains(&v.id) => drc::via_placement_ok(
                self.document.elements(),
                v.position,
                v.diameter,
                &self.rules,
                Some(v.id),
            ),
            _ => true,
        });
        if ok {
            self.commit();
        } else {
            log::warn!("drag rolled back: via clearance violated");
            self.document.replace_elements(backup);
            self.run_drc();
        }
    }

    /// Insert a via unless it violates via clearance against an existing
    /// via. A rejected via leaves both the elements and the history
    /// untouched.
    pub fn try_place_via(&mut self, via: Via) -> bool {
        if !drc::via_placement_ok(
            self.document.elements(),
            via.position,
            via.diameter,
            &self.rules,
            None,
        ) {
            log::info!("via rejected: too close to an existing via");
            return false;
        }
        self.document.add(Element::Via(via));
        self.commit();
        true
    }

    /// History push plus a DRC rerun; one call per completed action.
    pub fn commit(&mut self) {
        self.document.commit();
        self.run_drc();
    }

    pub fn run_drc(&mut self) {
        self.violations = drc::check_rules(self.document.elements(), &self.rules);
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    // --- commands --------------------------------------------------------

    /// Switch tools, dropping any in-flight gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.transient = None;
        self.gesture = Gesture::Idle;
        self.tool = tool;
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.current_layer = layer;
    }

    pub fn set_trace_width(&mut self, width: f64) {
        if width > 0.0 {
            self.trace_width = width;
        }
    }

    pub fn set_grid_size(&mut self, grid: f64) {
        if grid > 0.0 {
            self.grid_size = grid;
        }
    }

    pub fn toggle_snap(&mut self) {
        self.snap_enabled = !self.snap_enabled;
    }

    pub fn set_rule(&mut self, field: RuleField, value: f64) {
        if value < 0.0 {
            return;
        }
        match field {
            RuleField::MinTraceWidth => self.rules.min_trace_width = value,
            RuleField::TraceClearance => self.rules.min_clearance_trace_trace = value,
            RuleField::PadClearance => self.rules.clearance_pad_trace = value,
            RuleField::ViaClearance => self.rules.clearance_via_via = value,
            RuleField::FootprintClearance => self.rules.clearance_footprint = value,
        }
        self.run_drc();
    }

    pub fn undo(&mut self) {
        if self.document.undo() {
            self.clear_selection();
            self.run_drc();
        }
    }

    pub fn redo(&mut self) {
        if self.document.redo() {
            self.clear_selection();
            self.run_drc();
        }
    }

    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let selection = std::mem::take(&mut self.selection);
        self.document.retain(|e| !selection.contains(&e.id()));
        self.last_selected = None;
        self.selected_pad = None;
        self.commit();
    }

    /// Drop the transient element and the selection. Committed elements
    /// and history are untouched.
    pub fn escape(&mut self) {
        self.transient = None;
        self.gesture = Gesture::Idle;
        self.clear_selection();
    }

    pub fn clear_all(&mut self) {
        if self.document.is_empty() {
            return;
        }
        self.document.clear();
        self.clear_selection();
        self.commit();
    }

    /// Label the selected component pad, or the most recently selected
    /// standalone element. Empty labels clear the net.
    pub fn assign_net(&mut self, label: Option<String>) {
        let label = label.filter(|l| !l.trim().is_empty());
        let changed = if let Some(pad_ref) = self.selected_pad {
            net::assign_to_pad(self.document.elements_mut(), pad_ref, label)
        } else if let Some(id) = self.last_selected {
            net::assign_to_element(self.document.elements_mut(), id, label)
        } else {
            false
        };
        if changed {
            self.commit();
        }
    }

    pub fn set_active_net(&mut self, net: Option<String>) {
        self.active_net = net.filter(|n| !n.trim().is_empty());
    }

    /// Place a footprint from the library at the origin, select it, and
    /// switch back to the select tool. Unknown ids are a no-op.
    pub fn place_component(&mut self, footprint_id: &str) {
        let def = match footprint::get(footprint_id) {
            Some(def) => def,
            None => {
                log::warn!("unknown footprint {footprint_id:?}");
                return;
            }
        };
        let instance = ComponentInstance {
            id: uuid::Uuid::new_v4(),
            footprint: footprint_id.to_string(),
            layer: self.current_layer,
            position: Point::ZERO,
            rotation: 0.0,
            pads: def
                .pads
                .iter()
                .map(|p| PadInstance {
                    offset: Point::new(p.x, p.y),
                    width: p.width,
                    height: p.height,
                    hole: p.hole,
                    net: None,
                })
                .collect(),
            silk: def.silk.clone(),
        };
        let id = self.document.add(Element::Component(instance));
        self.commit();
        self.set_tool(ToolKind::Select);
        self.clear_selection();
        self.selection.insert(id);
        self.last_selected = Some(id);
    }

    pub fn set_layer_visible(&mut self, layer: Layer, visible: bool) {
        self.layers.set_visible(layer, visible);
    }

    pub fn set_layer_opacity(&mut self, layer: Layer, opacity: f64) {
        self.layers.set_opacity(layer, opacity);
    }

    // --- property edits --------------------------------------------------

    /// Change the stroke width of a trace or outline.
    pub fn set_element_width(&mut self, id: ElementId, width: f64) {
        if width <= 0.0 {
            return;
        }
        let changed = match self.document.get_mut(id) {
            Some(Element::Trace(t)) => {
                t.width = width;
                true
            }
            Some(Element::Outline(o)) => {
                o.width = width;
                true
            }
            _ => false,
        };
        if changed {
            self.commit();
        }
    }

    pub fn set_pad_diameter(&mut self, id: ElementId, diameter: f64) {
        if diameter <= 0.0 {
            return;
        }
        if let Some(Element::Pad(p)) = self.document.get_mut(id) {
            p.diameter = diameter;
            self.commit();
        }
    }

    /// Via size edits clamp to keep the annulus invariant.
    pub fn set_via_diameter(&mut self, id: ElementId, diameter: f64) {
        if diameter <= 0.0 {
            return;
        }
        if let Some(Element::Via(v)) = self.document.get_mut(id) {
            v.set_diameter(diameter);
            self.commit();
        }
    }

    pub fn set_via_hole(&mut self, id: ElementId, hole: f64) {
        if hole < 0.0 {
            return;
        }
        if let Some(Element::Via(v)) = self.document.get_mut(id) {
            v.set_hole_diameter(hole);
            self.commit();
        }
    }

    pub fn set_text_content(&mut self, id: ElementId, text: String) {
        if text.is_empty() {
            return;
        }
        if let Some(Element::Text(t)) = self.document.get_mut(id) {
            t.text = text;
            self.commit();
        }
    }

    // --- persistence -----------------------------------------------------

    /// Capture everything a save needs.
    pub fn snapshot(&self) -> crate::storage::BoardSnapshot {
        crate::storage::BoardSnapshot {
            elements: self.document.elements().to_vec(),
            viewport: crate::storage::Viewport {
                zoom: self.camera.zoom,
                pan_x: self.camera.offset.x,
                pan_y: self.camera.offset.y,
            },
            defaults: self.defaults,
            rules: self.rules.clone(),
        }
    }

    /// Replace the board with a loaded snapshot. The loaded state becomes
    /// the new history baseline.
    pub fn apply_snapshot(&mut self, snapshot: crate::storage::BoardSnapshot) {
        self.document = BoardDocument::from_elements(snapshot.elements);
        self.camera.zoom = snapshot
            .viewport
            .zoom
            .clamp(crate::camera::MIN_ZOOM, crate::camera::MAX_ZOOM);
        self.camera.offset = Vec2::new(snapshot.viewport.pan_x, snapshot.viewport.pan_y);
        self.defaults = snapshot.defaults;
        self.rules = snapshot.rules;
        self.clear_selection();
        self.transient = None;
        self.gesture = Gesture::Idle;
        self.run_drc();
    }

    // --- render support --------------------------------------------------

    /// The element being drawn right now, if any.
    pub fn transient(&self) -> Option<&Element> {
        self.transient.as_ref()
    }

    /// The marquee rectangle while a rubber-band selection is running.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.gesture {
            Gesture::Marquee { start, current } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Pad;

    fn editor() -> Editor {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut ed = Editor::new();
        // 10 px per mm keeps snap tolerance at a realistic 0.8mm
        ed.camera.zoom = 10.0;
        ed
    }

    fn draw(ed: &mut Editor, from: Point, to: Point) {
        ed.pointer_down(from, Modifiers::NONE);
        ed.pointer_move(to, Modifiers::NONE);
        ed.pointer_up(to, Modifiers::NONE);
    }

    #[test]
    fn test_trace_gesture_commits_chamfered_polyline() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Trace);
        draw(&mut ed, Point::new(0.1, -0.2), Point::new(10.2, 4.1));
        assert_eq!(ed.document.len(), 1);
        if let Element::Trace(t) = &ed.document.elements()[0] {
            let expected = [(0.0, 0.0), (2.0, 2.0), (8.0, 2.0), (10.0, 4.0)];
            assert_eq!(t.points.len(), expected.len());
            for (p, (x, y)) in t.points.iter().zip(expected) {
                assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9);
            }
        } else {
            unreachable!();
        }
        assert!(ed.document.can_undo());
    }

    #[test]
    fn test_screen_events_route_through_camera() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Pad);
        // Screen center maps to world origin
        let center = Point::new(
            ed.camera.viewport.width / 2.0,
            ed.camera.viewport.height / 2.0,
        );
        ed.handle_pointer(PointerEvent::Down {
            position: center,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        });
        ed.handle_pointer(PointerEvent::Up {
            position: center,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        });
        if let Element::Pad(p) = &ed.document.elements()[0] {
            assert_eq!(p.position, Point::ZERO);
        } else {
            unreachable!();
        }
        // Secondary button never reaches the tools
        ed.handle_pointer(PointerEvent::Down {
            position: center,
            button: PointerButton::Secondary,
            modifiers: Modifiers::NONE,
        });
        assert!(ed.transient().is_none());
    }

    #[test]
    fn test_tiny_trace_discarded() {
        let mut ed = editor();
        ed.snap_enabled = false;
        ed.set_tool(ToolKind::Trace);
        let history = ed.document.history_len();
        draw(&mut ed, Point::new(0.0, 0.0), Point::new(0.04, 0.0));
        assert!(ed.document.is_empty());
        assert_eq!(ed.document.history_len(), history);
    }

    #[test]
    fn test_trace_inherits_net_from_pad() {
        let mut ed = editor();
        let mut pad = Pad::new(Layer::Top, Point::new(5.0, 5.0), 1.5);
        pad.net = Some("VCC".into());
        ed.document.add(Element::Pad(pad));
        ed.commit();

        ed.set_tool(ToolKind::Trace);
        draw(&mut ed, Point::new(5.1, 5.1), Point::new(15.0, 5.0));
        let trace_net = ed
            .document
            .elements()
            .iter()
            .find_map(|e| match e {
                Element::Trace(t) => Some(t.net.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(trace_net.as_deref(), Some("VCC"));

        // Starting far from anything labeled yields no net
        draw(&mut ed, Point::new(40.0, 40.0), Point::new(50.0, 40.0));
        let far_net = ed
            .document
            .elements()
            .iter()
            .rev()
            .find_map(|e| match e {
                Element::Trace(t) => Some(t.net.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(far_net, None);
    }

    #[test]
    fn test_trace_inherits_net_from_via() {
        let mut ed = editor();
        let mut via = Via::new(Point::new(5.0, 5.0), 0.8, 0.4);
        via.net = Some("GND".into());
        ed.document.add(Element::Via(via));
        ed.commit();

        ed.set_tool(ToolKind::Trace);
        draw(&mut ed, Point::new(5.1, 5.1), Point::new(15.0, 5.0));
        let trace = ed
            .document
            .elements()
            .iter()
            .find_map(|e| match e {
                Element::Trace(t) => Some(t),
                _ => None,
            })
            .unwrap();
        // Snapped onto the via center and picked up its label
        assert_eq!(trace.points[0], Point::new(5.0, 5.0));
        assert_eq!(trace.net.as_deref(), Some("GND"));
    }

    #[test]
    fn test_assign_net_to_selected_via() {
        let mut ed = editor();
        let id = ed.document.add(Element::Via(Via::new(Point::ZERO, 0.8, 0.4)));
        ed.commit();
        ed.pointer_down(Point::ZERO, Modifiers::NONE);
        ed.pointer_up(Point::ZERO, Modifiers::NONE);
        ed.assign_net(Some("VBUS".into()));
        assert_eq!(ed.document.get(id).unwrap().net(), Some("VBUS"));
    }

    #[test]
    fn test_via_rejection_leaves_state_untouched() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Via);
        draw(&mut ed, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(ed.document.len(), 1);
        let history = ed.document.history_len();

        // 1mm away: edge gap 0.2mm < 0.3mm clearance
        draw(&mut ed, Point::new(1.0, 0.0), Point::new(1.0, 0.0));
        assert_eq!(ed.document.len(), 1);
        assert_eq!(ed.document.history_len(), history);
    }

    #[test]
    fn test_drag_moves_selection_one_history_step() {
        let mut ed = editor();
        ed.document
            .add(Element::Pad(Pad::new(Layer::Top, Point::new(5.0, 5.0), 1.5)));
        ed.commit();
        let history = ed.document.history_len();

        ed.pointer_down(Point::new(5.0, 5.0), Modifiers::NONE);
        ed.pointer_move(Point::new(8.2, 5.1), Modifiers::NONE);
        ed.pointer_up(Point::new(8.2, 5.1), Modifiers::NONE);

        if let Element::Pad(p) = &ed.document.elements()[0] {
            assert_eq!(p.position, Point::new(8.0, 5.0));
        } else {
            unreachable!();
        }
        assert_eq!(ed.document.history_len(), history + 1);

        ed.undo();
        if let Element::Pad(p) = &ed.document.elements()[0] {
            assert_eq!(p.position, Point::new(5.0, 5.0));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_via_drag_into_violation_reverts() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Via);
        draw(&mut ed, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        draw(&mut ed, Point::new(10.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(ed.document.len(), 2);

        ed.set_tool(ToolKind::Select);
        ed.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
        ed.pointer_move(Point::new(9.0, 0.0), Modifiers::NONE);
        ed.pointer_up(Point::new(9.0, 0.0), Modifiers::NONE);

        let positions: Vec<Point> = ed
            .document
            .elements()
            .iter()
            .map(|e| match e {
                Element::Via(v) => v.position,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(positions, vec![Point::ZERO, Point::new(10.0, 0.0)]);
    }

    #[test]
    fn test_undo_redo_round_trip_preserves_ids() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Pad);
        let n = 4;
        for i in 0..n {
            let p = Point::new(i as f64 * 10.0, 0.0);
            draw(&mut ed, p, p);
        }
        let ids: Vec<ElementId> = ed.document.elements().iter().map(|e| e.id()).collect();
        for _ in 0..n {
            ed.undo();
        }
        assert!(ed.document.is_empty());
        for _ in 0..n {
            ed.redo();
        }
        let restored: Vec<ElementId> = ed.document.elements().iter().map(|e| e.id()).collect();
        assert_eq!(restored, ids);
    }

    #[test]
    fn test_marquee_selects_contained_pads() {
        let mut ed = editor();
        ed.document
            .add(Element::Pad(Pad::new(Layer::Top, Point::new(5.0, 5.0), 1.5)));
        ed.document
            .add(Element::Pad(Pad::new(Layer::Top, Point::new(50.0, 50.0), 1.5)));
        ed.commit();

        ed.pointer_down(Point::new(-20.0, -20.0), Modifiers::NONE);
        ed.pointer_move(Point::new(10.0, 10.0), Modifiers::NONE);
        assert!(ed.marquee_rect().is_some());
        ed.pointer_up(Point::new(10.0, 10.0), Modifiers::NONE);
        assert_eq!(ed.selection.len(), 1);
    }

    #[test]
    fn test_escape_drops_transient_only() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Trace);
        ed.pointer_down(Point::new(0.0, 0.0), Modifiers::NONE);
        ed.pointer_move(Point::new(5.0, 0.0), Modifiers::NONE);
        assert!(ed.transient().is_some());
        let history = ed.document.history_len();
        ed.escape();
        assert!(ed.transient().is_none());
        assert_eq!(ed.document.history_len(), history);
        assert!(ed.document.is_empty());
    }

    #[test]
    fn test_assign_net_to_component_pad() {
        let mut ed = editor();
        ed.place_component("resistor-0805");
        assert_eq!(ed.document.len(), 1);

        // Pad 0 of the 0805 sits at (-1, 0)
        ed.pointer_down(Point::new(-1.0, 0.0), Modifiers::NONE);
        ed.pointer_up(Point::new(-1.0, 0.0), Modifiers::NONE);
        assert!(ed.selected_pad().is_some());
        ed.assign_net(Some("GND".into()));

        if let Element::Component(c) = &ed.document.elements()[0] {
            assert_eq!(c.pads[0].net.as_deref(), Some("GND"));
            assert_eq!(c.pads[1].net, None);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_rule_edit_reruns_drc() {
        let mut ed = editor();
        // High zoom keeps the snap radius below the trace spacing
        ed.camera.zoom = 40.0;
        ed.snap_enabled = false;
        ed.set_tool(ToolKind::Trace);
        draw(&mut ed, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        draw(&mut ed, Point::new(0.0, 0.4), Point::new(10.0, 0.4));
        assert!(!ed.violations().is_empty());
        ed.set_rule(RuleField::TraceClearance, 0.0);
        assert!(ed
            .violations()
            .iter()
            .all(|v| v.kind != crate::drc::RuleKind::TraceClearance));
    }

    #[test]
    fn test_snapshot_round_trip_through_editor() {
        let mut ed = editor();
        ed.set_tool(ToolKind::Pad);
        draw(&mut ed, Point::new(3.0, 3.0), Point::new(3.0, 3.0));
        ed.camera.offset = Vec2::new(12.0, -7.0);
        let snapshot = ed.snapshot();

        let mut other = Editor::new();
        other.apply_snapshot(snapshot);
        assert_eq!(other.document.len(), 1);
        assert_eq!(other.camera.offset, Vec2::new(12.0, -7.0));
        assert_eq!(other.camera.zoom, 10.0);
        // Loaded state is the history baseline: nothing to undo
        assert!(!other.document.can_undo());
    }

    #[test]
    fn test_delete_selection() {
        let mut ed = editor();
        let id = ed
            .document
            .add(Element::Pad(Pad::new(Layer::Top, Point::ZERO, 1.5)));
        ed.commit();
        ed.selection.insert(id);
        ed.delete_selection();
        assert!(ed.document.is_empty());
        ed.undo();
        assert_eq!(ed.document.len(), 1);
    }
}
