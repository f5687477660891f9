//! The board document: the element collection plus its undo history.
//!
//! Elements keep insertion order, which doubles as z-order (later wins).

use kurbo::{Point, Rect};

use crate::element::{Element, ElementId};
use crate::geometry;
use crate::history::History;

#[derive(Debug, Clone)]
pub struct BoardDocument {
    elements: Vec<Element>,
    history: History,
}

impl Default for BoardDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardDocument {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            history: History::new(Vec::new()),
        }
    }

    /// Build a document from loaded elements; the loaded state is the
    /// initial history snapshot.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let history = History::new(elements.clone());
        Self { elements, history }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Append an element on top. Does not push history; call [`commit`]
    /// once the action is complete.
    ///
    /// [`commit`]: BoardDocument::commit
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.elements.push(element);
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(idx))
    }

    pub fn retain(&mut self, keep: impl FnMut(&Element) -> bool) {
        self.elements.retain(keep);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Replace the entire element collection (used by drag rollback).
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Mutable access for bulk edits within a single gesture.
    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Topmost element under `point`: the collection is scanned in reverse
    /// so the most recently added hit wins.
    pub fn element_at(&self, point: Point, tol: f64) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.hit_test(point, tol))
    }

    /// Every element intersecting the marquee rectangle. Compact elements
    /// (pads, vias, components, text) test by bounding box; stroked
    /// elements test each segment against the rectangle.
    pub fn elements_in_rect(&self, rect: Rect) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| match e {
            Element::Trace(t) => t
                .segments()
                .any(|(a, b)| geometry::segment_rect_distance(a, b, rect) <= t.width / 2.0),
            Element::Outline(o) => {
                geometry::segment_rect_distance(o.start, o.end, rect) <= o.width / 2.0
            }
            Element::Measurement(m) => {
                geometry::segment_rect_distance(m.start, m.end, rect) == 0.0
            }
            other => geometry::rects_overlap(other.bounds(), rect),
        })
    }

    /// Union of all element bounds; `None` for an empty board.
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.elements.iter().map(|e| e.bounds());
        let first = iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    /// Push the current state onto the history stack. One call per
    /// completed user action.
    pub fn commit(&mut self) {
        self.history.commit(&self.elements);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous snapshot. Returns false at the bottom of the
    /// stack.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.elements = snapshot.to_vec();
                true
            }
            None => false,
        }
    }

    /// Restore the next snapshot. Returns false at the tip.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.elements = snapshot.to_vec();
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Layer, Pad, Trace, Via};

    #[test]
    fn test_topmost_hit_wins() {
        let mut doc = BoardDocument::new();
        let below = doc.add(Element::Pad(Pad::new(Layer::Top, Point::ZERO, 2.0)));
        let above = doc.add(Element::Pad(Pad::new(Layer::Top, Point::ZERO, 2.0)));
        let hit = doc.element_at(Point::ZERO, 0.1).map(|e| e.id());
        assert_eq!(hit, Some(above));
        assert_ne!(hit, Some(below));
    }

    #[test]
    fn test_marquee_selects_pad_by_center() {
        let mut doc = BoardDocument::new();
        let inside = doc.add(Element::Pad(Pad::new(Layer::Top, Point::new(5.0, 5.0), 1.5)));
        doc.add(Element::Pad(Pad::new(Layer::Top, Point::new(50.0, 50.0), 1.5)));
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hits: Vec<_> = doc.elements_in_rect(rect).map(|e| e.id()).collect();
        assert_eq!(hits, vec![inside]);
    }

    #[test]
    fn test_marquee_catches_trace_crossing() {
        let mut doc = BoardDocument::new();
        let id = doc.add(Element::Trace(Trace::new(
            Layer::Top,
            0.3,
            vec![Point::new(-20.0, 5.0), Point::new(20.0, 5.0)],
        )));
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let hits: Vec<_> = doc.elements_in_rect(rect).map(|e| e.id()).collect();
        assert_eq!(hits, vec![id]);
    }

    #[test]
    fn test_undo_restores_elements_with_same_ids() {
        let mut doc = BoardDocument::new();
        let id = doc.add(Element::Via(Via::new(Point::ZERO, 0.8, 0.4)));
        doc.commit();
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(doc.redo());
        assert_eq!(doc.elements()[0].id(), id);
    }
}
