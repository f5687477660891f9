//! Net tagging: free-form string labels on traces, pads, vias, and
//! component pads. No registry, no propagation; equality is by value.

use crate::element::{Element, ElementId};

/// A single pad on a placed component, captured at selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadRef {
    pub component: ElementId,
    pub pad_index: usize,
}

/// Assign a net to one pad of a component. Returns false when the
/// reference no longer resolves.
pub fn assign_to_pad(elements: &mut [Element], pad_ref: PadRef, net: Option<String>) -> bool {
    for element in elements.iter_mut() {
        if let Element::Component(c) = element {
            if c.id == pad_ref.component {
                if let Some(pad) = c.pads.get_mut(pad_ref.pad_index) {
                    pad.net = net;
                    return true;
                }
                return false;
            }
        }
    }
    false
}

/// Assign a net to a standalone element. Returns false when the element
/// is missing or its kind carries no net.
pub fn assign_to_element(elements: &mut [Element], id: ElementId, net: Option<String>) -> bool {
    elements
        .iter_mut()
        .find(|e| e.id() == id)
        .map_or(false, |e| e.set_net(net))
}

/// Ids of every element carrying `net` (component pads count for the
/// owning component).
pub fn members<'a>(elements: &'a [Element], net: &str) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| e.carries_net(net))
        .map(|e| e.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ComponentInstance, Layer, PadInstance, Trace};
    use kurbo::Point;
    use uuid::Uuid;

    fn component() -> ComponentInstance {
        ComponentInstance {
            id: Uuid::new_v4(),
            footprint: "resistor-0805".into(),
            layer: Layer::Top,
            position: Point::ZERO,
            rotation: 0.0,
            pads: vec![
                PadInstance {
                    offset: Point::new(-1.0, 0.0),
                    width: 1.2,
                    height: 1.4,
                    hole: None,
                    net: None,
                },
                PadInstance {
                    offset: Point::new(1.0, 0.0),
                    width: 1.2,
                    height: 1.4,
                    hole: None,
                    net: None,
                },
            ],
            silk: Vec::new(),
        }
    }

    #[test]
    fn test_assign_to_single_pad() {
        let comp = component();
        let id = comp.id;
        let mut elements = vec![Element::Component(comp)];
        assert!(assign_to_pad(
            &mut elements,
            PadRef {
                component: id,
                pad_index: 1
            },
            Some("GND".into()),
        ));
        if let Element::Component(c) = &elements[0] {
            assert_eq!(c.pads[0].net, None);
            assert_eq!(c.pads[1].net.as_deref(), Some("GND"));
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_assign_out_of_range_pad_fails() {
        let comp = component();
        let id = comp.id;
        let mut elements = vec![Element::Component(comp)];
        assert!(!assign_to_pad(
            &mut elements,
            PadRef {
                component: id,
                pad_index: 7
            },
            Some("GND".into()),
        ));
    }

    #[test]
    fn test_members_includes_component_with_matching_pad() {
        let mut comp = component();
        comp.pads[0].net = Some("VCC".into());
        let comp_id = comp.id;
        let mut trace = Trace::new(Layer::Top, 0.3, vec![Point::ZERO, Point::new(5.0, 0.0)]);
        trace.net = Some("VCC".into());
        let trace_id = trace.id;
        let elements = vec![Element::Component(comp), Element::Trace(trace)];
        let m = members(&elements, "VCC");
        assert_eq!(m, vec![comp_id, trace_id]);
        assert!(members(&elements, "GND").is_empty());
    }
}
