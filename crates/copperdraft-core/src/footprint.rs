//! Static footprint library.
//!
//! Footprints are immutable templates. Placing one clones its pads into a
//! `ComponentInstance` so per-instance edits (nets) never touch the template.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A pad template: offset from the footprint origin, size, optional drill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintPad {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub hole: Option<f64>,
}

/// Silkscreen geometry, in footprint-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SilkShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    /// Filled dot, used for pin-1 markers.
    Dot {
        x: f64,
        y: f64,
        radius: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FootprintDef {
    pub name: &'static str,
    pub pads: Vec<FootprintPad>,
    pub silk: Vec<SilkShape>,
}

const fn smd(x: f64, y: f64, width: f64, height: f64) -> FootprintPad {
    FootprintPad {
        x,
        y,
        width,
        height,
        hole: None,
    }
}

const fn th(x: f64, y: f64, width: f64, height: f64, hole: f64) -> FootprintPad {
    FootprintPad {
        x,
        y,
        width,
        height,
        hole: Some(hole),
    }
}

fn build_library() -> BTreeMap<&'static str, FootprintDef> {
    use SilkShape::*;
    let mut lib = BTreeMap::new();

    lib.insert(
        "resistor-0805",
        FootprintDef {
            name: "Resistor 0805",
            pads: vec![smd(-1.0, 0.0, 1.2, 1.4), smd(1.0, 0.0, 1.2, 1.4)],
            silk: vec![Rect {
                x: -0.5,
                y: -0.6,
                width: 1.0,
                height: 1.2,
            }],
        },
    );
    lib.insert(
        "resistor-1206",
        FootprintDef {
            name: "Resistor 1206",
            pads: vec![smd(-1.5, 0.0, 1.4, 1.7), smd(1.5, 0.0, 1.4, 1.7)],
            silk: vec![Rect {
                x: -1.0,
                y: -0.8,
                width: 2.0,
                height: 1.6,
            }],
        },
    );
    lib.insert(
        "cap-0805",
        FootprintDef {
            name: "Capacitor 0805",
            pads: vec![smd(-1.0, 0.0, 1.2, 1.4), smd(1.0, 0.0, 1.2, 1.4)],
            silk: vec![Rect {
                x: -0.5,
                y: -0.6,
                width: 1.0,
                height: 1.2,
            }],
        },
    );
    lib.insert(
        "led-0805",
        FootprintDef {
            name: "LED 0805",
            pads: vec![smd(-1.0, 0.0, 1.2, 1.4), smd(1.0, 0.0, 1.2, 1.4)],
            silk: vec![
                Rect {
                    x: -0.5,
                    y: -0.6,
                    width: 1.0,
                    height: 1.2,
                },
                Line {
                    x1: 0.3,
                    y1: -0.6,
                    x2: 0.3,
                    y2: 0.6,
                },
            ],
        },
    );
    lib.insert(
        "diode-sod123",
        FootprintDef {
            name: "Diode SOD-123",
            pads: vec![smd(-1.0, 0.0, 1.2, 1.4), smd(1.0, 0.0, 1.2, 1.4)],
            silk: vec![
                Rect {
                    x: -0.5,
                    y: -0.6,
                    width: 1.0,
                    height: 1.2,
                },
                Line {
                    x1: 0.2,
                    y1: -0.6,
                    x2: 0.2,
                    y2: 0.6,
                },
            ],
        },
    );
    lib.insert(
        "dip-8",
        FootprintDef {
            name: "DIP-8",
            pads: vec![
                th(-3.81, -7.62, 1.5, 1.5, 0.8),
                th(-1.27, -7.62, 1.5, 1.5, 0.8),
                th(1.27, -7.62, 1.5, 1.5, 0.8),
                th(3.81, -7.62, 1.5, 1.5, 0.8),
                th(3.81, 7.62, 1.5, 1.5, 0.8),
                th(1.27, 7.62, 1.5, 1.5, 0.8),
                th(-1.27, 7.62, 1.5, 1.5, 0.8),
                th(-3.81, 7.62, 1.5, 1.5, 0.8),
            ],
            silk: vec![
                Rect {
                    x: -5.0,
                    y: -9.0,
                    width: 10.0,
                    height: 18.0,
                },
                Dot {
                    x: -3.5,
                    y: -8.0,
                    radius: 0.8,
                },
            ],
        },
    );
    lib.insert(
        "soic-8",
        FootprintDef {
            name: "SOIC-8",
            pads: vec![
                smd(-2.7, -1.905, 1.5, 0.6),
                smd(-2.7, -0.635, 1.5, 0.6),
                smd(-2.7, 0.635, 1.5, 0.6),
                smd(-2.7, 1.905, 1.5, 0.6),
                smd(2.7, 1.905, 1.5, 0.6),
                smd(2.7, 0.635, 1.5, 0.6),
                smd(2.7, -0.635, 1.5, 0.6),
                smd(2.7, -1.905, 1.5, 0.6),
            ],
            silk: vec![
                Rect {
                    x: -2.0,
                    y: -2.5,
                    width: 4.0,
                    height: 5.0,
                },
                Circle {
                    x: -1.5,
                    y: -2.2,
                    radius: 0.3,
                },
            ],
        },
    );
    lib.insert(
        "transistor-sot23",
        FootprintDef {
            name: "Transistor SOT-23",
            pads: vec![
                smd(-0.95, -0.65, 0.6, 0.6),
                smd(-0.95, 0.65, 0.6, 0.6),
                smd(0.95, 0.0, 0.6, 0.6),
            ],
            silk: vec![Rect {
                x: -1.5,
                y: -1.0,
                width: 3.0,
                height: 2.0,
            }],
        },
    );
    lib.insert(
        "header-1x2",
        FootprintDef {
            name: "Header 1x2",
            pads: vec![th(0.0, -1.27, 1.5, 1.5, 1.0), th(0.0, 1.27, 1.5, 1.5, 1.0)],
            silk: vec![Rect {
                x: -1.27,
                y: -2.54,
                width: 2.54,
                height: 5.08,
            }],
        },
    );
    lib.insert(
        "usb-c",
        FootprintDef {
            name: "USB Type-C",
            pads: vec![
                smd(-3.2, 0.0, 0.6, 1.15),
                smd(-2.4, 0.0, 0.3, 0.7),
                smd(-1.6, 0.0, 0.3, 0.7),
                smd(-0.8, 0.0, 0.3, 0.7),
                smd(0.0, 0.0, 0.3, 0.7),
                smd(0.8, 0.0, 0.3, 0.7),
                smd(1.6, 0.0, 0.3, 0.7),
                smd(2.4, 0.0, 0.3, 0.7),
                smd(3.2, 0.0, 0.6, 1.15),
            ],
            silk: vec![Rect {
                x: -4.5,
                y: -3.5,
                width: 9.0,
                height: 7.0,
            }],
        },
    );

    lib
}

fn library() -> &'static BTreeMap<&'static str, FootprintDef> {
    static LIBRARY: OnceLock<BTreeMap<&'static str, FootprintDef>> = OnceLock::new();
    LIBRARY.get_or_init(build_library)
}

/// Look up a footprint by id.
pub fn get(id: &str) -> Option<&'static FootprintDef> {
    library().get(id)
}

/// All footprint ids, sorted.
pub fn ids() -> impl Iterator<Item = &'static str> {
    library().keys().copied()
}
