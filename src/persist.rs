//! JSON save/load of a whole circuit.
//!
//! ```json
//! {
//!   "components": [{ "type": "Switch", "x": 100, "y": 100, "state": { "isOn": true } }],
//!   "wires": [{ "x1": 120, "y1": 100, "x2": 200, "y2": 110 }],
//!   "chips": [ ...chip definitions... ]
//! }
//! ```
//!
//! Coordinates are read as numbers and snapped to the grid. Loading builds a
//! staging circuit first; the live circuit is only replaced when the whole
//! document was understood.

use crate::chip::{ChipDefinition, ChipError};
use crate::circuit::Circuit;
use crate::geometry::{Point, MAX_COORDINATE};
use crate::wire::WireSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedCircuit {
    #[serde(default)]
    pub components: Vec<SavedComponent>,
    #[serde(default)]
    pub wires: Vec<SavedWire>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chips: Vec<ChipDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedComponent {
    /// Built-in tag or chip definition name.
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "SavedState::is_empty")]
    pub state: SavedState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SavedState {
    fn is_empty(&self) -> bool {
        self.is_on.is_none() && self.id.is_none() && self.label.is_none() && !self.locked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedWire {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<WireSpec> for SavedWire {
    fn from(spec: WireSpec) -> Self {
        SavedWire {
            x1: spec.x1 as f64,
            y1: spec.y1 as f64,
            x2: spec.x2 as f64,
            y2: spec.y2 as f64,
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed circuit JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid chip in saved circuit: {0}")]
    Chip(#[from] ChipError),
    #[error("coordinate ({x}, {y}) is outside the grid")]
    CoordinateOutOfRange { x: f64, y: f64 },
}

fn checked_point(x: f64, y: f64) -> Result<Point, PersistError> {
    let in_range = |v: f64| v.is_finite() && v.abs() <= MAX_COORDINATE as f64;
    if in_range(x) && in_range(y) {
        Ok(Point::snapped(x, y))
    } else {
        Err(PersistError::CoordinateOutOfRange { x, y })
    }
}

/// Counts from a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub components: usize,
    pub wires: usize,
    /// Entries dropped for an unknown type or a degenerate wire.
    pub skipped: usize,
}

impl Circuit {
    /// Capture the circuit, including every chip definition it can place.
    pub fn to_saved(&self) -> SavedCircuit {
        let mut chips: BTreeMap<String, ChipDefinition> = self
            .chip_library()
            .map(|def| (def.name.clone(), def.clone()))
            .collect();
        for chip in self.components().iter().filter_map(|c| c.as_chip()) {
            let def = chip.definition();
            chips
                .entry(def.name.clone())
                .or_insert_with(|| def.clone());
        }

        let components = self
            .components()
            .iter()
            .map(|c| {
                let at = c.position();
                SavedComponent {
                    kind: c.type_name().to_string(),
                    x: at.x as f64,
                    y: at.y as f64,
                    state: SavedState {
                        is_on: c.is_on(),
                        id: c.pin_id().map(str::to_string),
                        label: c.pin_label().map(str::to_string),
                        locked: c.locked,
                    },
                }
            })
            .collect();
        let wires = self
            .wires()
            .iter()
            .map(|w| SavedWire::from(WireSpec::from(w)))
            .collect();
        SavedCircuit {
            components,
            wires,
            chips: chips.into_values().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(&self.to_saved())?)
    }

    /// Replace the circuit with a saved one. On error nothing changes.
    pub fn load_saved(&mut self, saved: SavedCircuit) -> Result<LoadSummary, PersistError> {
        let mut staging = Circuit::with_config(self.config().clone());
        for def in saved.chips {
            staging.register_chip(def)?;
        }
        // The file's definitions win over same-named library entries.
        for def in self.chip_library() {
            if staging.chip(&def.name).is_none() {
                staging.register_chip(def.clone())?;
            } else if staging.chip(&def.name) != Some(def) {
                debug!(chip = %def.name, "saved definition replaces library entry");
            }
        }

        let mut summary = LoadSummary::default();
        for entry in &saved.components {
            let at = checked_point(entry.x, entry.y)?;
            let Some(mut component) = staging.build_component(&entry.kind, at) else {
                summary.skipped += 1;
                continue;
            };
            if let Some(on) = entry.state.is_on {
                component.set_on(on);
            }
            if let Some(id) = &entry.state.id {
                component.set_pin_id(id);
            }
            if let Some(label) = &entry.state.label {
                component.set_pin_label(label);
            }
            component.locked = entry.state.locked;
            staging.push_component(component);
            summary.components += 1;
        }
        for wire in &saved.wires {
            let start = checked_point(wire.x1, wire.y1)?;
            let end = checked_point(wire.x2, wire.y2)?;
            if staging.push_wire(start, end) {
                summary.wires += 1;
            } else {
                warn!(%start, %end, "skipping degenerate wire");
                summary.skipped += 1;
            }
        }

        self.replace_contents(staging);
        self.update();
        debug!(
            components = summary.components,
            wires = summary.wires,
            skipped = summary.skipped,
            "loaded circuit"
        );
        Ok(summary)
    }

    pub fn load_json(&mut self, text: &str) -> Result<LoadSummary, PersistError> {
        let saved: SavedCircuit = serde_json::from_str(text)?;
        self.load_saved(saved)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        let text = self.to_json()?;
        fs::write(path, text).map_err(|source| PersistError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load_from(&mut self, path: &Path) -> Result<LoadSummary, PersistError> {
        let text = fs::read_to_string(path).map_err(|source| PersistError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn p(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    fn lamp_circuit() -> Circuit {
        let mut c = Circuit::new();
        c.add_component("Switch", p(100, 100));
        c.add_component("LED", p(200, 100));
        c.add_wire(p(120, 100), p(200, 110));
        c.toggle_at(p(100, 100));
        c
    }

    #[test]
    fn round_trip_restores_state() {
        let original = lamp_circuit();
        let text = original.to_json().unwrap();
        assert!(text.contains("\"isOn\": true"));

        let mut restored = Circuit::new();
        let summary = restored.load_json(&text).unwrap();
        assert_eq!(summary, LoadSummary { components: 2, wires: 1, skipped: 0 });
        assert_eq!(restored.components()[0].is_on(), Some(true));
        assert_eq!(restored.components()[1].is_on(), Some(true));
        assert!(restored.wires()[0].state);
        assert_eq!(restored.to_saved(), original.to_saved());
    }

    #[test]
    fn malformed_input_leaves_circuit_untouched() {
        let mut c = lamp_circuit();
        let before = c.to_saved();
        assert!(matches!(c.load_json("{\"components\": 7}"), Err(PersistError::Json(_))));
        assert!(c.load_json("not json").is_err());
        assert_eq!(c.to_saved(), before);

        // A bad chip definition aborts the load as well.
        let bad = r#"{"components": [], "wires": [], "chips": [
            {"name": "AND", "inputs": [], "outputs": [], "components": [], "wires": []}
        ]}"#;
        assert!(matches!(c.load_json(bad), Err(PersistError::Chip(_))));
        assert_eq!(c.to_saved(), before);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut c = lamp_circuit();
        let before = c.to_saved();
        for text in [
            r#"{"components": [{"type": "AND", "x": 1e30, "y": 0}], "wires": []}"#,
            r#"{"components": [{"type": "LED", "x": 0, "y": -2e9}], "wires": []}"#,
            r#"{"components": [], "wires": [{"x1": 0, "y1": 0, "x2": 9.3e18, "y2": 0}]}"#,
        ] {
            assert!(matches!(
                c.load_json(text),
                Err(PersistError::CoordinateOutOfRange { .. })
            ));
            assert_eq!(c.to_saved(), before);
        }
        assert!(c.load_json(r#"{"components": [{"type": "AND", "x": 1e9, "y": -1e9}]}"#).is_ok());
        assert_eq!(c.components()[0].position(), p(1_000_000_000, -1_000_000_000));
    }

    #[test]
    fn placed_chips_reload_with_their_own_definition() {
        let mut inner = Circuit::new();
        inner.add_component("InputPin", p(40, 100));
        inner.add_component("NOT", p(100, 100));
        inner.add_component("OutputPin", p(160, 100));
        inner.add_wire(p(50, 100), p(80, 100));
        inner.add_wire(p(120, 100), p(150, 100));
        let inv = inner.create_chip("X").unwrap();

        let mut buf_src = Circuit::new();
        buf_src.add_component("InputPin", p(0, 0));
        buf_src.add_component("OutputPin", p(40, 0));
        buf_src.add_wire(p(10, 0), p(30, 0));
        let buf = buf_src.create_chip("X").unwrap();

        let mut c = Circuit::new();
        c.register_chip(inv.clone()).unwrap();
        c.add_component("X", p(200, 200));
        assert!(c.register_chip(buf.clone()).is_err());
        assert!(c.components()[0].outputs()[0].value);

        let text = c.to_json().unwrap();
        let mut restored = Circuit::new();
        restored.load_json(&text).unwrap();
        assert!(restored.components()[0].outputs()[0].value);

        // A target whose library binds the name differently takes the
        // file's definition.
        let mut other = Circuit::new();
        other.register_chip(buf).unwrap();
        other.load_json(&text).unwrap();
        assert_eq!(other.chip("X"), Some(&inv));
        assert!(other.components()[0].outputs()[0].value);
    }

    #[test]
    fn fractional_coordinates_snap_and_unknowns_skip() {
        let text = r#"{
            "components": [
                {"type": "VCC", "x": 99.6, "y": 90.2},
                {"type": "Teleporter", "x": 0, "y": 0},
                {"type": "LED", "x": 100, "y": 130}
            ],
            "wires": [
                {"x1": 100, "y1": 100.4, "x2": 100, "y2": 140},
                {"x1": 5, "y1": 5, "x2": 5, "y2": 5}
            ]
        }"#;
        let mut c = Circuit::new();
        let summary = c.load_json(text).unwrap();
        assert_eq!(summary, LoadSummary { components: 2, wires: 1, skipped: 2 });
        assert_eq!(c.components()[0].position(), p(100, 90));
        assert_eq!(c.components()[1].is_on(), Some(true));
    }

    #[test]
    fn pins_and_chips_survive_a_file_round_trip() {
        let mut inner = Circuit::new();
        inner.add_component("InputPin", p(40, 100));
        inner.add_component("NOT", p(100, 100));
        inner.add_component("OutputPin", p(160, 100));
        inner.add_wire(p(50, 100), p(80, 100));
        inner.add_wire(p(120, 100), p(150, 100));
        let inv = inner.create_chip("INV").unwrap();

        let mut c = Circuit::new();
        c.register_chip(inv.clone()).unwrap();
        let a = c.add_component("InputPin", p(100, 200)).unwrap();
        c.name_pin(a, "A");
        c.set_locked(a, true);
        c.add_component("INV", p(200, 200));

        let dir = tempdir().unwrap();
        let path = dir.path().join("circuit.json");
        c.save_to(&path).unwrap();

        let mut restored = Circuit::new();
        restored.load_from(&path).unwrap();
        assert_eq!(restored.chip("INV"), Some(&inv));
        let pin = &restored.components()[0];
        assert_eq!(pin.pin_id(), Some("A"));
        assert!(pin.locked);
        assert_eq!(restored.components()[1].type_name(), "INV");
        // The inverter's output is high with its input floating.
        assert!(restored.components()[1].outputs()[0].value);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let mut c = Circuit::new();
        let err = c.load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
