//! # Chips: reusable composite components
//!
//! A [`ChipDefinition`] is a frozen snapshot of a circuit: its boundary pins,
//! its component placements and its wires. Definitions are self-contained; a
//! placement of a nested chip carries that chip's definition inline.
//!
//! A [`Chip`] is one instance of a definition. It owns a private arena of
//! freshly built components and wires, so two chips built from the same
//! definition never share state. During evaluation the outer pass pushes
//! boundary inputs into the internal InputPins, runs the same evaluator over
//! the arena, and reads the internal OutputPins back out.
//!
//! ```rust
//! use gridlogic::{Circuit, Point};
//!
//! let mut circuit = Circuit::new();
//! circuit.add_component("InputPin", Point::new(40, 100));
//! circuit.add_component("NOT", Point::new(100, 100));
//! circuit.add_component("OutputPin", Point::new(160, 100));
//! circuit.add_wire(Point::new(50, 100), Point::new(80, 100));
//! circuit.add_wire(Point::new(120, 100), Point::new(150, 100));
//!
//! let def = circuit.create_chip("INV").unwrap();
//! assert_eq!(def.inputs.len(), 1);
//! assert_eq!(def.outputs[0].id, "out_0");
//! ```

use crate::component::{Component, ComponentKind, OutputPort};
use crate::config::SimConfig;
use crate::eval;
use crate::geometry::Point;
use crate::wire::{Wire, WireSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Hex-encoded BLAKE3 of a definition's JSON form.
pub type ChipHash = String;

/// One boundary pin of a chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSpec {
    pub id: String,
    pub label: String,
}

/// One internal component of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub x: i64,
    pub y: i64,
    /// Boundary pin id (InputPin/OutputPin placements).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Inline definition of a nested chip placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Box<ChipDefinition>>,
}

impl Placement {
    /// Snapshot a live component.
    pub fn capture(component: &Component) -> Self {
        let position = component.position();
        Placement {
            kind: component.kind(),
            x: position.x,
            y: position.y,
            id: component.pin_id().map(str::to_string),
            label: component.pin_label().map(str::to_string),
            definition: component
                .as_chip()
                .map(|chip| Box::new(chip.definition().clone())),
        }
    }

    /// Build a fresh component for this placement. `None` for a chip
    /// placement without its inline definition.
    pub fn build(&self) -> Option<Component> {
        let at = Point::new(self.x, self.y);
        if self.kind == ComponentKind::Chip {
            let def = self.definition.as_ref()?;
            return Some(Component::from_definition(Arc::new((**def).clone()), at));
        }
        let mut component = Component::new(self.kind, at)?;
        if let Some(id) = &self.id {
            component.set_pin_id(id);
        }
        if let Some(label) = &self.label {
            component.set_pin_label(label);
        }
        Some(component)
    }
}

/// A reusable chip: boundary pins plus the circuit behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipDefinition {
    pub name: String,
    pub inputs: Vec<PinSpec>,
    pub outputs: Vec<PinSpec>,
    pub components: Vec<Placement>,
    pub wires: Vec<WireSpec>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChipError {
    /// The circuit has no InputPin or OutputPin to expose.
    #[error("chip must have at least one input or output pin")]
    NoBoundaryPins,
    #[error("chip name must not be empty")]
    EmptyName,
    /// The name collides with a built-in component type.
    #[error("chip name `{0}` is reserved")]
    ReservedName(String),
    #[error("chip `{chip}` declares pin id `{id}` twice")]
    DuplicatePinId { chip: String, id: String },
    #[error("chip `{chip}` places a nested chip without its definition")]
    MissingNestedDefinition { chip: String },
    #[error("chip `{chip}` has a placement or wire outside the grid")]
    OutOfBounds { chip: String },
    /// The library already holds a different definition under this name.
    #[error("a different chip named `{0}` is already registered")]
    NameTaken(String),
}

impl ChipDefinition {
    /// Promote a live circuit into a definition.
    ///
    /// Boundary pins are renumbered in list order (`in_0`, `in_1`, ... and
    /// `out_0`, ...) on the live components themselves, so the live circuit
    /// and the definition agree on ids.
    pub fn promote(
        name: &str,
        components: &mut [Component],
        wires: &[Wire],
    ) -> Result<Self, ChipError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ChipError::EmptyName);
        }
        if ComponentKind::from_str(name).is_some() {
            return Err(ChipError::ReservedName(name.to_string()));
        }
        let has_boundary = components.iter().any(|c| {
            matches!(c.kind(), ComponentKind::InputPin | ComponentKind::OutputPin)
        });
        if !has_boundary {
            return Err(ChipError::NoBoundaryPins);
        }

        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for component in components.iter_mut() {
            let (list, prefix) = match component.kind() {
                ComponentKind::InputPin => (&mut inputs, "in"),
                ComponentKind::OutputPin => (&mut outputs, "out"),
                _ => continue,
            };
            let id = format!("{}_{}", prefix, list.len());
            component.set_pin_id(&id);
            list.push(PinSpec {
                id,
                label: component.pin_label().unwrap_or_default().to_string(),
            });
        }

        let definition = ChipDefinition {
            name: name.to_string(),
            inputs,
            outputs,
            components: components.iter().map(Placement::capture).collect(),
            wires: wires.iter().map(WireSpec::from).collect(),
        };
        debug!(
            chip = %definition.name,
            inputs = definition.inputs.len(),
            outputs = definition.outputs.len(),
            components = definition.components.len(),
            "promoted circuit to chip"
        );
        Ok(definition)
    }

    /// Check the structural invariants: a usable name, unique pin ids per
    /// list and inline definitions for every nested chip, recursively.
    pub fn validate(&self) -> Result<(), ChipError> {
        if self.name.trim().is_empty() {
            return Err(ChipError::EmptyName);
        }
        if ComponentKind::from_str(&self.name).is_some() {
            return Err(ChipError::ReservedName(self.name.clone()));
        }
        let in_bounds = self
            .components
            .iter()
            .map(|p| Point::new(p.x, p.y))
            .chain(self.wires.iter().flat_map(|w| [w.start(), w.end()]))
            .all(Point::in_bounds);
        if !in_bounds {
            return Err(ChipError::OutOfBounds {
                chip: self.name.clone(),
            });
        }
        for list in [&self.inputs, &self.outputs] {
            let mut seen = HashSet::new();
            for pin in list {
                if !seen.insert(pin.id.as_str()) {
                    return Err(ChipError::DuplicatePinId {
                        chip: self.name.clone(),
                        id: pin.id.clone(),
                    });
                }
            }
        }
        for placement in &self.components {
            if placement.kind != ComponentKind::Chip {
                continue;
            }
            match &placement.definition {
                Some(nested) => nested.validate()?,
                None => {
                    return Err(ChipError::MissingNestedDefinition {
                        chip: self.name.clone(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Content identity of the definition.
    pub fn hash(&self) -> ChipHash {
        // Struct fields serialize in declaration order, so the bytes are
        // stable for equal definitions.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(blake3::hash(&bytes).as_bytes())
    }

    /// Nesting depth: 1 for a chip made only of built-ins.
    pub fn depth(&self) -> usize {
        1 + self
            .components
            .iter()
            .filter_map(|p| p.definition.as_ref())
            .map(|d| d.depth())
            .max()
            .unwrap_or(0)
    }
}

/// A live chip instance with its own internal circuit.
#[derive(Debug, Clone)]
pub struct Chip {
    definition: Arc<ChipDefinition>,
    components: Vec<Component>,
    wires: Vec<Wire>,
}

impl Chip {
    pub fn instantiate(definition: Arc<ChipDefinition>) -> Self {
        let mut components = Vec::with_capacity(definition.components.len());
        for placement in &definition.components {
            match placement.build() {
                Some(component) => components.push(component),
                None => warn!(
                    chip = %definition.name,
                    kind = placement.kind.as_str(),
                    "skipping placement without a buildable definition"
                ),
            }
        }
        let wires = definition
            .wires
            .iter()
            .filter_map(|spec| Wire::new(spec.start(), spec.end()))
            .collect();
        Chip {
            definition,
            components,
            wires,
        }
    }

    pub fn definition(&self) -> &ChipDefinition {
        &self.definition
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub(crate) fn configure(&mut self, config: &SimConfig) {
        for component in &mut self.components {
            component.configure(config);
        }
    }

    /// Drive the internal InputPin whose id is `id`.
    pub fn set_input(&mut self, id: &str, value: bool) {
        if let Some(pin) = self
            .components
            .iter_mut()
            .find(|c| c.kind() == ComponentKind::InputPin && c.pin_id() == Some(id))
        {
            pin.set_value(value);
        }
    }

    pub fn reset_inputs(&mut self) {
        for component in &mut self.components {
            if component.kind() == ComponentKind::InputPin {
                component.set_value(false);
            }
        }
    }

    /// One pass of the evaluator over the internal circuit.
    pub fn evaluate_internal(&mut self) {
        eval::evaluate(&mut self.components, &mut self.wires);
    }

    /// Copy internal OutputPin values onto the exposed output pins.
    pub fn read_outputs(&self, outputs: &mut [OutputPort]) {
        for out in outputs {
            if let Some(value) = self
                .components
                .iter()
                .find(|c| c.kind() == ComponentKind::OutputPin && c.pin_id() == Some(out.id.as_str()))
                .and_then(Component::value)
            {
                out.value = value;
            }
        }
    }

    pub fn on_tick(&mut self, tick: u64) {
        for component in &mut self.components {
            component.on_tick(tick);
        }
    }
}
