//! # Components
//!
//! Every placeable part shares one contract, driven by the evaluator each
//! pass:
//!
//! 1. [`Component::reset_inputs`] clears inputs to their floating default,
//! 2. [`Component::set_input`] applies resolved node values by pin id,
//! 3. [`Component::compute`] turns the applied inputs into output values.
//!
//! The variant behavior lives in the closed [`Part`] enum, so each operation
//! is one exhaustive `match`. Output pins keep their value between passes;
//! that stored value is what seeds the next evaluation.

use crate::chip::{Chip, ChipDefinition};
use crate::config::SimConfig;
use crate::gate::GateOp;
use crate::geometry::{Point, GRID_SIZE, HALF_CELL};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default clock period in ticks.
pub const DEFAULT_CLOCK_FREQUENCY: u32 = 10;

/// Default number of ticks a pressed button stays high.
pub const DEFAULT_BUTTON_HOLD_TICKS: u32 = 12;

/// Type tag of a component, as it appears in saved circuits and definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "VCC")]
    Vcc,
    #[serde(rename = "GND")]
    Gnd,
    Clock,
    Switch,
    Button,
    #[serde(rename = "LED")]
    Led,
    Display,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "NOT")]
    Not,
    #[serde(rename = "NAND")]
    Nand,
    #[serde(rename = "NOR")]
    Nor,
    #[serde(rename = "XOR")]
    Xor,
    #[serde(rename = "XNOR")]
    Xnor,
    InputPin,
    OutputPin,
    /// A composite built from a [`ChipDefinition`]; never constructible from
    /// the tag alone.
    Chip,
}

impl ComponentKind {
    /// Every tag that [`Component::new`] can build.
    pub const BUILTIN: [ComponentKind; 16] = [
        ComponentKind::Vcc,
        ComponentKind::Gnd,
        ComponentKind::Clock,
        ComponentKind::Switch,
        ComponentKind::Button,
        ComponentKind::Led,
        ComponentKind::Display,
        ComponentKind::And,
        ComponentKind::Or,
        ComponentKind::Not,
        ComponentKind::Nand,
        ComponentKind::Nor,
        ComponentKind::Xor,
        ComponentKind::Xnor,
        ComponentKind::InputPin,
        ComponentKind::OutputPin,
    ];

    /// Parse a type tag from its saved name.
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "VCC" => Some(ComponentKind::Vcc),
            "GND" => Some(ComponentKind::Gnd),
            "Clock" => Some(ComponentKind::Clock),
            "Switch" => Some(ComponentKind::Switch),
            "Button" => Some(ComponentKind::Button),
            "LED" => Some(ComponentKind::Led),
            "Display" => Some(ComponentKind::Display),
            "AND" => Some(ComponentKind::And),
            "OR" => Some(ComponentKind::Or),
            "NOT" => Some(ComponentKind::Not),
            "NAND" => Some(ComponentKind::Nand),
            "NOR" => Some(ComponentKind::Nor),
            "XOR" => Some(ComponentKind::Xor),
            "XNOR" => Some(ComponentKind::Xnor),
            "InputPin" => Some(ComponentKind::InputPin),
            "OutputPin" => Some(ComponentKind::OutputPin),
            "Chip" => Some(ComponentKind::Chip),
            _ => None,
        }
    }

    /// Canonical saved name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Vcc => "VCC",
            ComponentKind::Gnd => "GND",
            ComponentKind::Clock => "Clock",
            ComponentKind::Switch => "Switch",
            ComponentKind::Button => "Button",
            ComponentKind::Led => "LED",
            ComponentKind::Display => "Display",
            ComponentKind::And => "AND",
            ComponentKind::Or => "OR",
            ComponentKind::Not => "NOT",
            ComponentKind::Nand => "NAND",
            ComponentKind::Nor => "NOR",
            ComponentKind::Xor => "XOR",
            ComponentKind::Xnor => "XNOR",
            ComponentKind::InputPin => "InputPin",
            ComponentKind::OutputPin => "OutputPin",
            ComponentKind::Chip => "Chip",
        }
    }

    fn gate_op(&self) -> Option<GateOp> {
        GateOp::ALL.into_iter().find(|op| op.as_str() == self.as_str())
    }
}

/// An input terminal, relative to the owning component's center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPort {
    pub id: String,
    pub offset: Point,
}

/// An output terminal. `value` is the only signal state a component persists
/// between passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPort {
    pub id: String,
    pub offset: Point,
    pub value: bool,
}

/// Per-variant state and behavior.
#[derive(Debug, Clone)]
pub enum Part {
    Vcc,
    Gnd,
    Clock { frequency: u32 },
    Switch { on: bool },
    Button { pressed: bool, remaining: u32, hold_ticks: u32 },
    Led { lit: bool },
    Display { segments: [bool; 4], value: bool },
    Gate { op: GateOp, a: bool, b: bool },
    Not { a: bool },
    InputPin { id: String, label: String, value: bool },
    OutputPin { id: String, label: String, value: bool },
    Chip(Box<Chip>),
}

/// A placed component.
#[derive(Debug, Clone)]
pub struct Component {
    position: Point,
    /// Footprint in grid cells.
    width: i64,
    height: i64,
    inputs: Vec<InputPort>,
    outputs: Vec<OutputPort>,
    /// Locked components cannot be moved or deleted (puzzle scaffolding).
    pub locked: bool,
    part: Part,
}

const DISPLAY_SEGMENTS: [&str; 4] = ["a", "b", "c", "d"];

fn input(id: &str, dx: i64, dy: i64) -> InputPort {
    InputPort {
        id: id.to_string(),
        offset: Point::half_cells(dx, dy),
    }
}

fn output(id: &str, dx: i64, dy: i64, value: bool) -> OutputPort {
    OutputPort {
        id: id.to_string(),
        offset: Point::half_cells(dx, dy),
        value,
    }
}

impl Component {
    /// Build a built-in component. Returns `None` for [`ComponentKind::Chip`],
    /// which needs a definition (see [`Component::from_definition`]).
    pub fn new(kind: ComponentKind, position: Point) -> Option<Self> {
        let (width, height, inputs, outputs, part) = match kind {
            ComponentKind::Vcc => (1, 1, vec![], vec![output("out", 0, 1, true)], Part::Vcc),
            ComponentKind::Gnd => (1, 1, vec![], vec![output("out", 0, -1, false)], Part::Gnd),
            ComponentKind::Clock => (
                2,
                2,
                vec![],
                vec![output("out", 2, 0, false)],
                Part::Clock {
                    frequency: DEFAULT_CLOCK_FREQUENCY,
                },
            ),
            ComponentKind::Switch => (
                2,
                1,
                vec![],
                vec![output("out", 2, 0, false)],
                Part::Switch { on: false },
            ),
            ComponentKind::Button => (
                2,
                2,
                vec![],
                vec![output("out", 2, 0, false)],
                Part::Button {
                    pressed: false,
                    remaining: 0,
                    hold_ticks: DEFAULT_BUTTON_HOLD_TICKS,
                },
            ),
            ComponentKind::Led => (1, 1, vec![input("in", 0, 1)], vec![], Part::Led { lit: false }),
            ComponentKind::Display => {
                let mut inputs: Vec<InputPort> = DISPLAY_SEGMENTS
                    .iter()
                    .zip([-3, -1, 1, 3])
                    .map(|(id, dy)| input(id, -3, dy))
                    .collect();
                inputs.push(input("val", -3, 0));
                (
                    3,
                    4,
                    inputs,
                    vec![],
                    Part::Display {
                        segments: [false; 4],
                        value: false,
                    },
                )
            }
            ComponentKind::And
            | ComponentKind::Or
            | ComponentKind::Xor
            | ComponentKind::Nand
            | ComponentKind::Nor
            | ComponentKind::Xnor => {
                let op = kind.gate_op()?;
                (
                    3,
                    2,
                    vec![input("a", -3, -1), input("b", -3, 1)],
                    vec![output("out", 3, 0, op.apply(false, false))],
                    Part::Gate { op, a: false, b: false },
                )
            }
            ComponentKind::Not => (
                2,
                1,
                vec![input("a", -2, 0)],
                vec![output("out", 2, 0, true)],
                Part::Not { a: false },
            ),
            ComponentKind::InputPin => (
                1,
                1,
                vec![],
                vec![output("out", 1, 0, false)],
                Part::InputPin {
                    id: String::new(),
                    label: "In".to_string(),
                    value: false,
                },
            ),
            ComponentKind::OutputPin => (
                1,
                1,
                vec![input("in", -1, 0)],
                vec![],
                Part::OutputPin {
                    id: String::new(),
                    label: "Out".to_string(),
                    value: false,
                },
            ),
            ComponentKind::Chip => return None,
        };
        Some(Component {
            position,
            width,
            height,
            inputs,
            outputs,
            locked: false,
            part,
        })
    }

    /// Instantiate a chip: a fresh private copy of the definition's circuit.
    ///
    /// Exposed pins sit on the left/right edges of a 4-cell-wide body whose
    /// height grows with the larger of the two pin lists.
    pub fn from_definition(definition: Arc<ChipDefinition>, position: Point) -> Self {
        let width = 4;
        let max_pins = definition.inputs.len().max(definition.outputs.len()) as i64;
        let height = (max_pins + 1).max(2);
        // Coordinates in units so odd heights still land on whole numbers.
        let left = -width * GRID_SIZE / 2;
        let right = width * GRID_SIZE / 2;
        let top = -height * GRID_SIZE / 2 + GRID_SIZE;
        let inputs = definition
            .inputs
            .iter()
            .enumerate()
            .map(|(i, spec)| InputPort {
                id: spec.id.clone(),
                offset: Point::new(left, top + i as i64 * GRID_SIZE),
            })
            .collect();
        let outputs = definition
            .outputs
            .iter()
            .enumerate()
            .map(|(i, spec)| OutputPort {
                id: spec.id.clone(),
                offset: Point::new(right, top + i as i64 * GRID_SIZE),
                value: false,
            })
            .collect();
        Component {
            position,
            width,
            height,
            inputs,
            outputs,
            locked: false,
            part: Part::Chip(Box::new(Chip::instantiate(definition))),
        }
    }

    /// Apply simulation settings (clock period, button hold), recursing into
    /// chip internals.
    pub fn configure(&mut self, config: &SimConfig) {
        match &mut self.part {
            Part::Clock { frequency } => *frequency = config.clock_frequency.max(1),
            Part::Button { hold_ticks, .. } => *hold_ticks = config.button_hold_ticks,
            Part::Chip(chip) => chip.configure(config),
            _ => {}
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match &self.part {
            Part::Vcc => ComponentKind::Vcc,
            Part::Gnd => ComponentKind::Gnd,
            Part::Clock { .. } => ComponentKind::Clock,
            Part::Switch { .. } => ComponentKind::Switch,
            Part::Button { .. } => ComponentKind::Button,
            Part::Led { .. } => ComponentKind::Led,
            Part::Display { .. } => ComponentKind::Display,
            Part::Gate { op, .. } => match op {
                GateOp::And => ComponentKind::And,
                GateOp::Or => ComponentKind::Or,
                GateOp::Xor => ComponentKind::Xor,
                GateOp::Nand => ComponentKind::Nand,
                GateOp::Nor => ComponentKind::Nor,
                GateOp::Xnor => ComponentKind::Xnor,
            },
            Part::Not { .. } => ComponentKind::Not,
            Part::InputPin { .. } => ComponentKind::InputPin,
            Part::OutputPin { .. } => ComponentKind::OutputPin,
            Part::Chip(_) => ComponentKind::Chip,
        }
    }

    /// The saved type name: the tag for built-ins, the definition name for
    /// chips.
    pub fn type_name(&self) -> &str {
        match &self.part {
            Part::Chip(chip) => &chip.definition().name,
            _ => self.kind().as_str(),
        }
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Footprint as `(width, height)` in grid cells.
    pub fn size(&self) -> (i64, i64) {
        (self.width, self.height)
    }

    pub fn hit_test(&self, point: Point) -> bool {
        let half_w = self.width * HALF_CELL;
        let half_h = self.height * HALF_CELL;
        point.x >= self.position.x - half_w
            && point.x <= self.position.x + half_w
            && point.y >= self.position.y - half_h
            && point.y <= self.position.y + half_h
    }

    pub fn inputs(&self) -> &[InputPort] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputPort] {
        &self.outputs
    }

    /// Absolute coordinates of the input pins, with their ids.
    pub fn input_points(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.inputs
            .iter()
            .map(move |p| (p.id.as_str(), self.position + p.offset))
    }

    /// Absolute coordinates of the output pins, with their current values.
    pub fn output_points(&self) -> impl Iterator<Item = (Point, bool)> + '_ {
        self.outputs
            .iter()
            .map(move |p| (self.position + p.offset, p.value))
    }

    /// Whether the user can drive this component directly.
    pub fn is_interactive(&self) -> bool {
        matches!(self.part, Part::Switch { .. } | Part::Button { .. })
    }

    /// Latched/lit state for switches and LEDs, as saved to disk.
    pub fn is_on(&self) -> Option<bool> {
        match &self.part {
            Part::Switch { on } => Some(*on),
            Part::Led { lit } => Some(*lit),
            _ => None,
        }
    }

    /// Restore a saved switch position. Other parts ignore it.
    pub fn set_on(&mut self, value: bool) {
        if let Part::Switch { on } = &mut self.part {
            *on = value;
            self.drive(value);
        }
    }

    pub fn reset_inputs(&mut self) {
        match &mut self.part {
            Part::Gate { a, b, .. } => {
                *a = false;
                *b = false;
            }
            Part::Not { a } => *a = false,
            Part::Led { lit } => *lit = false,
            Part::Display { segments, value } => {
                *segments = [false; 4];
                *value = false;
            }
            Part::OutputPin { value, .. } => *value = false,
            Part::Chip(chip) => chip.reset_inputs(),
            Part::Vcc
            | Part::Gnd
            | Part::Clock { .. }
            | Part::Switch { .. }
            | Part::Button { .. }
            | Part::InputPin { .. } => {}
        }
    }

    pub fn set_input(&mut self, id: &str, value: bool) {
        match &mut self.part {
            Part::Gate { a, b, .. } => match id {
                "a" => *a = value,
                "b" => *b = value,
                _ => {}
            },
            Part::Not { a } => {
                if id == "a" {
                    *a = value;
                }
            }
            Part::Led { lit } => {
                if id == "in" {
                    *lit = value;
                }
            }
            Part::Display { segments, value: shown } => {
                if id == "val" {
                    *shown = value;
                } else if let Some(idx) = DISPLAY_SEGMENTS.iter().position(|s| *s == id) {
                    segments[idx] = value;
                }
            }
            Part::OutputPin { value: stored, .. } => *stored = value,
            Part::Chip(chip) => chip.set_input(id, value),
            Part::Vcc
            | Part::Gnd
            | Part::Clock { .. }
            | Part::Switch { .. }
            | Part::Button { .. }
            | Part::InputPin { .. } => {}
        }
    }

    pub fn compute(&mut self) {
        match &mut self.part {
            Part::Vcc => self.drive(true),
            Part::Gnd => self.drive(false),
            // Clock output only moves in `on_tick`.
            Part::Clock { .. } => {}
            Part::Switch { on } => {
                let on = *on;
                self.drive(on);
            }
            Part::Button { pressed, .. } => {
                let pressed = *pressed;
                self.drive(pressed);
            }
            Part::InputPin { value, .. } => {
                let value = *value;
                self.drive(value);
            }
            Part::Gate { op, a, b } => {
                let out = op.apply(*a, *b);
                self.drive(out);
            }
            Part::Not { a } => {
                let out = !*a;
                self.drive(out);
            }
            Part::Chip(chip) => chip.read_outputs(&mut self.outputs),
            Part::Led { .. } | Part::Display { .. } | Part::OutputPin { .. } => {}
        }
    }

    /// Time-dependent update, run before the pass of each tick.
    pub fn on_tick(&mut self, tick: u64) {
        match &mut self.part {
            Part::Clock { frequency } => {
                let frequency = u64::from((*frequency).max(1));
                let high = tick % frequency < frequency / 2;
                self.drive(high);
            }
            Part::Button {
                pressed, remaining, ..
            } => {
                if *pressed {
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        *pressed = false;
                        self.drive(false);
                    }
                }
            }
            Part::Chip(chip) => chip.on_tick(tick),
            _ => {}
        }
    }

    /// Direct user interaction: flips a switch, presses a button.
    pub fn toggle(&mut self) {
        match &mut self.part {
            Part::Switch { on } => {
                *on = !*on;
                let on = *on;
                self.drive(on);
            }
            Part::Button {
                pressed,
                remaining,
                hold_ticks,
            } => {
                *pressed = true;
                *remaining = (*hold_ticks).max(1);
                self.drive(true);
            }
            _ => {}
        }
    }

    /// Let go of a momentary button.
    pub fn release(&mut self) {
        if let Part::Button {
            pressed, remaining, ..
        } = &mut self.part
        {
            *pressed = false;
            *remaining = 0;
            self.drive(false);
        }
    }

    /// Boundary pin id (InputPin/OutputPin only).
    pub fn pin_id(&self) -> Option<&str> {
        match &self.part {
            Part::InputPin { id, .. } | Part::OutputPin { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn pin_label(&self) -> Option<&str> {
        match &self.part {
            Part::InputPin { label, .. } | Part::OutputPin { label, .. } => Some(label),
            _ => None,
        }
    }

    pub fn set_pin_id(&mut self, new_id: &str) -> bool {
        match &mut self.part {
            Part::InputPin { id, .. } | Part::OutputPin { id, .. } => {
                *id = new_id.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_pin_label(&mut self, new_label: &str) -> bool {
        match &mut self.part {
            Part::InputPin { label, .. } | Part::OutputPin { label, .. } => {
                *label = new_label.to_string();
                true
            }
            _ => false,
        }
    }

    /// Drive a boundary InputPin to `value`. Takes effect on the outputs
    /// immediately, so the next pass seeds from it.
    pub fn set_value(&mut self, new_value: bool) {
        if let Part::InputPin { value, .. } = &mut self.part {
            *value = new_value;
            self.drive(new_value);
        }
    }

    /// The boundary value: assigned value of an InputPin, last applied
    /// input of an OutputPin.
    pub fn value(&self) -> Option<bool> {
        match &self.part {
            Part::InputPin { value, .. } | Part::OutputPin { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_chip(&self) -> Option<&Chip> {
        match &self.part {
            Part::Chip(chip) => Some(chip),
            _ => None,
        }
    }

    pub fn as_chip_mut(&mut self) -> Option<&mut Chip> {
        match &mut self.part {
            Part::Chip(chip) => Some(chip),
            _ => None,
        }
    }

    fn drive(&mut self, value: bool) {
        if let Some(out) = self.outputs.first_mut() {
            out.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(kind: ComponentKind) -> Component {
        Component::new(kind, Point::new(100, 100)).unwrap()
    }

    fn run(c: &mut Component, a: bool, b: bool) -> bool {
        c.reset_inputs();
        c.set_input("a", a);
        c.set_input("b", b);
        c.compute();
        c.outputs()[0].value
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ComponentKind::BUILTIN {
            assert_eq!(ComponentKind::from_str(kind.as_str()), Some(kind));
            let c = Component::new(kind, Point::default()).unwrap();
            assert_eq!(c.kind(), kind);
            assert_eq!(c.type_name(), kind.as_str());
        }
        assert_eq!(ComponentKind::from_str("Flux"), None);
        assert!(Component::new(ComponentKind::Chip, Point::default()).is_none());
    }

    #[test]
    fn gates_follow_their_table() {
        for (kind, op) in [
            (ComponentKind::And, GateOp::And),
            (ComponentKind::Or, GateOp::Or),
            (ComponentKind::Xor, GateOp::Xor),
            (ComponentKind::Nand, GateOp::Nand),
            (ComponentKind::Nor, GateOp::Nor),
            (ComponentKind::Xnor, GateOp::Xnor),
        ] {
            let mut c = gate(kind);
            for a in [false, true] {
                for b in [false, true] {
                    assert_eq!(run(&mut c, a, b), op.apply(a, b), "{} {} {}", kind.as_str(), a, b);
                }
            }
        }
        let mut not = gate(ComponentKind::Not);
        assert_eq!(run(&mut not, false, false), true);
        assert_eq!(run(&mut not, true, false), false);
    }

    #[test]
    fn inverted_gates_start_high() {
        assert!(gate(ComponentKind::Nand).outputs()[0].value);
        assert!(gate(ComponentKind::Not).outputs()[0].value);
        assert!(!gate(ComponentKind::And).outputs()[0].value);
    }

    #[test]
    fn pin_geometry_is_absolute() {
        let and = gate(ComponentKind::And);
        let inputs: Vec<_> = and.input_points().collect();
        assert_eq!(inputs, vec![("a", Point::new(70, 90)), ("b", Point::new(70, 110))]);
        let outputs: Vec<_> = and.output_points().collect();
        assert_eq!(outputs, vec![(Point::new(130, 100), false)]);
    }

    #[test]
    fn hit_test_uses_footprint() {
        let and = gate(ComponentKind::And);
        assert!(and.hit_test(Point::new(70, 80)));
        assert!(and.hit_test(Point::new(130, 120)));
        assert!(!and.hit_test(Point::new(131, 100)));
    }

    #[test]
    fn clock_waveform() {
        let mut clock = Component::new(ComponentKind::Clock, Point::default()).unwrap();
        let wave: Vec<bool> = (0..10)
            .map(|t| {
                clock.on_tick(t);
                clock.outputs()[0].value
            })
            .collect();
        assert_eq!(wave, [true, true, true, true, true, false, false, false, false, false]);
    }

    #[test]
    fn button_releases_after_hold() {
        let mut button = Component::new(ComponentKind::Button, Point::default()).unwrap();
        let config = SimConfig {
            button_hold_ticks: 2,
            ..SimConfig::default()
        };
        button.configure(&config);
        button.toggle();
        assert!(button.outputs()[0].value);
        button.on_tick(1);
        assert!(button.outputs()[0].value);
        button.on_tick(2);
        assert!(!button.outputs()[0].value);
    }

    #[test]
    fn switch_toggle_latches() {
        let mut switch = Component::new(ComponentKind::Switch, Point::default()).unwrap();
        assert!(switch.is_interactive());
        switch.toggle();
        switch.compute();
        assert_eq!(switch.is_on(), Some(true));
        assert!(switch.outputs()[0].value);
        switch.toggle();
        assert!(!switch.outputs()[0].value);
    }

    #[test]
    fn boundary_pins_carry_values() {
        let mut pin = Component::new(ComponentKind::InputPin, Point::default()).unwrap();
        assert!(pin.set_pin_id("A"));
        pin.set_value(true);
        assert_eq!(pin.pin_id(), Some("A"));
        assert!(pin.outputs()[0].value);
        pin.reset_inputs();
        pin.compute();
        assert_eq!(pin.value(), Some(true));

        let mut out = Component::new(ComponentKind::OutputPin, Point::default()).unwrap();
        out.set_input("in", true);
        assert_eq!(out.value(), Some(true));
        out.reset_inputs();
        assert_eq!(out.value(), Some(false));
    }

    #[test]
    fn display_stores_segments() {
        let mut display = Component::new(ComponentKind::Display, Point::default()).unwrap();
        assert_eq!(display.inputs().len(), 5);
        display.set_input("b", true);
        display.set_input("val", true);
        match display.part() {
            Part::Display { segments, value } => {
                assert_eq!(*segments, [false, true, false, false]);
                assert!(*value);
            }
            other => panic!("unexpected part {:?}", other),
        }
    }
}
