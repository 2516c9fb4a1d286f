//! # Circuit: the editable surface
//!
//! [`Circuit`] exclusively owns the live component and wire lists, the chip
//! library, the tick counter and the active puzzle. Every edit goes through
//! its API and ends with a settled [`Circuit::update`], so readers never see
//! a partially applied state. [`Circuit::tick`] is the discrete time step:
//! time-dependent parts advance, then exactly one evaluation pass runs.
//!
//! ```rust
//! use gridlogic::{Circuit, Point};
//!
//! let mut circuit = Circuit::new();
//! let and = circuit.add_component("AND", Point::new(100, 100)).unwrap();
//! let a = circuit.add_component("InputPin", Point::new(40, 100)).unwrap();
//! let b = circuit.add_component("InputPin", Point::new(40, 140)).unwrap();
//! let q = circuit.add_component("OutputPin", Point::new(160, 100)).unwrap();
//! circuit.name_pin(a, "A");
//! circuit.name_pin(b, "B");
//! circuit.name_pin(q, "Q");
//! circuit.add_wire(Point::new(50, 100), Point::new(70, 90));
//! circuit.add_wire(Point::new(50, 140), Point::new(70, 110));
//! circuit.add_wire(Point::new(130, 100), Point::new(150, 100));
//!
//! circuit.set_pin_value("A", true);
//! circuit.set_pin_value("B", true);
//! circuit.update();
//! assert!(circuit.output_value("Q"));
//! # let _ = and;
//! ```

use crate::chip::{ChipDefinition, ChipError};
use crate::component::{Component, ComponentKind};
use crate::config::SimConfig;
use crate::eval::{self, Settle};
use crate::geometry::Point;
use crate::puzzle::{CheckReport, Puzzle};
use crate::wire::Wire;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One editable circuit with its simulation state.
#[derive(Debug, Clone)]
pub struct Circuit {
    components: Vec<Component>,
    wires: Vec<Wire>,
    config: SimConfig,
    running: bool,
    tick_count: u64,
    chips: BTreeMap<String, Arc<ChipDefinition>>,
    current_puzzle: Option<Puzzle>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Circuit {
            components: Vec::new(),
            wires: Vec::new(),
            config,
            running: false,
            tick_count: 0,
            chips: BTreeMap::new(),
            current_puzzle: None,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    // ---- editing -------------------------------------------------------

    /// Build a component by type name without placing it. Library chips
    /// shadow nothing built in (their names are checked at promotion), but
    /// are looked up first.
    pub(crate) fn build_component(&self, type_name: &str, at: Point) -> Option<Component> {
        let mut component = if let Some(def) = self.chips.get(type_name) {
            Component::from_definition(def.clone(), at)
        } else {
            match ComponentKind::from_str(type_name) {
                Some(kind) if kind != ComponentKind::Chip => Component::new(kind, at)?,
                _ => {
                    warn!(kind = type_name, "unknown component type");
                    return None;
                }
            }
        };
        component.configure(&self.config);
        Some(component)
    }

    pub(crate) fn push_component(&mut self, component: Component) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    pub(crate) fn push_wire(&mut self, start: Point, end: Point) -> bool {
        match Wire::new(start, end) {
            Some(wire) => {
                self.wires.push(wire);
                true
            }
            None => false,
        }
    }

    /// Place a component by type name (built-in tag or library chip name).
    ///
    /// Unknown names are logged and ignored. Returns the new component's
    /// index.
    pub fn add_component(&mut self, type_name: &str, at: Point) -> Option<usize> {
        let component = self.build_component(type_name, at)?;
        let index = self.push_component(component);
        self.update();
        Some(index)
    }

    /// Connect two points. A wire whose ends coincide is ignored.
    pub fn add_wire(&mut self, start: Point, end: Point) -> bool {
        let added = self.push_wire(start, end);
        if added {
            self.update();
        }
        added
    }

    /// First component whose footprint contains `point`.
    pub fn find_component_at(&self, point: Point) -> Option<usize> {
        self.components.iter().position(|c| c.hit_test(point))
    }

    /// Delete the first unlocked component under `point` and every wire
    /// passing near it. Returns how many items were removed.
    pub fn remove_at(&mut self, point: Point) -> usize {
        let mut removed = 0;
        if let Some(index) = self.find_component_at(point) {
            if !self.components[index].locked {
                self.components.remove(index);
                removed += 1;
            }
        }
        let tolerance = self.config.wire_hit_tolerance;
        let before = self.wires.len();
        self.wires.retain(|w| !w.is_near(point, tolerance));
        removed += before - self.wires.len();
        self.update();
        removed
    }

    /// Move an unlocked component.
    pub fn move_component(&mut self, index: usize, to: Point) -> bool {
        match self.components.get_mut(index) {
            Some(component) if !component.locked => {
                component.move_to(to);
                self.update();
                true
            }
            _ => false,
        }
    }

    /// Flip the switch or press the button under `point`.
    pub fn toggle_at(&mut self, point: Point) -> bool {
        let Some(index) = self.find_component_at(point) else {
            return false;
        };
        if !self.components[index].is_interactive() {
            return false;
        }
        self.components[index].toggle();
        self.update();
        true
    }

    /// Release a held button under `point`.
    pub fn release_at(&mut self, point: Point) -> bool {
        let Some(index) = self.find_component_at(point) else {
            return false;
        };
        if self.components[index].kind() != ComponentKind::Button {
            return false;
        }
        self.components[index].release();
        self.update();
        true
    }

    /// Give a boundary pin an id and a matching label.
    pub fn name_pin(&mut self, index: usize, name: &str) -> bool {
        match self.components.get_mut(index) {
            Some(component) => component.set_pin_id(name) && component.set_pin_label(name),
            None => false,
        }
    }

    pub fn set_locked(&mut self, index: usize, locked: bool) -> bool {
        match self.components.get_mut(index) {
            Some(component) => {
                component.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Remove every component and wire and forget the puzzle. The chip
    /// library survives.
    pub fn clear(&mut self) {
        self.components.clear();
        self.wires.clear();
        self.tick_count = 0;
        self.current_puzzle = None;
    }

    // ---- chips ---------------------------------------------------------

    /// Promote the live circuit into a chip definition and add it to the
    /// library under `name`.
    ///
    /// A name already bound to a different definition is refused, so placed
    /// instances always match the library entry they were built from.
    pub fn create_chip(&mut self, name: &str) -> Result<ChipDefinition, ChipError> {
        let definition = ChipDefinition::promote(name, &mut self.components, &self.wires)?;
        self.ensure_name_free(&definition)?;
        self.chips
            .insert(definition.name.clone(), Arc::new(definition.clone()));
        Ok(definition)
    }

    /// Add an externally built definition (e.g. loaded from disk).
    /// Registering an identical definition again is a no-op.
    pub fn register_chip(&mut self, definition: ChipDefinition) -> Result<(), ChipError> {
        definition.validate()?;
        self.ensure_name_free(&definition)?;
        debug!(chip = %definition.name, hash = %definition.hash(), "registered chip");
        self.chips.insert(definition.name.clone(), Arc::new(definition));
        Ok(())
    }

    fn ensure_name_free(&self, definition: &ChipDefinition) -> Result<(), ChipError> {
        match self.chips.get(&definition.name) {
            Some(existing) if existing.hash() != definition.hash() => {
                Err(ChipError::NameTaken(definition.name.clone()))
            }
            _ => Ok(()),
        }
    }

    pub fn chip(&self, name: &str) -> Option<&ChipDefinition> {
        self.chips.get(name).map(|d| d.as_ref())
    }

    /// Library definitions in name order.
    pub fn chip_library(&self) -> impl Iterator<Item = &ChipDefinition> {
        self.chips.values().map(|d| d.as_ref())
    }

    // ---- simulation ----------------------------------------------------

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance time by one tick: clocks and buttons update, then one pass.
    pub fn tick(&mut self) {
        self.tick_count += 1;
        for component in &mut self.components {
            component.on_tick(self.tick_count);
        }
        eval::evaluate(&mut self.components, &mut self.wires);
    }

    /// Single-step regardless of the running flag.
    pub fn step(&mut self) {
        self.tick();
    }

    /// Tick only while running; for an external update loop.
    pub fn frame(&mut self) -> bool {
        if self.running {
            self.tick();
        }
        self.running
    }

    /// Re-evaluate without advancing time until the state stops changing.
    pub fn update(&mut self) -> Settle {
        let outcome = eval::settle(
            &mut self.components,
            &mut self.wires,
            self.config.max_settle_passes,
        );
        if !outcome.settled {
            warn!(passes = outcome.passes, "circuit did not settle");
        }
        outcome
    }

    /// One raw evaluation pass, without time advance or settling.
    pub fn evaluate(&mut self) {
        eval::evaluate(&mut self.components, &mut self.wires);
    }

    // ---- boundary pins & puzzles ---------------------------------------

    /// Drive the InputPin named `id`. Takes effect on the next pass.
    pub fn set_pin_value(&mut self, id: &str, value: bool) -> bool {
        match self
            .components
            .iter_mut()
            .find(|c| c.kind() == ComponentKind::InputPin && c.pin_id() == Some(id))
        {
            Some(pin) => {
                pin.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Value read by the OutputPin named `id`; false if there is none.
    pub fn output_value(&self, id: &str) -> bool {
        self.components
            .iter()
            .find(|c| c.kind() == ComponentKind::OutputPin && c.pin_id() == Some(id))
            .and_then(Component::value)
            .unwrap_or(false)
    }

    /// Replace the circuit with the puzzle's locked scaffold: named input
    /// pins down the left column, named output pins down the right.
    pub fn load_puzzle(&mut self, puzzle: &Puzzle) {
        self.clear();
        let vw = self.config.viewport_width.max(900) as f64;
        let vh = self.config.viewport_height.max(620) as f64;
        let gutter = 120.0;
        let left = (vw * 0.22).round().max(120.0);
        let right = (vw * 0.72).round().min(vw - gutter);
        let spacing = ((vh - 260.0) / puzzle.inputs.len().max(1) as f64).max(70.0);
        let start_y = 140.0;

        let columns = [
            (ComponentKind::InputPin, left, &puzzle.inputs),
            (ComponentKind::OutputPin, right, &puzzle.outputs),
        ];
        for (kind, x, names) in columns {
            for (idx, name) in names.iter().enumerate() {
                let at = Point::snapped(x, start_y + idx as f64 * spacing);
                let Some(mut pin) = Component::new(kind, at) else {
                    continue;
                };
                pin.set_pin_id(name);
                pin.set_pin_label(name);
                pin.locked = true;
                self.components.push(pin);
            }
        }
        // Spacing guide from the first input row.
        self.push_wire(
            Point::snapped(left, start_y),
            Point::snapped(left + 60.0, start_y),
        );
        self.current_puzzle = Some(puzzle.clone());
        debug!(puzzle = %puzzle.id, "loaded puzzle scaffold");
        self.update();
    }

    pub fn current_puzzle(&self) -> Option<&Puzzle> {
        self.current_puzzle.as_ref()
    }

    /// Run every truth-table row through the circuit.
    ///
    /// Each row drives the named InputPins, updates, and compares every named
    /// OutputPin. All inputs are driven low again afterwards.
    pub fn check_truth_table(&mut self, puzzle: &Puzzle) -> CheckReport {
        let mut failing_rows = Vec::new();
        for (idx, row) in puzzle.truth_table.iter().enumerate() {
            for (name, value) in &row.inputs {
                self.set_pin_value(name, *value);
            }
            self.update();
            let matches = puzzle
                .outputs
                .iter()
                .all(|name| row.outputs.get(name) == Some(&self.output_value(name)));
            if !matches {
                failing_rows.push(idx);
            }
        }
        for name in &puzzle.inputs {
            self.set_pin_value(name, false);
        }
        self.update();
        CheckReport {
            solved: failing_rows.is_empty(),
            failing_rows,
        }
    }

    /// Check against the loaded puzzle, if any.
    pub fn check_current_puzzle(&mut self) -> Option<CheckReport> {
        let puzzle = self.current_puzzle.clone()?;
        Some(self.check_truth_table(&puzzle))
    }

    /// Swap in another circuit's contents, keeping config and run state.
    pub(crate) fn replace_contents(&mut self, other: Circuit) {
        self.components = other.components;
        self.wires = other.wires;
        self.chips = other.chips;
        self.tick_count = 0;
        self.current_puzzle = None;
    }
}
