//! # Evaluation: one discrete simulation step
//!
//! [`evaluate`] turns a component list and a wire list into one consistent
//! signal snapshot:
//!
//! 1. reset every component's inputs,
//! 2. seed node values from every output pin's *current* value,
//! 3. build the wire adjacency keyed by [`Point`],
//! 4. flood-fill each seed across its connected coordinates; a node that
//!    receives both levels resolves high,
//! 5. apply node values to input pins (floating inputs read low),
//! 6. recurse into chips,
//! 7. `compute()` every component,
//! 8. stamp every wire with the value at its start point.
//!
//! Outputs seed the pass before their own inputs are refreshed, so a value
//! moves one component further per pass. [`settle`] repeats the pass until
//! nothing changes, which is what editing and puzzle checking use.

use crate::component::Component;
use crate::geometry::Point;
use crate::wire::Wire;
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Resolved electrical nodes for one pass.
///
/// A node is every coordinate reachable from a driven coordinate through
/// wires. Coordinates no output can reach are floating and have no entry.
#[derive(Debug, Default)]
pub struct NodeMap {
    node_of: HashMap<Point, usize>,
    values: Vec<bool>,
}

impl NodeMap {
    /// Flood-fill every seed through the wire graph.
    ///
    /// Seeds are processed in order. The first seed to reach a node labels
    /// the whole node; later seeds only matter when they raise it to high.
    pub fn build(wires: &[Wire], seeds: &[(Point, bool)]) -> Self {
        let mut adjacency: HashMap<Point, Vec<Point>> = HashMap::new();
        for wire in wires {
            adjacency.entry(wire.start()).or_default().push(wire.end());
            adjacency.entry(wire.end()).or_default().push(wire.start());
        }

        let mut map = NodeMap::default();
        let mut queue = VecDeque::new();
        for &(point, value) in seeds {
            if let Some(&node) = map.node_of.get(&point) {
                // High overrides low; equal or low arrivals change nothing.
                map.values[node] |= value;
                continue;
            }
            let node = map.values.len();
            map.values.push(value);
            map.node_of.insert(point, node);
            queue.push_back(point);
            while let Some(current) = queue.pop_front() {
                for &next in adjacency.get(&current).into_iter().flatten() {
                    if !map.node_of.contains_key(&next) {
                        map.node_of.insert(next, node);
                        queue.push_back(next);
                    }
                }
            }
        }
        map
    }

    /// Resolved value at `point`, `None` if nothing drives it.
    pub fn value_at(&self, point: Point) -> Option<bool> {
        self.node_of.get(&point).map(|&node| self.values[node])
    }

    pub fn node_count(&self) -> usize {
        self.values.len()
    }
}

/// Run one evaluation pass over `components` and `wires`, in place.
pub fn evaluate(components: &mut [Component], wires: &mut [Wire]) {
    for component in components.iter_mut() {
        component.reset_inputs();
    }

    let seeds: Vec<(Point, bool)> = components
        .iter()
        .flat_map(|c| c.output_points())
        .collect();
    let nodes = NodeMap::build(wires, &seeds);
    trace!(seeds = seeds.len(), nodes = nodes.node_count(), "resolved nodes");

    for component in components.iter_mut() {
        let applied: Vec<(String, bool)> = component
            .input_points()
            .map(|(id, at)| (id.to_string(), nodes.value_at(at).unwrap_or(false)))
            .collect();
        for (id, value) in applied {
            component.set_input(&id, value);
        }
    }

    for component in components.iter_mut() {
        if let Some(chip) = component.as_chip_mut() {
            chip.evaluate_internal();
        }
    }

    for component in components.iter_mut() {
        component.compute();
    }

    for wire in wires.iter_mut() {
        wire.state = nodes.value_at(wire.start()).unwrap_or(false);
    }
}

/// Outcome of [`settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    pub passes: usize,
    /// `false` when the pass budget ran out first (an oscillating loop).
    pub settled: bool,
}

/// Repeat [`evaluate`] until the signal snapshot stops changing, at most
/// `max_passes` times (at least once).
pub fn settle(components: &mut [Component], wires: &mut [Wire], max_passes: usize) -> Settle {
    let mut before = snapshot(components, wires);
    let budget = max_passes.max(1);
    for pass in 1..=budget {
        evaluate(components, wires);
        let after = snapshot(components, wires);
        if after == before {
            return Settle {
                passes: pass,
                settled: true,
            };
        }
        before = after;
    }
    Settle {
        passes: budget,
        settled: false,
    }
}

/// Every output value (chip internals included) followed by every wire
/// state.
pub fn snapshot(components: &[Component], wires: &[Wire]) -> Vec<bool> {
    let mut out = Vec::new();
    collect_signals(components, wires, &mut out);
    out
}

fn collect_signals(components: &[Component], wires: &[Wire], out: &mut Vec<bool>) {
    for component in components {
        out.extend(component.outputs().iter().map(|p| p.value));
        if let Some(chip) = component.as_chip() {
            collect_signals(chip.components(), chip.wires(), out);
        }
    }
    out.extend(wires.iter().map(|w| w.state));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    impl NodeMap {
        fn same_node(&self, a: Point, b: Point) -> bool {
            match (self.node_of.get(&a), self.node_of.get(&b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
    }

    fn place(kind: ComponentKind, x: i64, y: i64) -> Component {
        Component::new(kind, Point::new(x, y)).unwrap()
    }

    fn wire(x1: i64, y1: i64, x2: i64, y2: i64) -> Wire {
        Wire::new(Point::new(x1, y1), Point::new(x2, y2)).unwrap()
    }

    #[test]
    fn connectivity_is_transitive() {
        let wires = vec![wire(0, 0, 50, 0), wire(50, 0, 50, 50)];
        let nodes = NodeMap::build(&wires, &[(Point::new(0, 0), true)]);
        assert!(nodes.same_node(Point::new(0, 0), Point::new(50, 50)));
        assert_eq!(nodes.value_at(Point::new(50, 50)), Some(true));
        assert_eq!(nodes.node_count(), 1);
    }

    #[test]
    fn high_wins_regardless_of_order() {
        let wires = vec![wire(0, 0, 100, 0)];
        for seeds in [
            [(Point::new(0, 0), false), (Point::new(100, 0), true)],
            [(Point::new(100, 0), true), (Point::new(0, 0), false)],
        ] {
            let nodes = NodeMap::build(&wires, &seeds);
            assert_eq!(nodes.value_at(Point::new(0, 0)), Some(true));
            assert_eq!(nodes.value_at(Point::new(100, 0)), Some(true));
        }
    }

    #[test]
    fn undriven_coordinates_float() {
        let wires = vec![wire(0, 0, 10, 0)];
        let nodes = NodeMap::build(&wires, &[(Point::new(500, 500), true)]);
        assert_eq!(nodes.value_at(Point::new(0, 0)), None);
        assert_eq!(nodes.value_at(Point::new(500, 500)), Some(true));
    }

    #[test]
    fn conflicting_drivers_resolve_high() {
        // VCC output at (100, 110), GND output at (200, 190), joined by a
        // wire and read by an LED at (150, 140).
        let mut components = vec![
            place(ComponentKind::Vcc, 100, 100),
            place(ComponentKind::Gnd, 200, 200),
            place(ComponentKind::Led, 150, 130),
        ];
        let mut wires = vec![wire(100, 110, 200, 190), wire(200, 190, 150, 140)];
        evaluate(&mut components, &mut wires);
        assert_eq!(components[2].is_on(), Some(true));
        assert!(wires.iter().all(|w| w.state));
    }

    #[test]
    fn floating_inputs_read_low() {
        let mut components = vec![place(ComponentKind::Nor, 100, 100)];
        let mut wires = Vec::new();
        evaluate(&mut components, &mut wires);
        assert!(components[0].outputs()[0].value);
    }

    #[test]
    fn pins_on_the_same_point_connect_without_wires() {
        // VCC output lands on (70, 90), the AND's `a` input.
        let mut components = vec![
            place(ComponentKind::Vcc, 70, 80),
            place(ComponentKind::Vcc, 70, 100),
            place(ComponentKind::And, 100, 100),
        ];
        let mut wires = Vec::new();
        evaluate(&mut components, &mut wires);
        assert!(components[2].outputs()[0].value);
    }

    #[test]
    fn one_pass_moves_one_component() {
        // VCC -> NOT -> NOT -> LED, each hop one pass behind.
        let mut components = vec![
            place(ComponentKind::Vcc, 0, 0),
            place(ComponentKind::Not, 100, 0),
            place(ComponentKind::Not, 200, 0),
            place(ComponentKind::Led, 300, 0),
        ];
        let mut wires = vec![
            wire(0, 10, 80, 0),
            wire(120, 0, 180, 0),
            wire(220, 0, 300, 10),
        ];
        evaluate(&mut components, &mut wires);
        // The second NOT saw the first one's stale high, the LED the second
        // one's stale high.
        assert!(!components[1].outputs()[0].value);
        assert!(!components[2].outputs()[0].value);
        assert_eq!(components[3].is_on(), Some(true));

        let outcome = settle(&mut components, &mut wires, 16);
        assert!(outcome.settled);
        assert_eq!(components[3].is_on(), Some(true));
        assert!(components[2].outputs()[0].value);
    }

    #[test]
    fn settled_circuits_are_idempotent() {
        let mut components = vec![
            place(ComponentKind::Vcc, 0, 0),
            place(ComponentKind::Xor, 100, 0),
            place(ComponentKind::Led, 200, 0),
        ];
        let mut wires = vec![wire(0, 10, 70, -10), wire(130, 0, 200, 10)];
        settle(&mut components, &mut wires, 16);
        evaluate(&mut components, &mut wires);
        let first = snapshot(&components, &wires);
        evaluate(&mut components, &mut wires);
        assert_eq!(first, snapshot(&components, &wires));
        assert_eq!(components[2].is_on(), Some(true));
    }

    #[test]
    fn oscillator_hits_the_budget() {
        // NOT output wired back to its own input.
        let mut components = vec![place(ComponentKind::Not, 100, 100)];
        let mut wires = vec![wire(120, 100, 120, 140), wire(120, 140, 80, 100)];
        let outcome = settle(&mut components, &mut wires, 5);
        assert_eq!(outcome, Settle { passes: 5, settled: false });
    }
}
