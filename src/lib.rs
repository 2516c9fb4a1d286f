//! # gridlogic
//!
//! **Grid circuits: place parts, draw wires, tick the clock**
//!
//! This crate simulates digital-logic circuits laid out on a grid. Components
//! sit at integer coordinates, wires join coordinates, and every pass of the
//! evaluator turns the whole layout into one boolean value per electrical
//! node. Circuits can be promoted into reusable chips that nest to any depth.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridlogic::{Circuit, Point};
//!
//! let mut circuit = Circuit::new();
//! circuit.add_component("Switch", Point::new(100, 100));
//! let led = circuit.add_component("LED", Point::new(200, 100)).unwrap();
//! circuit.add_wire(Point::new(120, 100), Point::new(200, 110));
//!
//! circuit.toggle_at(Point::new(100, 100));
//! assert_eq!(circuit.component(led).unwrap().is_on(), Some(true));
//! ```
//!
//! ## Key Concepts
//!
//! - **Component**: a placed part with named input and output pins
//! - **Node**: every coordinate joined by wires; high wins on conflict
//! - **Tick**: one discrete step, advancing clocks and buttons
//! - **Chip**: a promoted circuit, instantiated with private internals
//! - **Puzzle**: a seeded truth table checked against boundary pins

pub mod chip;
pub mod circuit;
pub mod component;
pub mod config;
pub mod eval;
pub mod gate;
pub mod geometry;
pub mod persist;
pub mod puzzle;
pub mod wire;

pub use chip::{Chip, ChipDefinition, ChipError, ChipHash, PinSpec, Placement};
pub use circuit::Circuit;
pub use component::{Component, ComponentKind, Part};
pub use config::{ConfigError, SimConfig};
pub use eval::{evaluate, settle, NodeMap, Settle};
pub use gate::GateOp;
pub use geometry::{Point, GRID_SIZE};
pub use persist::{LoadSummary, PersistError, SavedCircuit};
pub use puzzle::{generate_puzzle, CheckReport, Puzzle, PuzzleSet};
pub use wire::{Wire, WireSpec};
