//! # Puzzles
//!
//! A puzzle names boundary inputs and outputs and gives the truth table the
//! circuit between them must reproduce. Puzzles are generated from a seed
//! with ChaCha20, so the same `(seed, level)` always yields the same puzzle
//! on every platform.
//!
//! ```rust
//! use gridlogic::puzzle::{generate_puzzle, format_truth_table};
//!
//! let puzzle = generate_puzzle(42, 1);
//! assert_eq!(puzzle, generate_puzzle(42, 1));
//! assert_eq!(puzzle.truth_table.len(), 1 << puzzle.inputs.len());
//! println!("{}", format_truth_table(&puzzle));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a truth table, keyed by pin name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthRow {
    pub inputs: BTreeMap<String, bool>,
    pub outputs: BTreeMap<String, bool>,
}

/// A generated puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub seed: u64,
    /// Difficulty 1..=3.
    pub level: u8,
    pub title: String,
    pub description: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub truth_table: Vec<TruthRow>,
    pub hint: String,
    /// Cosmetic jitter in `[0.65, 1.0)` for the presentation layer.
    pub wobble: f64,
}

/// Result of checking a circuit against a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckReport {
    pub solved: bool,
    /// Indices into the truth table of rows that did not match.
    pub failing_rows: Vec<usize>,
}

struct Template {
    kind: &'static str,
    title: &'static str,
    description: &'static str,
    inputs: &'static [&'static str],
    outputs: &'static [&'static str],
    rule: fn(&[bool]) -> Vec<bool>,
}

fn count_high(bits: &[bool]) -> usize {
    bits.iter().filter(|b| **b).count()
}

static TEMPLATES: [Template; 6] = [
    Template {
        kind: "and-gate",
        title: "Dual Switch Lock",
        description: "Both inputs must be HIGH to light the output.",
        inputs: &["A", "B"],
        outputs: &["Q"],
        rule: |x| vec![x[0] && x[1]],
    },
    Template {
        kind: "or-gate",
        title: "Either Path Works",
        description: "Any HIGH input should turn the output HIGH.",
        inputs: &["A", "B"],
        outputs: &["Q"],
        rule: |x| vec![x[0] || x[1]],
    },
    Template {
        kind: "xor-gate",
        title: "Exclusive Path",
        description: "Exactly one input HIGH turns the output HIGH.",
        inputs: &["A", "B"],
        outputs: &["Q"],
        rule: |x| vec![x[0] != x[1]],
    },
    Template {
        kind: "majority",
        title: "Majority Vote",
        description: "At least two inputs HIGH should make OUT HIGH.",
        inputs: &["A", "B", "C"],
        outputs: &["OUT"],
        rule: |x| vec![count_high(x) >= 2],
    },
    Template {
        kind: "parity",
        title: "Parity Bit",
        description: "OUT should be HIGH when an odd number of inputs are HIGH.",
        inputs: &["D0", "D1", "D2"],
        outputs: &["PAR"],
        rule: |x| vec![count_high(x) % 2 == 1],
    },
    Template {
        kind: "dual-output",
        title: "Split Decision",
        description: "Drive two outputs: SUM behaves like XOR, CARRY like AND.",
        inputs: &["X", "Y"],
        outputs: &["SUM", "CARRY"],
        rule: |x| vec![x[0] != x[1], x[0] && x[1]],
    },
];

static HINTS: [&str; 5] = [
    "Try simplifying with as few gates as possible.",
    "Symmetry often reduces wiring.",
    "Plan the outputs before dropping gates.",
    "Route wires in straight lines to avoid tangles.",
    "Use NOT gates to flip tricky cases.",
];

const LEVEL_TAGS: [&str; 3] = ["Casual", "Tricky", "Expert"];

pub fn clamp_level(level: u8) -> u8 {
    level.clamp(1, 3)
}

/// Enumerate every input combination. Input `i` is bit `i` of the row index,
/// so the first input toggles fastest.
pub fn build_truth_table<F>(inputs: &[&str], outputs: &[&str], rule: F) -> Vec<TruthRow>
where
    F: Fn(&[bool]) -> Vec<bool>,
{
    let combos = 1usize << inputs.len();
    (0..combos)
        .map(|row| {
            let bits: Vec<bool> = (0..inputs.len()).map(|i| row & (1 << i) != 0).collect();
            let result = rule(&bits);
            TruthRow {
                inputs: inputs
                    .iter()
                    .zip(&bits)
                    .map(|(name, bit)| (name.to_string(), *bit))
                    .collect(),
                outputs: outputs
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.to_string(), result.get(i).copied().unwrap_or(false)))
                    .collect(),
            }
        })
        .collect()
}

fn pick<'a, T, R: Rng>(rng: &mut R, list: &'a [T]) -> &'a T {
    &list[rng.gen_range(0..list.len())]
}

/// Generate the puzzle for `(seed, level)`.
pub fn generate_puzzle(seed: u64, level: u8) -> Puzzle {
    let level = clamp_level(level);
    let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(u64::from(level) * 97));
    let template = pick(&mut rng, &TEMPLATES);
    let wobble = rng.gen::<f64>() * 0.35 + 0.65;
    let hint = pick(&mut rng, &HINTS);
    Puzzle {
        id: format!("{}-{}-{}", template.kind, seed, level),
        seed,
        level,
        title: format!("{} · {}", template.title, LEVEL_TAGS[usize::from(level) - 1]),
        description: template.description.to_string(),
        inputs: template.inputs.iter().map(|s| s.to_string()).collect(),
        outputs: template.outputs.iter().map(|s| s.to_string()).collect(),
        truth_table: build_truth_table(template.inputs, template.outputs, template.rule),
        hint: hint.to_string(),
        wobble,
    }
}

/// The three daily puzzles, one per level.
#[derive(Debug, Clone)]
pub struct PuzzleSet {
    pub day: u64,
    puzzles: [Puzzle; 3],
}

impl PuzzleSet {
    pub fn for_day(day: u64) -> Self {
        PuzzleSet {
            day,
            puzzles: [
                generate_puzzle(day, 1),
                generate_puzzle(day.wrapping_add(13), 2),
                generate_puzzle(day.wrapping_add(29), 3),
            ],
        }
    }

    /// Puzzle by zero-based level index, clamped to the available levels.
    pub fn get(&self, level_index: usize) -> &Puzzle {
        &self.puzzles[level_index.min(self.puzzles.len() - 1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter()
    }
}

/// Render a truth table as text: a header, a rule, then one row per line.
pub fn format_truth_table(puzzle: &Puzzle) -> String {
    let header = format!("{} | {}", puzzle.inputs.join(" "), puzzle.outputs.join(" "));
    let bit = |b: Option<&bool>| if b.copied().unwrap_or(false) { "1" } else { "0" };
    let mut lines = vec![header.clone(), "-".repeat(header.chars().count())];
    for row in &puzzle.truth_table {
        let ins: Vec<&str> = puzzle.inputs.iter().map(|k| bit(row.inputs.get(k))).collect();
        let outs: Vec<&str> = puzzle.outputs.iter().map(|k| bit(row.outputs.get(k))).collect();
        lines.push(format!("{} | {}", ins.join("  "), outs.join("  ")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table_enumerates_low_bit_first() {
        let rows = build_truth_table(&["A", "B"], &["Q"], |x| vec![x[0] && x[1]]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].inputs["A"], true);
        assert_eq!(rows[1].inputs["B"], false);
        assert!(rows[3].outputs["Q"]);
        assert!(!rows[2].outputs["Q"]);
    }

    #[test]
    fn generation_is_deterministic() {
        for seed in [0, 7, 293, 10_000] {
            for level in 1..=3 {
                let a = generate_puzzle(seed, level);
                let b = generate_puzzle(seed, level);
                assert_eq!(a, b);
                assert!((0.65..1.0).contains(&a.wobble));
                assert!(a.id.ends_with(&format!("-{}-{}", seed, level)));
            }
        }
    }

    #[test]
    fn tables_match_their_templates() {
        for seed in 0..40 {
            let puzzle = generate_puzzle(seed, 2);
            assert_eq!(puzzle.truth_table.len(), 1 << puzzle.inputs.len());
            let template = TEMPLATES
                .iter()
                .find(|t| puzzle.id.starts_with(t.kind))
                .unwrap();
            for row in &puzzle.truth_table {
                let bits: Vec<bool> = puzzle.inputs.iter().map(|k| row.inputs[k]).collect();
                let expected = (template.rule)(&bits);
                let actual: Vec<bool> = puzzle.outputs.iter().map(|k| row.outputs[k]).collect();
                assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn levels_are_clamped() {
        assert_eq!(generate_puzzle(5, 0).level, 1);
        assert_eq!(generate_puzzle(5, 9).level, 3);
        assert!(generate_puzzle(5, 9).title.ends_with("Expert"));
        let set = PuzzleSet::for_day(100);
        assert_eq!(set.get(0).seed, 100);
        assert_eq!(set.get(7).seed, 129);
        assert_eq!(set.iter().count(), 3);

        let last = PuzzleSet::for_day(u64::MAX);
        assert_eq!(last.get(1).seed, 12);
        assert_eq!(last.get(2).seed, 28);
    }

    #[test]
    fn formatted_table_has_header_and_rows() {
        let mut puzzle = generate_puzzle(1, 1);
        puzzle.inputs = vec!["A".into(), "B".into()];
        puzzle.outputs = vec!["Q".into()];
        puzzle.truth_table = build_truth_table(&["A", "B"], &["Q"], |x| vec![x[0] && x[1]]);
        let text = format_truth_table(&puzzle);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A B | Q");
        assert_eq!(lines[1], "-------");
        assert_eq!(lines[2], "0  0 | 0");
        assert_eq!(lines[5], "1  1 | 1");
    }
}
