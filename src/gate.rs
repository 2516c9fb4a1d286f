//! Two-input boolean gate table.

use serde::{Deserialize, Serialize};

/// Gate operation types.
///
/// NAND/NOR/XNOR are defined as the negation of AND/OR/XOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

impl GateOp {
    pub const ALL: [GateOp; 6] = [
        GateOp::And,
        GateOp::Or,
        GateOp::Xor,
        GateOp::Nand,
        GateOp::Nor,
        GateOp::Xnor,
    ];

    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            GateOp::And => a && b,
            GateOp::Or => a || b,
            GateOp::Xor => a != b,
            GateOp::Nand => !(a && b),
            GateOp::Nor => !(a || b),
            GateOp::Xnor => a == b,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateOp::And => "AND",
            GateOp::Or => "OR",
            GateOp::Xor => "XOR",
            GateOp::Nand => "NAND",
            GateOp::Nor => "NOR",
            GateOp::Xnor => "XNOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BITS: [bool; 2] = [false, true];

    /// The non-inverted counterpart and whether `op` inverts it.
    fn base_of(op: GateOp) -> (GateOp, bool) {
        match op {
            GateOp::Nand => (GateOp::And, true),
            GateOp::Nor => (GateOp::Or, true),
            GateOp::Xnor => (GateOp::Xor, true),
            other => (other, false),
        }
    }

    #[test]
    fn truth_tables() {
        for a in BITS {
            for b in BITS {
                assert_eq!(GateOp::And.apply(a, b), a && b);
                assert_eq!(GateOp::Or.apply(a, b), a || b);
                assert_eq!(GateOp::Xor.apply(a, b), a != b);
            }
        }
    }

    #[test]
    fn inverted_ops_negate_their_base() {
        for op in GateOp::ALL {
            let (base, inverted) = base_of(op);
            for a in BITS {
                for b in BITS {
                    assert_eq!(op.apply(a, b), base.apply(a, b) ^ inverted, "{}", op.as_str());
                }
            }
        }
    }
}
