//! Gate data model: ids, kinds, edges, and the logic-family classification.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Opaque, copyable id of a gate within a [`Module`](crate::Module).
///
/// Ids are dense `u64` values allocated monotonically by the
/// [`NetBuilder`](crate::NetBuilder) and never reused while the gate is live,
/// so downstream consumers may key side tables by id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct GateId(u64);

impl GateId {
    /// Creates an id from a raw `u64` value.
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single gate: its kind plus both edge tables.
///
/// Every plain edge appears symmetrically: `b ∈ a.dsts ⇔ a ∈ b.srcs`.
/// Portal edges carry a tick depth and obey the same symmetry on the
/// `portal_srcs`/`portal_dsts` maps. The [`NetBuilder`](crate::NetBuilder)
/// maintains both directions on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate kind (logic function or timer).
    #[serde(rename = "type")]
    pub kind: GateKind,
    /// Ids of the gates driving this gate.
    pub srcs: BTreeSet<GateId>,
    /// Ids of the gates this gate drives.
    pub dsts: BTreeSet<GateId>,
    /// Portal predecessors, each with its tick depth.
    #[serde(
        rename = "portalSrcs",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub portal_srcs: BTreeMap<GateId, u32>,
    /// Portal successors, each with its tick depth.
    #[serde(
        rename = "portalDsts",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub portal_dsts: BTreeMap<GateId, u32>,
}

impl Gate {
    /// Creates a disconnected gate of the given kind.
    pub fn new(kind: GateKind) -> Self {
        Self {
            kind,
            srcs: BTreeSet::new(),
            dsts: BTreeSet::new(),
            portal_srcs: BTreeMap::new(),
            portal_dsts: BTreeMap::new(),
        }
    }

    /// Returns `true` if the gate carries any portal edge.
    pub fn has_portals(&self) -> bool {
        !self.portal_srcs.is_empty() || !self.portal_dsts.is_empty()
    }
}

/// The kind of a gate: a member of the logic family, or a pure delay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    /// A combinational logic gate.
    Logic {
        /// Which member of the logic family.
        #[serde(rename = "type")]
        kind: LogicKind,
    },
    /// A delay line: forwards its single input after `delay` ticks.
    Timer {
        /// Propagation delay in ticks.
        delay: u32,
    },
}

impl GateKind {
    /// Returns the logic kind, or `None` for timers.
    pub fn logic(self) -> Option<LogicKind> {
        match self {
            GateKind::Logic { kind } => Some(kind),
            GateKind::Timer { .. } => None,
        }
    }

    /// Returns `true` for timer gates.
    pub fn is_timer(self) -> bool {
        matches!(self, GateKind::Timer { .. })
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Logic { kind } => write!(f, "{kind}"),
            GateKind::Timer { delay } => write!(f, "TIMER({delay})"),
        }
    }
}

/// The six-member combinational logic family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicKind {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// Logical XOR (odd parity).
    Xor,
    /// Negated AND.
    Nand,
    /// Negated OR.
    Nor,
    /// Negated XOR (even parity).
    Xnor,
}

impl fmt::Display for LogicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogicKind::And => "AND",
            LogicKind::Or => "OR",
            LogicKind::Xor => "XOR",
            LogicKind::Nand => "NAND",
            LogicKind::Nor => "NOR",
            LogicKind::Xnor => "XNOR",
        };
        write!(f, "{name}")
    }
}

impl LogicKind {
    /// Whether the gate inverts when given a single input.
    pub fn is_inverter(self) -> bool {
        match self {
            LogicKind::And | LogicKind::Or | LogicKind::Xor => false,
            LogicKind::Nand | LogicKind::Nor | LogicKind::Xnor => true,
        }
    }

    /// How the gate combines multiple input sources.
    pub fn aggregation(self) -> Aggregation {
        match self {
            LogicKind::And | LogicKind::Nand => Aggregation::And,
            LogicKind::Or | LogicKind::Nor => Aggregation::Or,
            LogicKind::Xor | LogicKind::Xnor => Aggregation::Chain,
        }
    }

    /// The kind computing the negation of this kind.
    pub fn negated(self) -> LogicKind {
        match self {
            LogicKind::And => LogicKind::Nand,
            LogicKind::Or => LogicKind::Nor,
            LogicKind::Xor => LogicKind::Xnor,
            LogicKind::Nand => LogicKind::And,
            LogicKind::Nor => LogicKind::Or,
            LogicKind::Xnor => LogicKind::Xor,
        }
    }

    /// Whether two kinds compute the same function under a given input count.
    ///
    /// With zero inputs every gate idles low; with one input only the
    /// inverter-ness matters; from two inputs on the kinds must match exactly.
    pub fn is_equivalent_to(self, other: LogicKind, input_count: usize) -> bool {
        match input_count {
            0 => true,
            1 => self.is_inverter() == other.is_inverter(),
            _ => self == other,
        }
    }
}

/// The input-combining behavior shared within each gate-family pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// AND-family: a low input dominates the output.
    And,
    /// OR-family: a high input dominates the output.
    Or,
    /// XOR-family: each high input toggles the output.
    Chain,
}
