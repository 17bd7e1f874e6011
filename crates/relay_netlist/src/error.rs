//! Typed structural errors reported by the netlist validator.

use crate::gate::GateId;
use crate::module::Module;

/// A structural consistency violation found by [`Module::check`](Module::check).
///
/// These indicate a broken contract in the builder or a transformation pass,
/// not bad user input; callers should surface them as an unrecoverable
/// synthesis failure rather than patching the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// An edge references a gate id that is not in the module.
    #[error("dangling reference to gate {gate}")]
    DanglingGate {
        /// The missing gate id.
        gate: GateId,
    },

    /// A destination edge without the matching source back-edge.
    #[error("gate {gate} lists destination {dst}, but {dst} does not list {gate} as a source")]
    AsymmetricDst {
        /// The gate holding the one-sided edge.
        gate: GateId,
        /// The destination missing the back-edge.
        dst: GateId,
    },

    /// A source edge without the matching destination back-edge.
    #[error("gate {gate} lists source {src}, but {src} does not list {gate} as a destination")]
    AsymmetricSrc {
        /// The gate holding the one-sided edge.
        gate: GateId,
        /// The source missing the back-edge.
        src: GateId,
    },

    /// Two combinational gates are mutual direct sources of each other.
    #[error("gates {a} and {b} form a two-gate cycle")]
    TwoCycle {
        /// One gate of the reciprocal pair.
        a: GateId,
        /// The other gate of the reciprocal pair.
        b: GateId,
    },

    /// A gate is connected to itself.
    #[error("gate {gate} is connected to itself")]
    SelfConnection {
        /// The self-connected gate.
        gate: GateId,
    },

    /// A portal edge on a gate that is not flagged sequential.
    #[error("gate {gate} carries a portal edge but is not sequential")]
    CombinationalPortal {
        /// The offending gate.
        gate: GateId,
    },

    /// A portal destination without the matching portal source back-edge.
    #[error(
        "gate {gate} lists portal destination {dst}, but {dst} does not list {gate} as a portal source"
    )]
    AsymmetricPortalDst {
        /// The gate holding the one-sided portal edge.
        gate: GateId,
        /// The portal destination missing the back-edge.
        dst: GateId,
    },

    /// A portal source without the matching portal destination back-edge.
    #[error(
        "gate {gate} lists portal source {src}, but {src} does not list {gate} as a portal destination"
    )]
    AsymmetricPortalSrc {
        /// The gate holding the one-sided portal edge.
        gate: GateId,
        /// The portal source missing the back-edge.
        src: GateId,
    },

    /// A gate drives more destinations than the fan-out ceiling allows.
    #[error("gate {gate} drives {count} destinations, over the limit of {limit}", limit = Module::FANOUT_LIMIT)]
    FanoutExceeded {
        /// The over-driving gate.
        gate: GateId,
        /// Its destination count.
        count: usize,
    },

    /// A timer gate with more than one source.
    #[error("timer {gate} cannot have more than one input")]
    TimerMultipleInputs {
        /// The offending timer gate.
        gate: GateId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_gates() {
        let err = NetlistError::AsymmetricDst {
            gate: GateId::from_raw(3),
            dst: GateId::from_raw(9),
        };
        assert_eq!(
            format!("{err}"),
            "gate 3 lists destination 9, but 9 does not list 3 as a source"
        );
    }

    #[test]
    fn fanout_message_includes_limit() {
        let err = NetlistError::FanoutExceeded {
            gate: GateId::from_raw(1),
            count: 300,
        };
        assert_eq!(
            format!("{err}"),
            "gate 1 drives 300 destinations, over the limit of 256"
        );
    }
}
