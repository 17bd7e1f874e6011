//! Read-only structural audit of a finished module.

use crate::error::NetlistError;
use crate::module::Module;

impl Module {
    /// Audits the module against every structural invariant.
    ///
    /// Checks, per gate: that all plain and portal edges reference existing
    /// gates and appear symmetrically on both sides, that no gate connects to
    /// itself or forms a reciprocal pair with a direct source, that only
    /// sequential gates carry portal edges, that fan-out stays within
    /// [`Module::FANOUT_LIMIT`], and that timers have at most one source.
    ///
    /// Returns the first violation found. The cycle check only inspects
    /// direct mutual edges; longer combinational feedback is assumed to be
    /// broken up by sequential nodes.
    pub fn check(&self) -> Result<(), NetlistError> {
        for (&gate_id, gate) in &self.gates {
            for &dst_id in &gate.dsts {
                let dst = self
                    .gates
                    .get(&dst_id)
                    .ok_or(NetlistError::DanglingGate { gate: dst_id })?;
                if !dst.srcs.contains(&gate_id) {
                    return Err(NetlistError::AsymmetricDst {
                        gate: gate_id,
                        dst: dst_id,
                    });
                }
            }

            for &src_id in &gate.srcs {
                let src = self
                    .gates
                    .get(&src_id)
                    .ok_or(NetlistError::DanglingGate { gate: src_id })?;
                if !src.dsts.contains(&gate_id) {
                    return Err(NetlistError::AsymmetricSrc {
                        gate: gate_id,
                        src: src_id,
                    });
                }
                if src_id == gate_id {
                    return Err(NetlistError::SelfConnection { gate: gate_id });
                }
                if src.srcs.contains(&gate_id) {
                    return Err(NetlistError::TwoCycle {
                        a: gate_id,
                        b: src_id,
                    });
                }
            }

            if gate.has_portals() && !self.sequential_nodes.contains(&gate_id) {
                return Err(NetlistError::CombinationalPortal { gate: gate_id });
            }

            for &dst_id in gate.portal_dsts.keys() {
                let dst = self
                    .gates
                    .get(&dst_id)
                    .ok_or(NetlistError::DanglingGate { gate: dst_id })?;
                if !dst.portal_srcs.contains_key(&gate_id) {
                    return Err(NetlistError::AsymmetricPortalDst {
                        gate: gate_id,
                        dst: dst_id,
                    });
                }
            }

            for &src_id in gate.portal_srcs.keys() {
                let src = self
                    .gates
                    .get(&src_id)
                    .ok_or(NetlistError::DanglingGate { gate: src_id })?;
                if !src.portal_dsts.contains_key(&gate_id) {
                    return Err(NetlistError::AsymmetricPortalSrc {
                        gate: gate_id,
                        src: src_id,
                    });
                }
            }

            if gate.dsts.len() > Module::FANOUT_LIMIT {
                return Err(NetlistError::FanoutExceeded {
                    gate: gate_id,
                    count: gate.dsts.len(),
                });
            }
            if gate.kind.is_timer() && gate.srcs.len() > 1 {
                return Err(NetlistError::TimerMultipleInputs { gate: gate_id });
            }
        }
        Ok(())
    }
}
