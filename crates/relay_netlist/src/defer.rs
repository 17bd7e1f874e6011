//! Lazy single-slot allocator for shared driver gates.

use crate::builder::NetBuilder;
use crate::gate::GateId;
use crate::module::Module;

/// Defers creation of a repeatedly-creatable gate until it hits the ceiling.
///
/// Call [`acquire`](Self::acquire) each time a slot on the shared driver is
/// needed: the current instance is reused while it has fan-out room, and the
/// creator closure manufactures a fresh instance once it saturates. Useful
/// for constant drivers whose total consumer count is not known up front.
pub struct DeferredGate {
    gate: Option<GateId>,
    creator: Box<dyn FnMut(&mut NetBuilder) -> GateId>,
}

impl DeferredGate {
    /// Wraps a creator closure; no gate is built until first use.
    pub fn new(creator: impl FnMut(&mut NetBuilder) -> GateId + 'static) -> Self {
        Self {
            gate: None,
            creator: Box::new(creator),
        }
    }

    /// Returns a driver gate with at least one output slot left.
    ///
    /// Reuses the previous instance while its fan-out is below
    /// [`Module::FANOUT_LIMIT`]; otherwise invokes the creator for a new one.
    pub fn acquire(&mut self, builder: &mut NetBuilder) -> GateId {
        if let Some(id) = self.gate {
            if builder.module().gates[&id].dsts.len() < Module::FANOUT_LIMIT {
                return id;
            }
        }
        let id = (self.creator)(builder);
        self.gate = Some(id);
        id
    }
}
