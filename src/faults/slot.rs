//! One monitored worker category: name, assigned bit, probe.

use std::sync::Arc;

use crate::probes::ProbeRef;

/// A registered worker category in the aggregator's slot table.
///
/// Created once when the supervisor is built; immutable afterwards. The bit
/// position equals the registration index and is stable for the process
/// lifetime.
#[derive(Clone)]
pub struct WorkerSlot {
    name: Arc<str>,
    bit: u8,
    probe: ProbeRef,
}

impl WorkerSlot {
    pub(crate) fn new(name: impl Into<Arc<str>>, bit: u8, probe: ProbeRef) -> Self {
        Self {
            name: name.into(),
            bit,
            probe,
        }
    }

    /// Worker name used in reports and events.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Bit position in the round [`FaultMask`](crate::FaultMask).
    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// The probe polled for this slot.
    pub fn probe(&self) -> &ProbeRef {
        &self.probe
    }
}
