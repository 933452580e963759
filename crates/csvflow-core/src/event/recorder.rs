use log::log;
use uuid::Uuid;

use super::{ConversionEvent, ConversionEventKind, EventStore};

/// Contexto prestado que registra eventos de una invocación concreta.
///
/// Cada evento se escribe en el store y se refleja como registro `log` con
/// el nivel de `ConversionEventKind::level`.
pub struct EventRecorder<'a> {
    pub invocation_id: Uuid,
    store: &'a mut dyn EventStore,
}

impl<'a> EventRecorder<'a> {
    pub fn new(store: &'a mut dyn EventStore, invocation_id: Uuid) -> Self {
        Self { invocation_id, store }
    }

    pub fn record(&mut self, kind: ConversionEventKind) -> ConversionEvent {
        log!(kind.level(), "[{}] {:?}", self.invocation_id, kind);
        self.store.append_kind(self.invocation_id, kind)
    }
}
