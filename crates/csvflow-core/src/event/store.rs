use chrono::Utc;
use indexmap::IndexMap;
use uuid::Uuid;

use super::{ConversionEvent, ConversionEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, invocation_id: Uuid, kind: ConversionEventKind) -> ConversionEvent;
    /// Lista eventos de una invocación (orden ascendente por seq).
    fn list(&self, invocation_id: Uuid) -> Vec<ConversionEvent>;
}

/// Store en memoria. Las invocaciones se conservan en el orden en que
/// registraron su primer evento.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    by_invocation: IndexMap<Uuid, Vec<ConversionEvent>>,
}

impl InMemoryEventStore {
    /// Ids de invocación vistos, en orden de llegada.
    pub fn invocations(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.by_invocation.keys().copied()
    }

    /// Consume el store y devuelve todos los eventos, invocación por
    /// invocación.
    pub fn into_events(self) -> Vec<ConversionEvent> {
        self.by_invocation.into_values().flatten().collect()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, invocation_id: Uuid, kind: ConversionEventKind) -> ConversionEvent {
        let events = self.by_invocation.entry(invocation_id).or_default();
        let event = ConversionEvent { seq: events.len() as u64,
                                      invocation_id,
                                      kind,
                                      ts: Utc::now() };
        events.push(event.clone());
        event
    }

    fn list(&self, invocation_id: Uuid) -> Vec<ConversionEvent> {
        self.by_invocation.get(&invocation_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_per_invocation() {
        let mut store = InMemoryEventStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.append_kind(a, ConversionEventKind::InvocationStarted { business_key: None });
        store.append_kind(b, ConversionEventKind::InvocationStarted { business_key: None });
        let second = store.append_kind(a, ConversionEventKind::OutputSkipped { property: "resultJson".into() });
        assert_eq!(second.seq, 1);
        assert_eq!(store.list(b).len(), 1);
        assert!(store.list(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn invocations_keep_arrival_order() {
        let mut store = InMemoryEventStore::default();
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            store.append_kind(*id, ConversionEventKind::InvocationStarted { business_key: None });
        }
        store.append_kind(ids[0], ConversionEventKind::OutputSkipped { property: "resultList".into() });
        assert_eq!(store.invocations().collect::<Vec<_>>(), ids);

        let events = store.into_events();
        assert_eq!(events.len(), 5);
        assert_eq!(events[1].invocation_id, ids[0]);
        assert_eq!(events[1].seq, 1);
    }
}
