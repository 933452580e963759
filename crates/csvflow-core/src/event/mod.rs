//! Log de eventos de una invocación (canal lateral).
//!
//! Los eventos no gobiernan el control de flujo: describen lo que ocurrió
//! para que el host o los tests puedan inspeccionarlo. Cada evento se emite
//! además como registro `log`.

mod recorder;
mod store;
mod types;

pub use recorder::EventRecorder;
pub use store::{EventStore, InMemoryEventStore};
pub use types::{ConversionEvent, ConversionEventKind};
