//! csvflow-core: conversión CSV → salidas de workflow.
//!
//! Tres etapas por invocación:
//! - `config`: resuelve y valida las propiedades de la tarea.
//! - `parser`: convierte el stream en header + filas.
//! - `dispatch`: planifica y entrega las salidas (JSON, lista, instancias).
//!
//! Nada persiste entre invocaciones; el host queda detrás de `OutputSink`.
pub mod config;
pub mod constants;
pub mod convert;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod parser;

pub use config::{ConfigurationResolver, PropertyBag, TaskConfiguration};
pub use convert::{convert, Conversion};
pub use dispatch::{DispatchReport, FailurePolicy, OutputDispatcher, OutputSink};
pub use errors::{ConfigurationError, ConverterError, DispatchError, ParseError};
pub use event::{ConversionEvent, ConversionEventKind, EventRecorder, EventStore, InMemoryEventStore};
pub use model::{Dataset, ExtensionElement, OutputAction, OutputValue, PropertyDeclaration, Row, TaskMetadata};
pub use parser::{CsvParser, ShortRowPolicy};
