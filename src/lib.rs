//! csvflow
//!
//! Librería de entrada del conversor CSV para pasos de workflow:
//! - Re-exporta el núcleo (`csvflow-core`) y los adaptadores de host
//!   (`csvflow-adapters`).
//! - `run_task` ejecuta una invocación con un log de eventos propio y
//!   devuelve ambos.
pub use csvflow_adapters::{CsvConverterTask, InMemoryTaskHost, StartedInstance, TaskHost, TaskOutcome,
                           VariableValue};
pub use csvflow_core::*;

use serde::Serialize;

/// Resultado de `run_task`: el outcome (o error) y los eventos registrados.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRun {
    pub result: Result<TaskOutcome, ConverterError>,
    pub events: Vec<ConversionEvent>,
}

/// Ejecuta `task` contra `host` con un `InMemoryEventStore` descartable.
pub fn run_task<H>(task: &CsvConverterTask, host: &mut H) -> TaskRun
    where H: TaskHost + ?Sized
{
    let mut store = InMemoryEventStore::default();
    let result = task.execute(host, &mut store);
    let events = store.into_events();
    TaskRun { result, events }
}
