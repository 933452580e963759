//! csvflow-adapters: frontera con el motor de workflow.
//!
//! - `TaskHost`: lo que el conversor necesita del host (variables, metadata,
//!   business key, escritura de salidas e inicio de instancias).
//! - `InMemoryTaskHost`: host en memoria para tests y para la CLI.
//! - `CsvConverterTask`: adaptador delgado que ejecuta una invocación
//!   completa contra un host.

pub mod host;
pub mod memory;
pub mod task;

pub use host::{TaskHost, VariableValue};
pub use memory::{InMemoryTaskHost, StartedInstance};
pub use task::{CsvConverterTask, TaskOutcome};
