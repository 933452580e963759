//! Modelos de la invocación (Dataset, metadata de la tarea, acciones de salida).

pub mod dataset;
pub mod metadata;
pub mod output;

pub use dataset::{Dataset, Row};
pub use metadata::{ExtensionElement, PropertyDeclaration, TaskMetadata};
pub use output::{OutputAction, OutputValue};
