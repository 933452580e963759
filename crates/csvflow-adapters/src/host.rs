//! Contrato del host (motor de workflow) visto desde el conversor.
use csvflow_core::{OutputSink, TaskMetadata};
use serde::{Deserialize, Serialize};

/// Valor de una variable de proceso.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableValue {
    /// Contenido binario (p. ej. un archivo subido).
    Bytes(Vec<u8>),
    Text(String),
    /// Cualquier otro valor estructurado; no se puede leer como CSV.
    Json(serde_json::Value),
}

impl VariableValue {
    /// Bytes legibles como stream, si el valor es de archivo o texto.
    pub fn as_stream(&self) -> Option<&[u8]> {
        match self {
            VariableValue::Bytes(b) => Some(b.as_slice()),
            VariableValue::Text(s) => Some(s.as_bytes()),
            VariableValue::Json(_) => None,
        }
    }
}

/// Lo que una invocación consume del host. Las operaciones de salida vienen
/// de `OutputSink`.
pub trait TaskHost: OutputSink {
    /// Metadata declarativa del paso que invoca al conversor.
    fn task_metadata(&self) -> &TaskMetadata;

    /// Business key de la instancia actual, heredada por las instancias hijas.
    fn business_key(&self) -> Option<&str>;

    fn variable(&self, name: &str) -> Option<&VariableValue>;
}
