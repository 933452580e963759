//! Acciones de salida que el dispatcher entrega al host.
use serde::{Deserialize, Serialize};

use super::Row;

/// Valor escrito en una variable de salida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "snake_case")]
pub enum OutputValue {
    /// Dataset serializado como arreglo JSON de objetos.
    Json(String),
    /// Dataset como lista estructurada (sin serializar).
    List(Vec<Row>),
}

impl OutputValue {
    pub fn format_name(&self) -> &'static str {
        match self {
            OutputValue::Json(_) => "json",
            OutputValue::List(_) => "list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputAction {
    SetVariable { name: String, value: OutputValue },
    /// Una instancia nueva de `process_key` por fila, con la fila como
    /// variables de entrada.
    StartInstance {
        process_key: String,
        business_key: Option<String>,
        row_index: usize,
        variables: Row,
    },
}
