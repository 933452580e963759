//! Filas y dataset producidos por el parser.
//!
//! Una `Row` mapea nombre de columna → texto de la celda. Usamos `IndexMap`
//! para que la serialización respete el orden del header; si el header
//! repite un nombre, la celda posterior reemplaza a la anterior en la misma
//! posición.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hashing::hash_value;

/// Un registro de datos: columna → celda.
pub type Row = IndexMap<String, String>;

/// Header + filas en el orden de las líneas de entrada.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(header: Vec<String>) -> Self {
        Self { header, rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Arreglo JSON de objetos, una entrada por fila.
    pub fn to_value(&self) -> Value {
        Value::Array(self.rows
                         .iter()
                         .map(|r| Value::Object(r.iter().map(|(k, v)| (k.clone(), Value::String(v.clone()))).collect()))
                         .collect())
    }

    /// Serializa las filas como arreglo JSON de objetos.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.rows)
    }

    /// Hash estable del contenido (header + filas). Dos parseos del mismo
    /// stream producen el mismo fingerprint.
    pub fn fingerprint(&self) -> String {
        hash_value(&serde_json::json!({
            "header": self.header,
            "rows": self.to_value(),
        }))
    }
}
