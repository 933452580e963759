//! Tipos de evento de la conversión y estructura `ConversionEvent`.
use chrono::{DateTime, Utc};
use log::Level;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PropertyBag;
use crate::errors::ConverterError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConversionEventKind {
    /// Primer evento de cada invocación.
    InvocationStarted { business_key: Option<String> },
    ConfigurationResolved { properties: PropertyBag },
    /// Clave de salida reconocida ausente: no se produce esa salida.
    OutputSkipped { property: String },
    DatasetParsed { columns: usize, row_count: usize, fingerprint: String },
    VariableWritten { variable: String, format: String },
    InstanceStarted { process_key: String, row_index: usize, instance_id: String },
    /// Sólo bajo `FailurePolicy::ContinueSpawns`; con fail-fast el error
    /// termina la invocación.
    SpawnFailed { process_key: String, row_index: usize, reason: String },
    InvocationCompleted { variables_written: usize, instances_started: usize },
    InvocationFailed { error: ConverterError },
}

impl ConversionEventKind {
    pub fn level(&self) -> Level {
        match self {
            ConversionEventKind::InvocationStarted { .. }
            | ConversionEventKind::VariableWritten { .. }
            | ConversionEventKind::InstanceStarted { .. }
            | ConversionEventKind::InvocationCompleted { .. } => Level::Info,
            ConversionEventKind::ConfigurationResolved { .. }
            | ConversionEventKind::OutputSkipped { .. }
            | ConversionEventKind::DatasetParsed { .. } => Level::Debug,
            ConversionEventKind::SpawnFailed { .. } => Level::Warn,
            ConversionEventKind::InvocationFailed { .. } => Level::Error,
        }
    }

    /// Etiqueta compacta, útil para asserts sobre la secuencia.
    pub fn tag(&self) -> &'static str {
        match self {
            ConversionEventKind::InvocationStarted { .. } => "I",
            ConversionEventKind::ConfigurationResolved { .. } => "R",
            ConversionEventKind::OutputSkipped { .. } => "K",
            ConversionEventKind::DatasetParsed { .. } => "P",
            ConversionEventKind::VariableWritten { .. } => "W",
            ConversionEventKind::InstanceStarted { .. } => "S",
            ConversionEventKind::SpawnFailed { .. } => "X",
            ConversionEventKind::InvocationCompleted { .. } => "C",
            ConversionEventKind::InvocationFailed { .. } => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEvent {
    pub seq: u64,
    pub invocation_id: Uuid,
    pub kind: ConversionEventKind,
    pub ts: DateTime<Utc>,
}
