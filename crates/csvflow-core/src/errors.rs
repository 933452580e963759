//! Errores del conversor, uno por etapa de la invocación.
//!
//! Todos se propagan al llamador como un único fallo fatal de la invocación;
//! `ConverterError` los agrupa para los adaptadores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata de la tarea ausente o mal formada, o variable de entrada inválida.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ConfigurationError {
    #[error("task metadata has no extension properties container")]
    MissingPropertiesContainer,
    #[error("task metadata has {0} extension properties containers, expected exactly one")]
    MultiplePropertiesContainers(usize),
    #[error("required task property `fileVariableName` is not set")]
    MissingFileVariableName,
    #[error("no CSV file found in process variable `{0}`")]
    MissingInputVariable(String),
    #[error("process variable `{0}` does not hold a readable byte or text stream")]
    UnreadableInputVariable(String),
}

/// Fallos al convertir el stream de texto en filas.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ParseError {
    #[error("missing header: the CSV stream is empty")]
    MissingHeader,
    #[error("line {line}: expected {expected} columns, found {actual}")]
    ShortRow { line: usize, expected: usize, actual: usize },
    #[error("line {line}: could not read input: {message}")]
    Read { line: usize, message: String },
}

/// Fallos al entregar las salidas al colaborador.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DispatchError {
    #[error("could not serialize dataset for `{variable}`: {message}")]
    Serialization { variable: String, message: String },
    #[error("host rejected output variable `{variable}`: {reason}")]
    SinkRejected { variable: String, reason: String },
    #[error("could not start instance of `{process_key}` for row {row_index}: {reason}")]
    SpawnFailed { process_key: String, row_index: usize, reason: String },
}

/// Error de una invocación completa.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ConverterError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("invalid CSV file: {0}")]
    Parse(#[from] ParseError),
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}
