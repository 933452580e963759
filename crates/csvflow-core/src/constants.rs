//! Constantes del conversor.
//!
//! Nombres de las propiedades de extensión reconocidas en la metadata de la
//! tarea. Su presencia (no su valor) decide qué salidas se producen, salvo
//! `fileVariableName`, que es obligatoria.

/// Variable del proceso que contiene el CSV de entrada (obligatoria).
pub const FILE_VARIABLE_NAME: &str = "fileVariableName";

/// Variable de salida que recibe el dataset serializado a JSON.
pub const RESULT_JSON: &str = "resultJson";

/// Variable de salida que recibe el dataset como lista estructurada.
pub const RESULT_LIST: &str = "resultList";

/// Definición de proceso a instanciar una vez por fila.
pub const PROCESS_TO_START: &str = "processToStart";

/// Delimitador por defecto entre celdas.
pub const DEFAULT_DELIMITER: char = ',';
