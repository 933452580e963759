//! Despacho de salidas hacia el host.
//!
//! `OutputDispatcher::plan` es puro: decide qué acciones corresponden a la
//! configuración y serializa el dataset. `apply` ejecuta esas acciones en
//! orden contra un `OutputSink`. Como la serialización ocurre al planificar,
//! un fallo de serialización aborta antes de cualquier escritura.
//!
//! Orden de despacho: `resultJson`, `resultList`, `processToStart` (una
//! instancia por fila, secuencial; la instancia n se pide cuando la n-1 ya
//! retornó).
use serde::{Deserialize, Serialize};

use crate::config::TaskConfiguration;
use crate::constants::{PROCESS_TO_START, RESULT_JSON, RESULT_LIST};
use crate::errors::DispatchError;
use crate::event::{ConversionEventKind, EventRecorder};
use crate::model::{Dataset, OutputAction, OutputValue, Row};

/// Operaciones del host que reciben las salidas.
pub trait OutputSink {
    /// Escribe una variable de salida con nombre.
    fn set_output(&mut self, name: &str, value: OutputValue) -> Result<(), String>;

    /// Inicia una instancia de `process_key` con la fila como variables y
    /// devuelve su identificador.
    fn start_instance(&mut self, process_key: &str, business_key: Option<&str>, variables: &Row)
                      -> Result<String, String>;
}

/// Política ante fallos de acciones individuales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// El primer fallo aborta el resto del despacho.
    #[default]
    FailFast,
    /// Un fallo al iniciar la instancia de una fila se registra y se sigue con
    /// la siguiente. Las escrituras de variables siguen siendo fail-fast.
    ContinueSpawns,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub variables_written: Vec<String>,
    pub instances_started: Vec<String>,
    pub failed_spawns: Vec<DispatchError>,
}

#[derive(Debug, Clone, Default)]
pub struct OutputDispatcher {
    policy: FailurePolicy,
}

impl OutputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    /// Acciones a ejecutar para `config`, en orden de despacho.
    ///
    /// `DispatchError::Serialization` se conserva para el contrato del
    /// despacho, pero con filas `IndexMap<String, String>` `serde_json` no
    /// tiene forma de fallar, así que ningún test puede provocarlo.
    pub fn plan(config: &TaskConfiguration,
                dataset: &Dataset,
                business_key: Option<&str>)
                -> Result<Vec<OutputAction>, DispatchError> {
        let mut actions = Vec::new();

        if let Some(name) = &config.result_json {
            let json = dataset.to_json().map_err(|e| DispatchError::Serialization { variable: name.clone(),
                                                                                   message: e.to_string() })?;
            actions.push(OutputAction::SetVariable { name: name.clone(),
                                                     value: OutputValue::Json(json) });
        }

        if let Some(name) = &config.result_list {
            actions.push(OutputAction::SetVariable { name: name.clone(),
                                                     value: OutputValue::List(dataset.rows.clone()) });
        }

        if let Some(process_key) = &config.process_to_start {
            for (row_index, row) in dataset.rows.iter().enumerate() {
                actions.push(OutputAction::StartInstance { process_key: process_key.clone(),
                                                           business_key: business_key.map(str::to_string),
                                                           row_index,
                                                           variables: row.clone() });
            }
        }

        Ok(actions)
    }

    /// Ejecuta `actions` en orden contra `sink`.
    pub fn apply<S>(&self,
                    actions: Vec<OutputAction>,
                    sink: &mut S,
                    recorder: &mut EventRecorder<'_>)
                    -> Result<DispatchReport, DispatchError>
        where S: OutputSink + ?Sized
    {
        let mut report = DispatchReport::default();
        for action in actions {
            match action {
                OutputAction::SetVariable { name, value } => {
                    let format = value.format_name().to_string();
                    sink.set_output(&name, value)
                        .map_err(|reason| DispatchError::SinkRejected { variable: name.clone(), reason })?;
                    recorder.record(ConversionEventKind::VariableWritten { variable: name.clone(), format });
                    report.variables_written.push(name);
                }
                OutputAction::StartInstance { process_key,
                                              business_key,
                                              row_index,
                                              variables, } => {
                    match sink.start_instance(&process_key, business_key.as_deref(), &variables) {
                        Ok(instance_id) => {
                            let started = ConversionEventKind::InstanceStarted { process_key,
                                                                                 row_index,
                                                                                 instance_id: instance_id.clone() };
                            recorder.record(started);
                            report.instances_started.push(instance_id);
                        }
                        Err(reason) => {
                            let err = DispatchError::SpawnFailed { process_key: process_key.clone(),
                                                                   row_index,
                                                                   reason: reason.clone() };
                            if self.policy == FailurePolicy::FailFast {
                                return Err(err);
                            }
                            recorder.record(ConversionEventKind::SpawnFailed { process_key, row_index, reason });
                            report.failed_spawns.push(err);
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    /// Registra un `OutputSkipped` por cada clave reconocida ausente.
    pub fn record_skipped(config: &TaskConfiguration, recorder: &mut EventRecorder<'_>) {
        let requested = config.requested_outputs();
        for property in [RESULT_JSON, RESULT_LIST, PROCESS_TO_START] {
            if !requested.contains(&property) {
                recorder.record(ConversionEventKind::OutputSkipped { property: property.to_string() });
            }
        }
    }

    /// Registra las salidas no solicitadas, planifica y aplica.
    pub fn dispatch<S>(&self,
                       config: &TaskConfiguration,
                       dataset: &Dataset,
                       business_key: Option<&str>,
                       sink: &mut S,
                       recorder: &mut EventRecorder<'_>)
                       -> Result<DispatchReport, DispatchError>
        where S: OutputSink + ?Sized
    {
        Self::record_skipped(config, recorder);
        let actions = Self::plan(config, dataset, business_key)?;
        self.apply(actions, sink, recorder)
    }
}
