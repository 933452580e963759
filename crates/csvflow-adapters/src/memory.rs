//! Host en memoria.
//!
//! Guarda variables y salidas en mapas y asigna un UUID a cada instancia
//! iniciada. Si se declaran procesos desplegados, iniciar uno desconocido
//! falla como lo haría un motor real.
use std::collections::{BTreeMap, BTreeSet};

use csvflow_core::{OutputSink, OutputValue, Row, TaskMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::host::{TaskHost, VariableValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedInstance {
    pub id: String,
    pub process_key: String,
    pub business_key: Option<String>,
    pub variables: Row,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskHost {
    pub metadata: TaskMetadata,
    pub business_key: Option<String>,
    pub variables: BTreeMap<String, VariableValue>,
    pub outputs: BTreeMap<String, OutputValue>,
    pub started: Vec<StartedInstance>,
    deployed: Option<BTreeSet<String>>,
    read_only: BTreeSet<String>,
}

impl InMemoryTaskHost {
    pub fn new(metadata: TaskMetadata) -> Self {
        Self { metadata, ..Default::default() }
    }

    pub fn with_business_key(mut self, key: impl Into<String>) -> Self {
        self.business_key = Some(key.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: VariableValue) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    /// Restringe `start_instance` a las claves de proceso dadas.
    pub fn with_deployed_processes<I, S>(mut self, keys: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.deployed = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Marca una variable como no escribible.
    pub fn with_read_only_variable(mut self, name: impl Into<String>) -> Self {
        self.read_only.insert(name.into());
        self
    }

    pub fn output(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }
}

impl OutputSink for InMemoryTaskHost {
    fn set_output(&mut self, name: &str, value: OutputValue) -> Result<(), String> {
        if self.read_only.contains(name) {
            return Err(format!("variable `{name}` is read-only"));
        }
        self.outputs.insert(name.to_string(), value);
        Ok(())
    }

    fn start_instance(&mut self, process_key: &str, business_key: Option<&str>, variables: &Row)
                      -> Result<String, String> {
        if let Some(deployed) = &self.deployed {
            if !deployed.contains(process_key) {
                return Err(format!("no process definition deployed with key `{process_key}`"));
            }
        }
        let id = Uuid::new_v4().to_string();
        self.started.push(StartedInstance { id: id.clone(),
                                            process_key: process_key.to_string(),
                                            business_key: business_key.map(str::to_string),
                                            variables: variables.clone() });
        Ok(id)
    }
}

impl TaskHost for InMemoryTaskHost {
    fn task_metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    fn business_key(&self) -> Option<&str> {
        self.business_key.as_deref()
    }

    fn variable(&self, name: &str) -> Option<&VariableValue> {
        self.variables.get(name)
    }
}
