//! Resolución de la configuración de la tarea.
//!
//! Dos pasos:
//! 1. `ConfigurationResolver::resolve` aplana el único contenedor de
//!    propiedades de la metadata en un `PropertyBag`.
//! 2. `TaskConfiguration::from_properties` valida ese bag y produce el
//!    registro tipado que consumen parser y dispatcher.
//!
//! Se resuelve de nuevo en cada invocación; no hay cache.
use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{FILE_VARIABLE_NAME, PROCESS_TO_START, RESULT_JSON, RESULT_LIST};
use crate::errors::ConfigurationError;
use crate::model::TaskMetadata;

/// Bag plano nombre → valor de las propiedades declaradas.
pub type PropertyBag = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationResolver;

impl ConfigurationResolver {
    /// Extrae las propiedades del único contenedor presente en `metadata`.
    ///
    /// Un nombre declarado dos veces conserva el último valor.
    pub fn resolve(metadata: &TaskMetadata) -> Result<PropertyBag, ConfigurationError> {
        let containers: Vec<_> = metadata.properties_containers().collect();
        let decls = match containers.as_slice() {
            [] => return Err(ConfigurationError::MissingPropertiesContainer),
            [single] => *single,
            many => return Err(ConfigurationError::MultiplePropertiesContainers(many.len())),
        };

        let mut bag = PropertyBag::new();
        for d in decls {
            if let Some(prev) = bag.insert(d.name.clone(), d.value.clone()) {
                debug!("task property `{}` declared twice, `{}` replaced by `{}`", d.name, prev, d.value);
            }
        }
        Ok(bag)
    }
}

/// Configuración tipada de una invocación.
///
/// Las salidas opcionales se activan por presencia de la clave; el valor
/// nombra la variable (o proceso) destino.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfiguration {
    pub file_variable_name: String,
    pub result_json: Option<String>,
    pub result_list: Option<String>,
    pub process_to_start: Option<String>,
    /// Bag original, incluidas claves no reconocidas.
    pub properties: PropertyBag,
}

impl TaskConfiguration {
    /// Valida el bag. Sólo `fileVariableName` es obligatoria.
    pub fn from_properties(properties: PropertyBag) -> Result<Self, ConfigurationError> {
        let file_variable_name = properties.get(FILE_VARIABLE_NAME)
                                           .cloned()
                                           .ok_or(ConfigurationError::MissingFileVariableName)?;
        Ok(Self { file_variable_name,
                  result_json: properties.get(RESULT_JSON).cloned(),
                  result_list: properties.get(RESULT_LIST).cloned(),
                  process_to_start: properties.get(PROCESS_TO_START).cloned(),
                  properties })
    }

    /// Resolver + validación en un solo paso.
    pub fn resolve(metadata: &TaskMetadata) -> Result<Self, ConfigurationError> {
        Self::from_properties(ConfigurationResolver::resolve(metadata)?)
    }

    /// Nombres de las claves reconocidas presentes, en orden de despacho.
    pub fn requested_outputs(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.result_json.is_some() {
            out.push(RESULT_JSON);
        }
        if self.result_list.is_some() {
            out.push(RESULT_LIST);
        }
        if self.process_to_start.is_some() {
            out.push(PROCESS_TO_START);
        }
        out
    }
}
