//! Metadata declarativa adjunta al paso del workflow.
//!
//! El host expone una lista ordenada de elementos de extensión; uno de ellos
//! debería ser el contenedor de propiedades `name`/`value` que configura la
//! conversión. Los demás elementos se ignoran.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    pub value: String,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionElement {
    /// Contenedor de propiedades declarativas.
    Properties(Vec<PropertyDeclaration>),
    /// Cualquier otro elemento (listeners, io mappings...).
    Other { element_type: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub extension_elements: Vec<ExtensionElement>,
}

impl TaskMetadata {
    pub fn new(extension_elements: Vec<ExtensionElement>) -> Self {
        Self { extension_elements }
    }

    /// Metadata con un único contenedor de propiedades.
    pub fn with_properties<I, K, V>(props: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<String>,
              V: Into<String>
    {
        let decls = props.into_iter().map(|(k, v)| PropertyDeclaration::new(k, v)).collect();
        Self::new(vec![ExtensionElement::Properties(decls)])
    }

    /// Contenedores de propiedades en orden de declaración.
    pub fn properties_containers(&self) -> impl Iterator<Item = &[PropertyDeclaration]> {
        self.extension_elements.iter().filter_map(|e| match e {
                                          ExtensionElement::Properties(p) => Some(p.as_slice()),
                                          ExtensionElement::Other { .. } => None,
                                      })
    }
}
