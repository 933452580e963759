//! Conversión pura: stream + configuración → dataset y acciones de salida.
//!
//! No toca al host; el adaptador aplica las acciones con
//! `OutputDispatcher::apply`.
use std::io::Read;

use crate::config::TaskConfiguration;
use crate::dispatch::OutputDispatcher;
use crate::errors::ConverterError;
use crate::model::{Dataset, OutputAction};
use crate::parser::CsvParser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub dataset: Dataset,
    pub actions: Vec<OutputAction>,
}

pub fn convert<R: Read>(input: R,
                        config: &TaskConfiguration,
                        parser: &CsvParser,
                        business_key: Option<&str>)
                        -> Result<Conversion, ConverterError> {
    let dataset = parser.parse(input)?;
    let actions = OutputDispatcher::plan(config, &dataset, business_key)?;
    Ok(Conversion { dataset, actions })
}
