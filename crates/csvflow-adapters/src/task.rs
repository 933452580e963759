//! `CsvConverterTask`: una invocación completa contra un `TaskHost`.
//!
//! Secuencia: resolver configuración → leer la variable de entrada →
//! `convert` (parseo + plan de acciones) → aplicar las acciones sobre el
//! host. Cualquier error termina la invocación y queda registrado como
//! `InvocationFailed`.
use csvflow_core::{convert, ConfigurationError, Conversion, ConversionEventKind, ConverterError, CsvParser, Dataset,
                   DispatchReport, EventRecorder, EventStore, FailurePolicy, OutputDispatcher, ShortRowPolicy,
                   TaskConfiguration};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::host::TaskHost;

/// Resultado de una invocación exitosa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub invocation_id: Uuid,
    pub configuration: TaskConfiguration,
    pub dataset: Dataset,
    pub report: DispatchReport,
}

#[derive(Debug, Clone, Default)]
pub struct CsvConverterTask {
    parser: CsvParser,
    dispatcher: OutputDispatcher,
}

impl CsvConverterTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(mut self, parser: CsvParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_short_row_policy(mut self, policy: ShortRowPolicy) -> Self {
        self.parser = self.parser.with_short_row_policy(policy);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.dispatcher = OutputDispatcher::with_policy(policy);
        self
    }

    /// Ejecuta la conversión con un `invocation_id` nuevo.
    pub fn execute<H>(&self, host: &mut H, events: &mut dyn EventStore) -> Result<TaskOutcome, ConverterError>
        where H: TaskHost + ?Sized
    {
        let mut recorder = EventRecorder::new(events, Uuid::new_v4());
        recorder.record(ConversionEventKind::InvocationStarted { business_key: host.business_key()
                                                                                  .map(str::to_string) });
        match self.run(host, &mut recorder) {
            Ok(outcome) => {
                recorder.record(ConversionEventKind::InvocationCompleted {
                    variables_written: outcome.report.variables_written.len(),
                    instances_started: outcome.report.instances_started.len(),
                });
                Ok(outcome)
            }
            Err(error) => {
                recorder.record(ConversionEventKind::InvocationFailed { error: error.clone() });
                Err(error)
            }
        }
    }

    fn run<H>(&self, host: &mut H, recorder: &mut EventRecorder<'_>) -> Result<TaskOutcome, ConverterError>
        where H: TaskHost + ?Sized
    {
        let configuration = TaskConfiguration::resolve(host.task_metadata())?;
        recorder.record(ConversionEventKind::ConfigurationResolved { properties: configuration.properties.clone() });

        let business_key = host.business_key().map(str::to_string);
        let Conversion { dataset, actions } = {
            let stream = input_stream(&*host, &configuration)?;
            convert(stream, &configuration, &self.parser, business_key.as_deref())?
        };
        recorder.record(ConversionEventKind::DatasetParsed { columns: dataset.header.len(),
                                                             row_count: dataset.len(),
                                                             fingerprint: dataset.fingerprint() });

        OutputDispatcher::record_skipped(&configuration, recorder);
        let report = self.dispatcher.apply(actions, host, recorder)?;

        Ok(TaskOutcome { invocation_id: recorder.invocation_id,
                         configuration,
                         dataset,
                         report })
    }
}

/// Bytes de la variable nombrada por `fileVariableName`.
fn input_stream<'h, H>(host: &'h H, configuration: &TaskConfiguration) -> Result<&'h [u8], ConfigurationError>
    where H: TaskHost + ?Sized
{
    let name = &configuration.file_variable_name;
    let value = host.variable(name)
                    .ok_or_else(|| ConfigurationError::MissingInputVariable(name.clone()))?;
    value.as_stream()
         .ok_or_else(|| ConfigurationError::UnreadableInputVariable(name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::VariableValue;
    use crate::memory::InMemoryTaskHost;
    use csvflow_core::constants::{FILE_VARIABLE_NAME, PROCESS_TO_START, RESULT_JSON, RESULT_LIST};
    use csvflow_core::{InMemoryEventStore, OutputAction, OutputValue, ParseError, TaskMetadata};

    fn host(props: &[(&str, &str)], csv: Option<&str>) -> InMemoryTaskHost {
        let h = InMemoryTaskHost::new(TaskMetadata::with_properties(props.iter().copied()));
        match csv {
            Some(text) => h.with_variable("csv", VariableValue::Bytes(text.as_bytes().to_vec())),
            None => h,
        }
    }

    #[test]
    fn missing_input_variable_names_the_variable() {
        let mut h = host(&[(FILE_VARIABLE_NAME, "csv")], None);
        let mut store = InMemoryEventStore::default();
        let err = CsvConverterTask::new().execute(&mut h, &mut store).unwrap_err();
        assert_eq!(err, ConverterError::Configuration(ConfigurationError::MissingInputVariable("csv".into())));
    }

    #[test]
    fn structured_variable_is_not_readable() {
        let mut h = host(&[(FILE_VARIABLE_NAME, "csv")], None)
            .with_variable("csv", VariableValue::Json(serde_json::json!({"not": "a stream"})));
        let mut store = InMemoryEventStore::default();
        let err = CsvConverterTask::new().execute(&mut h, &mut store).unwrap_err();
        assert_eq!(err, ConverterError::Configuration(ConfigurationError::UnreadableInputVariable("csv".into())));
    }

    #[test]
    fn failed_invocation_is_recorded_and_writes_nothing() {
        let mut h = host(&[(FILE_VARIABLE_NAME, "csv"), (RESULT_JSON, "json")], Some(""));
        let mut store = InMemoryEventStore::default();
        let err = CsvConverterTask::new().execute(&mut h, &mut store).unwrap_err();
        assert_eq!(err, ConverterError::Parse(ParseError::MissingHeader));
        assert!(h.outputs.is_empty());

        let events = store.into_events();
        assert!(matches!(events.last().map(|e| &e.kind), Some(ConversionEventKind::InvocationFailed { .. })));
    }

    #[test]
    fn text_variable_is_accepted() {
        let mut h = host(&[(FILE_VARIABLE_NAME, "csv"), (RESULT_JSON, "json")], None)
            .with_variable("csv", VariableValue::Text("a\n1".into()));
        let mut store = InMemoryEventStore::default();
        let outcome = CsvConverterTask::new().execute(&mut h, &mut store).expect("execute");
        assert_eq!(outcome.report.variables_written, vec!["json"]);
    }

    #[test]
    fn execute_applies_exactly_the_converted_actions() {
        let csv = "name,age\rAlice,30\rBob,25";
        let props = [(FILE_VARIABLE_NAME, "csv"), (RESULT_LIST, "rows"), (PROCESS_TO_START, "ChildFlow")];
        let mut h = host(&props, Some(csv)).with_business_key("bk-1");
        let mut store = InMemoryEventStore::default();
        let outcome = CsvConverterTask::new().execute(&mut h, &mut store).expect("execute");

        let conversion =
            convert(csv.as_bytes(), &outcome.configuration, &CsvParser::new(), Some("bk-1")).expect("convert");
        assert_eq!(conversion.dataset, outcome.dataset);
        assert_eq!(conversion.actions.len(), 3);
        for action in &conversion.actions {
            match action {
                OutputAction::SetVariable { name, value: OutputValue::List(rows) } => {
                    assert_eq!(h.output(name), Some(&OutputValue::List(rows.clone())));
                }
                OutputAction::StartInstance { row_index, variables, .. } => {
                    assert_eq!(&h.started[*row_index].variables, variables);
                    assert_eq!(h.started[*row_index].business_key.as_deref(), Some("bk-1"));
                }
                other => panic!("unexpected action: {other:?}"),
            }
        }
    }
}
