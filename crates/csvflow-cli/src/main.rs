mod config;

use std::fmt;
use std::path::PathBuf;
use std::process::exit;

use csvflow_adapters::{CsvConverterTask, InMemoryTaskHost, VariableValue};
use csvflow_core::constants::FILE_VARIABLE_NAME;
use csvflow_core::{ConverterError, CsvParser, EventStore, FailurePolicy, InMemoryEventStore, ShortRowPolicy,
                   TaskMetadata};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use crate::config::{CliDefaults, DEFAULTS};

const USAGE: &str = "Uso: csvflow convert --file <PATH> [--prop <KEY=VALUE>]... [--business-key <KEY>] \
                     [--delimiter <CHAR>] [--deploy <PROCESS_KEY>]... [--pad-short-rows] [--continue-spawns]";

#[derive(Debug, Default)]
struct ConvertArgs {
    file: Option<PathBuf>,
    props: Vec<(String, String)>,
    business_key: Option<String>,
    delimiter: Option<char>,
    deployed: Vec<String>,
    pad_short_rows: bool,
    continue_spawns: bool,
}

fn parse_convert_args(args: &[String]) -> Result<ConvertArgs, String> {
    let mut out = ConvertArgs::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().cloned().ok_or_else(|| format!("falta valor para {flag}"));
        match arg.as_str() {
            "--file" => out.file = Some(PathBuf::from(value("--file")?)),
            "--prop" => {
                let raw = value("--prop")?;
                let (k, v) = raw.split_once('=').ok_or_else(|| format!("--prop espera KEY=VALUE, recibido `{raw}`"))?;
                out.props.push((k.to_string(), v.to_string()));
            }
            "--business-key" => out.business_key = Some(value("--business-key")?),
            "--delimiter" => {
                let raw = value("--delimiter")?;
                out.delimiter = Some(raw.chars().next().ok_or("--delimiter vacío")?);
            }
            "--deploy" => out.deployed.push(value("--deploy")?),
            "--pad-short-rows" => out.pad_short_rows = true,
            "--continue-spawns" => out.continue_spawns = true,
            other => return Err(format!("argumento desconocido `{other}`")),
        }
    }
    Ok(out)
}

fn exit_code(err: &ConverterError) -> i32 {
    match err {
        ConverterError::Configuration(_) => 3,
        ConverterError::Parse(_) => 4,
        ConverterError::Dispatch(_) => 5,
    }
}

/// Por qué terminó mal `convert`; cada variante tiene su código de salida.
#[derive(Debug)]
enum ConvertFailure {
    Usage,
    Unreadable { path: PathBuf, message: String },
    Converter(ConverterError),
}

impl ConvertFailure {
    fn exit_code(&self) -> i32 {
        match self {
            ConvertFailure::Usage => 2,
            ConvertFailure::Unreadable { .. } => 3,
            ConvertFailure::Converter(e) => exit_code(e),
        }
    }
}

impl fmt::Display for ConvertFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertFailure::Usage => f.write_str(USAGE),
            ConvertFailure::Unreadable { path, message } => write!(f, "no se pudo leer {}: {message}", path.display()),
            ConvertFailure::Converter(e) => write!(f, "{e}"),
        }
    }
}

/// Carga el archivo en un host en memoria, ejecuta la tarea y arma el
/// resumen JSON que se imprime por stdout.
fn convert_file(args: ConvertArgs, defaults: &CliDefaults) -> Result<Value, ConvertFailure> {
    let path = args.file.ok_or(ConvertFailure::Usage)?;
    let bytes = std::fs::read(&path).map_err(|e| ConvertFailure::Unreadable { message: e.to_string(),
                                                                                path: path.clone() })?;

    let mut props = args.props;
    let file_variable = match props.iter().rev().find(|(k, _)| k == FILE_VARIABLE_NAME) {
        Some((_, v)) => v.clone(),
        None => {
            props.insert(0, (FILE_VARIABLE_NAME.to_string(), defaults.file_variable.clone()));
            defaults.file_variable.clone()
        }
    };

    let mut host = InMemoryTaskHost::new(TaskMetadata::with_properties(props))
        .with_variable(file_variable, VariableValue::Bytes(bytes));
    if let Some(bk) = args.business_key.or_else(|| defaults.business_key.clone()) {
        host = host.with_business_key(bk);
    }
    if !args.deployed.is_empty() {
        host = host.with_deployed_processes(args.deployed);
    }

    let parser = CsvParser::new().with_delimiter(args.delimiter.unwrap_or(defaults.delimiter));
    let mut task = CsvConverterTask::new().with_parser(parser);
    if args.pad_short_rows {
        task = task.with_short_row_policy(ShortRowPolicy::PadEmpty);
    }
    if args.continue_spawns {
        task = task.with_failure_policy(FailurePolicy::ContinueSpawns);
    }

    let mut store = InMemoryEventStore::default();
    let outcome = task.execute(&mut host, &mut store).map_err(ConvertFailure::Converter)?;
    let failed: Vec<String> = outcome.report.failed_spawns.iter().map(|e| e.to_string()).collect();
    Ok(json!({
        "invocation_id": outcome.invocation_id,
        "row_count": outcome.dataset.len(),
        "fingerprint": outcome.dataset.fingerprint(),
        "variables": host.outputs,
        "started": host.started,
        "failed_spawns": failed,
        "events": store.list(outcome.invocation_id),
    }))
}

fn run_convert(args: ConvertArgs) -> i32 {
    match convert_file(args, &DEFAULTS) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(s) => {
                println!("{s}");
                0
            }
            Err(e) => {
                eprintln!("[csvflow convert] no se pudo serializar el resumen: {e}");
                5
            }
        },
        Err(ConvertFailure::Usage) => {
            eprintln!("{USAGE}");
            2
        }
        Err(failure) => {
            eprintln!("[csvflow convert] {failure}");
            failure.exit_code()
        }
    }
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env())
                             .with_writer(std::io::stderr)
                             .init();

    let args: Vec<String> = std::env::args().collect();
    let code = match args.get(1).map(String::as_str) {
        Some("convert") => match parse_convert_args(&args[2..]) {
            Ok(a) => run_convert(a),
            Err(msg) => {
                eprintln!("{msg}\n{USAGE}");
                2
            }
        },
        _ => {
            eprintln!("{USAGE}");
            2
        }
    };
    exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_repeated_props_and_flags() {
        let a = parse_convert_args(&strings(&["--file",
                                               "data.csv",
                                               "--prop",
                                               "resultList=rows",
                                               "--prop",
                                               "processToStart=Child",
                                               "--continue-spawns"])).expect("args");
        assert_eq!(a.file, Some(PathBuf::from("data.csv")));
        assert_eq!(a.props.len(), 2);
        assert_eq!(a.props[1], ("processToStart".to_string(), "Child".to_string()));
        assert!(a.continue_spawns);
        assert!(!a.pad_short_rows);
    }

    #[test]
    fn prop_without_equals_is_rejected() {
        assert!(parse_convert_args(&strings(&["--prop", "resultList"])).is_err());
    }

    #[test]
    fn missing_flag_value_is_rejected() {
        assert!(parse_convert_args(&strings(&["--file"])).is_err());
    }

    fn defaults() -> CliDefaults {
        CliDefaults { delimiter: ',',
                      file_variable: "upload".to_string(),
                      business_key: Some("env-bk".to_string()) }
    }

    fn csv_file(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("input.csv");
        std::fs::write(&path, content).expect("write csv");
        path
    }

    #[test]
    fn unreadable_file_exits_with_configuration_code() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = ConvertArgs { file: Some(dir.path().join("absent.csv")),
                                 ..Default::default() };
        let failure = convert_file(args, &defaults()).unwrap_err();
        assert!(matches!(failure, ConvertFailure::Unreadable { .. }), "got {failure:?}");
        assert_eq!(failure.exit_code(), 3);
    }

    #[test]
    fn missing_file_flag_is_a_usage_error() {
        let failure = convert_file(ConvertArgs::default(), &defaults()).unwrap_err();
        assert_eq!(failure.exit_code(), 2);
    }

    #[test]
    fn default_file_variable_and_business_key_are_injected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = ConvertArgs { file: Some(csv_file(&dir, "name,age\nAlice,30\nBob,25\n")),
                                 props: vec![("resultList".into(), "rows".into()),
                                             ("processToStart".into(), "ChildFlow".into())],
                                 ..Default::default() };
        let summary = convert_file(args, &defaults()).expect("summary");

        let resolved = summary["events"].as_array()
                                        .and_then(|events| events.iter().find_map(|e| e["kind"].get("ConfigurationResolved")))
                                        .expect("configuration event");
        assert_eq!(resolved["properties"][FILE_VARIABLE_NAME], "upload");
        assert_eq!(summary["started"][0]["business_key"], "env-bk");
    }

    #[test]
    fn summary_reports_rows_variables_and_events() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = ConvertArgs { file: Some(csv_file(&dir, "sku;qty\nA-1;3\n")),
                                 props: vec![(FILE_VARIABLE_NAME.into(), "csv".into()),
                                             ("resultList".into(), "rows".into())],
                                 delimiter: Some(';'),
                                 business_key: Some("cli-bk".into()),
                                 ..Default::default() };
        let summary = convert_file(args, &defaults()).expect("summary");

        assert_eq!(summary["row_count"], 1);
        assert!(summary["fingerprint"].as_str().is_some_and(|h| !h.is_empty()));
        assert_eq!(summary["variables"]["rows"]["value"], json!([{"sku": "A-1", "qty": "3"}]));
        assert_eq!(summary["started"], json!([]));
        assert_eq!(summary["failed_spawns"], json!([]));
        assert!(summary["events"].as_array().is_some_and(|e| e.len() >= 4));
    }

    #[test]
    fn parse_failure_maps_to_parse_exit_code() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = ConvertArgs { file: Some(csv_file(&dir, "")),
                                 ..Default::default() };
        assert_eq!(convert_file(args, &defaults()).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let e: ConverterError = csvflow_core::ParseError::MissingHeader.into();
        assert_eq!(exit_code(&e), 4);
    }
}
