//! Valores por defecto de la CLI desde variables de entorno.
//! Usa `.env` si existe; cada valor puede sobrescribirse por argumento.

use std::env;

use csvflow_core::constants::DEFAULT_DELIMITER;
use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub static DEFAULTS: Lazy<CliDefaults> = Lazy::new(CliDefaults::from_env);

#[derive(Debug, Clone)]
pub struct CliDefaults {
    /// `CSVFLOW_DELIMITER`: primer carácter; `,` si no está definido.
    pub delimiter: char,
    /// `CSVFLOW_FILE_VARIABLE`: variable donde se carga el archivo cuando
    /// no se pasa `--prop fileVariableName=...`.
    pub file_variable: String,
    /// `CSVFLOW_BUSINESS_KEY`.
    pub business_key: Option<String>,
}

impl CliDefaults {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let delimiter = env::var("CSVFLOW_DELIMITER").ok()
                                                     .and_then(|v| v.chars().next())
                                                     .unwrap_or(DEFAULT_DELIMITER);
        let file_variable = env::var("CSVFLOW_FILE_VARIABLE").unwrap_or_else(|_| "csv".to_string());
        let business_key = env::var("CSVFLOW_BUSINESS_KEY").ok().filter(|v| !v.is_empty());
        Self { delimiter,
               file_variable,
               business_key }
    }
}
