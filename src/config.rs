use crate::store::SheetRange;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub sheets: SheetsConfig,
    pub ranges: RangesConfig,
    /// People allowed in the `who` column
    pub people: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sheets,
    Csv,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory of `<sheet>.csv` files for the csv backend
    pub csv_dir: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub api_base: String,
    pub spreadsheet_id: String,
    /// OAuth bearer token with the spreadsheets scope
    pub access_token: Option<String>,
}

// Keeps the token out of the startup log
impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("api_base", &self.api_base)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangesConfig {
    pub expenses: SheetRange,
    pub budget: SheetRange,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            store: StoreConfig {
                backend: StoreBackend::Sheets,
                csv_dir: "data".to_string(),
            },
            sheets: SheetsConfig {
                api_base: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
                spreadsheet_id: "1sIcPmC3Thkm_0D7OBGNKEOLVaz7Iloe7Y_Zvkw7_5W4".to_string(),
                access_token: None,
            },
            ranges: RangesConfig {
                expenses: SheetRange::new("poop!A3:F", 0, 2),
                budget: SheetRange::new("Budget!A3:C", 1, 2),
            },
            people: vec!["Dror".to_string(), "Rina".to_string()],
        }
    }
}

impl AppConfig {
    /// Defaults, then `bufi.toml` (or the file named by `BUFI_CONFIG`) if it
    /// exists, then `BUFI__*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = std::env::var("BUFI_CONFIG").unwrap_or_else(|_| "bufi".to_string());
        Self::load(Some(&file), Environment::with_prefix("BUFI"))
    }

    pub fn load(file: Option<&str>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);
        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }
        builder
            .add_source(
                env.separator("__")
                    .list_separator(",")
                    .with_list_parse_key("people")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
