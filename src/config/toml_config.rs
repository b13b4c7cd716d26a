use crate::core::retry::RetryPolicy;
use crate::domain::model::ValueScale;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const IPCA_URL: &str = "https://api.bcb.gov.br/dados/serie/bcdata.sgs.433/dados?formato=json";
pub const INPC_URL: &str = "https://api.bcb.gov.br/dados/serie/bcdata.sgs.188/dados?formato=json";
pub const TR_URL: &str = "https://www.debit.com.br/tabelas/tr-bacen";
pub const POUPANCA_URL: &str = "https://www.debit.com.br/tabelas/poupanca";
pub const IGPDI_URL: &str = "https://www.debit.com.br/tabelas/igp-di-fgv";
pub const IGPM_URL: &str = "https://www.debit.com.br/tabelas/igpm-fgv";
pub const IPC_FIPE_URL: &str = "https://www.debit.com.br/tabelas/ipc-fipe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Banco Central SGS JSON API.
    Bcb,
    /// Month/rate table without a year column (TR, Poupança).
    Bi,
    /// FGV year-by-month grid (IGP-M, IGP-DI).
    Fgv,
    /// Month/year label table (IPC-FIPE).
    Fipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "default_indicators")]
    pub indicators: Vec<IndicatorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_tables_path")]
    pub tables_path: String,
    #[serde(default = "default_true")]
    pub render_tables: bool,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub name: String,
    pub source: SourceKind,
    pub url: String,
    #[serde(default)]
    pub scale: ValueScale,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl IndicatorConfig {
    pub fn new(name: &str, source: SourceKind, url: &str) -> Self {
        Self {
            name: name.to_string(),
            source,
            url: url.to_string(),
            scale: ValueScale::Percent,
            enabled: true,
        }
    }
}

fn default_output_path() -> String {
    "./data".to_string()
}

fn default_tables_path() -> String {
    "./tables".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    12
}

fn default_max_attempts() -> u32 {
    crate::core::retry::DEFAULT_MAX_ATTEMPTS
}

fn default_delay_seconds() -> u64 {
    crate::core::retry::DEFAULT_RETRY_DELAY.as_secs()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("br-indicators/{}", env!("CARGO_PKG_VERSION"))
}

/// The seven indicators fetched when no `[[indicators]]` are configured.
pub fn default_indicators() -> Vec<IndicatorConfig> {
    vec![
        IndicatorConfig::new("IPCA", SourceKind::Bcb, IPCA_URL),
        IndicatorConfig::new("INPC", SourceKind::Bcb, INPC_URL),
        IndicatorConfig::new("TR", SourceKind::Bi, TR_URL),
        IndicatorConfig::new("Poupanca", SourceKind::Bi, POUPANCA_URL),
        IndicatorConfig::new("IGP_DI", SourceKind::Fgv, IGPDI_URL),
        IndicatorConfig::new("IGP_M", SourceKind::Fgv, IGPM_URL),
        IndicatorConfig::new("IPC_FIPE", SourceKind::Fipe, IPC_FIPE_URL),
    ]
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            tables_path: default_tables_path(),
            render_tables: true,
            max_entries: default_max_entries(),
            reference_year: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_seconds: default_delay_seconds(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            indicators: default_indicators(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| EtlError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown names stay as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| EtlError::config(format!("env placeholder pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_secs(self.retry.delay_seconds),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// The year BI and FGV tables are read for; the current year by default.
    pub fn reference_year(&self) -> i32 {
        self.run
            .reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// `None` when `max_entries` is 0.
    pub fn entry_limit(&self) -> Option<usize> {
        match self.run.max_entries {
            0 => None,
            n => Some(n),
        }
    }

    pub fn enabled_indicators(&self) -> impl Iterator<Item = &IndicatorConfig> {
        self.indicators.iter().filter(|i| i.enabled)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("run.output_path", &self.run.output_path)?;
        if self.run.render_tables {
            validation::validate_path("run.tables_path", &self.run.tables_path)?;
        }
        if let Some(year) = self.run.reference_year {
            validation::validate_range("run.reference_year", year, 1900, 2100)?;
        }
        validation::validate_positive_number(
            "retry.max_attempts",
            self.retry.max_attempts as usize,
            1,
        )?;
        validation::validate_positive_number(
            "http.timeout_seconds",
            self.http.timeout_seconds as usize,
            1,
        )?;

        if self.enabled_indicators().next().is_none() {
            return Err(EtlError::MissingConfigError {
                field: "indicators".to_string(),
            });
        }
        for indicator in &self.indicators {
            validation::validate_non_empty_string("indicators.name", &indicator.name)?;
            validation::validate_url(
                &format!("indicators.{}.url", indicator.name),
                &indicator.url,
            )?;
        }
        validation::validate_unique_names(
            "indicators.name",
            self.indicators.iter().map(|i| i.name.as_str()),
        )?;

        Ok(())
    }
}
