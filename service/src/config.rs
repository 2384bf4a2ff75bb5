use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default OpenAI API base URL used when `OPENAI_BASE_URL` is not set.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Resend API base URL used when `RESEND_BASE_URL` is not set.
pub const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The API key to use when calling the OpenAI chat completions API.
    #[arg(long, env)]
    openai_api_key: Option<String>,

    /// The base URL of the OpenAI API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,

    /// The model used to generate meeting summaries.
    #[arg(long, env, default_value = DEFAULT_OPENAI_MODEL)]
    openai_model: String,

    /// Upper bound on the number of tokens generated for a single summary.
    #[arg(long, env, default_value_t = 700)]
    pub summary_max_tokens: u32,

    /// Sampling temperature for summaries. Kept low so repeated runs stay consistent.
    #[arg(long, env, default_value_t = 0.3)]
    pub summary_temperature: f32,

    /// The API key to use when calling the Resend API.
    #[arg(long, env)]
    resend_api_key: Option<String>,

    /// The base URL of the Resend API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_RESEND_BASE_URL)]
    resend_base_url: String,

    /// The verified sender address summaries are emailed from.
    #[arg(long, env)]
    email_from: Option<String>,

    /// Timeout in seconds for any single call to an external provider
    #[arg(long, env, default_value_t = 30)]
    pub provider_timeout_secs: u64,

    /// Directory holding the browser front end, served for any unmatched path
    #[arg(long, env, default_value = "./static")]
    pub static_dir: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Builds a configuration from defaults and the process environment only,
    /// ignoring command line arguments. Pair with the `set_*` methods to pin
    /// individual values.
    pub fn from_defaults() -> Self {
        Config::parse_from([env!("CARGO_PKG_NAME")])
    }

    /// Returns the OpenAI API key, if configured.
    pub fn openai_api_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }

    pub fn set_openai_api_key(mut self, api_key: Option<String>) -> Self {
        self.openai_api_key = api_key;
        self
    }

    /// Returns the OpenAI API base URL.
    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }

    pub fn set_openai_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_base_url = base_url.into();
        self
    }

    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }

    /// Returns the Resend API key, if configured.
    pub fn resend_api_key(&self) -> Option<&str> {
        non_empty(&self.resend_api_key)
    }

    pub fn set_resend_api_key(mut self, api_key: Option<String>) -> Self {
        self.resend_api_key = api_key;
        self
    }

    /// Returns the Resend API base URL.
    pub fn resend_base_url(&self) -> &str {
        &self.resend_base_url
    }

    pub fn set_resend_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.resend_base_url = base_url.into();
        self
    }

    /// Returns the verified sender address, if configured.
    pub fn email_from(&self) -> Option<&str> {
        non_empty(&self.email_from)
    }

    pub fn set_email_from(mut self, email_from: Option<String>) -> Self {
        self.email_from = email_from;
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

// An exported-but-empty variable counts as unset.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
