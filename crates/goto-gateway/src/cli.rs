use clap::{Parser, ValueEnum};
use goto_telemetry::{LogFormat, TelemetryConfig};
use goto_worker::WorkerConfig;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "GOTO_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "GOTO_STORAGE_BACKEND";
pub const DATABASE_PATH_ENV: &str = "GOTO_DATABASE_PATH";
pub const QUEUE_CAPACITY_ENV: &str = "GOTO_QUEUE_CAPACITY";
pub const REQUEST_TIMEOUT_MS_ENV: &str = "GOTO_REQUEST_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "GOTO_LOG_FORMAT";
pub const LOG_FILTER_ENV: &str = "GOTO_LOG_FILTER";
pub const OTLP_ENDPOINT_ENV: &str = "GOTO_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_PATH: &str = "goserver.db";
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

pub const SERVICE_NAME: &str = "goto-gateway";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "goto-gateway", about = "Key to URL redirect server")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    /// SQLite database file, created on first start.
    #[arg(long, env = DATABASE_PATH_ENV, default_value = DEFAULT_DATABASE_PATH)]
    pub database_path: PathBuf,

    /// Pending requests each store worker queue holds before senders wait.
    #[arg(long, env = QUEUE_CAPACITY_ENV, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Upper bound on queueing plus waiting for the store worker's reply.
    #[arg(long, env = REQUEST_TIMEOUT_MS_ENV, default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// `EnvFilter` directives; `RUST_LOG` is used when unset.
    #[arg(long, env = LOG_FILTER_ENV)]
    pub log_filter: Option<String>,

    /// OTLP gRPC collector endpoint. Spans are only exported when set.
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::builder()
            .queue_capacity(self.queue_capacity)
            .request_timeout(Duration::from_millis(self.request_timeout_ms))
            .build()
    }

    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: SERVICE_NAME.to_string(),
            log_format: self.log_format.into(),
            filter: self.log_filter.clone(),
            otlp_endpoint: self.otlp_endpoint.clone(),
        }
    }
}
