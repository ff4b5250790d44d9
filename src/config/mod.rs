use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_s3_bucket_name, validate_url, Validate,
};
use clap::{Parser, Subcommand};
use std::env;

pub const APP_NAME: &str = "muni-etl";

pub fn version_banner() -> String {
    format!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Parser)]
#[command(name = APP_NAME)]
#[command(about = "Fetch municipal operator data, archive it, and load it to the warehouse")]
#[command(disable_version_flag = true, arg_required_else_help = true)]
pub struct Cli {
    /// Show the application's version and exit.
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one fetch-archive-transform-load cycle for the operators feed
    Operators {
        /// Archive the raw payload under this local directory instead of S3
        #[arg(long)]
        archive_dir: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub endpoint: String,
    pub table: String,
    pub token: Option<String>,
}

/// Environment-sourced runtime configuration. Required variables are
/// reported as explicit config errors before any request is built.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub api_url: String,
    pub api_key: String,
    pub archive_prefix: String,
    pub s3: Option<S3Config>,
    pub warehouse: WarehouseConfig,
}

fn require_env(field: &str) -> Result<String> {
    env::var(field).map_err(|_| EtlError::MissingConfigError {
        field: field.to_string(),
    })
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_url: require_env("API_URL")?,
            api_key: require_env("MUNI_API_KEY")?,
            archive_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "raw".to_string()),
            s3: env::var("S3_BUCKET").ok().map(|bucket| S3Config {
                bucket,
                region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            }),
            warehouse: WarehouseConfig {
                endpoint: require_env("WAREHOUSE_URL")?,
                table: env::var("WAREHOUSE_TABLE").unwrap_or_else(|_| "operators".to_string()),
                token: env::var("WAREHOUSE_TOKEN").ok(),
            },
        })
    }

    /// The S3 target, required unless the caller archives locally.
    pub fn s3_required(&self) -> Result<&S3Config> {
        self.s3.as_ref().ok_or_else(|| EtlError::MissingConfigError {
            field: "S3_BUCKET".to_string(),
        })
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validate_url("API_URL", &self.api_url)?;
        validate_non_empty_string("MUNI_API_KEY", &self.api_key)?;
        validate_non_empty_string("S3_PREFIX", &self.archive_prefix)?;
        validate_url("WAREHOUSE_URL", &self.warehouse.endpoint)?;
        validate_non_empty_string("WAREHOUSE_TABLE", &self.warehouse.table)?;

        if let Some(s3) = &self.s3 {
            validate_s3_bucket_name("S3_BUCKET", &s3.bucket)?;
            validate_non_empty_string("S3_REGION", &s3.region)?;
        }

        Ok(())
    }
}

impl ConfigProvider for EnvConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn archive_prefix(&self) -> &str {
        &self.archive_prefix
    }
}
