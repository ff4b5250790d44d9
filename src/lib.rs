pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::local::LocalStorage;
pub use adapters::s3::S3Storage;
pub use adapters::warehouse::HttpWarehouse;
pub use config::{Cli, Command, EnvConfig};
pub use core::{etl::EtlEngine, pipeline::MuniPipeline};
pub use domain::model::PipelineOutcome;
pub use utils::error::{EtlError, Result};
