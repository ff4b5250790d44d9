#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use muni_etl::config::EnvConfig;
#[cfg(feature = "lambda")]
use muni_etl::domain::model::PipelineOutcome;
#[cfg(feature = "lambda")]
use muni_etl::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use muni_etl::{EtlEngine, HttpWarehouse, MuniPipeline, S3Storage};
#[cfg(feature = "lambda")]
use serde::Deserialize;

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub api_url: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<PipelineOutcome, Error> {
    tracing::info!("Starting ETL lambda function");

    // Event fields override the deployed environment when present.
    if let Some(api_url) = &event.payload.api_url {
        std::env::set_var("API_URL", api_url);
    }
    if let Some(bucket) = &event.payload.s3_bucket {
        std::env::set_var("S3_BUCKET", bucket);
    }
    if let Some(prefix) = &event.payload.s3_prefix {
        std::env::set_var("S3_PREFIX", prefix);
    }

    let config = EnvConfig::from_env()
        .and_then(|config| {
            config.validate()?;
            Ok(config)
        })
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let s3 = config
        .s3_required()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?
        .clone();

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .region(Region::new(s3.region))
        .build();
    let client = S3Client::from_conf(s3_config);

    let storage = S3Storage::new(client, s3.bucket);
    let warehouse = HttpWarehouse::new(
        config.warehouse.endpoint.clone(),
        config.warehouse.table.clone(),
        config.warehouse.token.clone(),
    );
    let pipeline = MuniPipeline::new(storage, warehouse, config);

    let outcome = EtlEngine::new(pipeline).run().await;
    tracing::info!("ETL lambda function completed with status {}", outcome.status);
    Ok(outcome)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
