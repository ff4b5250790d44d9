use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use clap::Parser;
use muni_etl::config::{self, Cli, Command, EnvConfig};
use muni_etl::domain::model::PipelineOutcome;
use muni_etl::domain::ports::Storage;
use muni_etl::utils::{logger, validation::Validate};
use muni_etl::{EtlEngine, HttpWarehouse, LocalStorage, MuniPipeline, S3Storage};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", config::version_banner());
        return;
    }

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting {} CLI", config::APP_NAME);
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    // arg_required_else_help covers the bare invocation, so a parsed Cli
    // without --version always carries a subcommand.
    let Some(Command::Operators { archive_dir }) = cli.command else {
        return;
    };

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => exit_config_error(e),
    };
    if let Err(e) = env_config.validate() {
        exit_config_error(e);
    }

    let outcome = match archive_dir {
        Some(dir) => {
            tracing::info!("Archiving raw payloads under {}", dir);
            run_pipeline(LocalStorage::new(dir), env_config).await
        }
        None => {
            let s3 = match env_config.s3_required() {
                Ok(s3) => s3.clone(),
                Err(e) => exit_config_error(e),
            };

            let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                .region(Region::new(s3.region))
                .build();
            let client = S3Client::from_conf(s3_config);

            run_pipeline(S3Storage::new(client, s3.bucket), env_config).await
        }
    };

    if outcome.is_success() {
        println!("Pipeline succeeded.");
    } else {
        eprintln!("Pipeline failed.");
        std::process::exit(1);
    }
}

async fn run_pipeline<S: Storage>(storage: S, config: EnvConfig) -> PipelineOutcome {
    let warehouse = HttpWarehouse::new(
        config.warehouse.endpoint.clone(),
        config.warehouse.table.clone(),
        config.warehouse.token.clone(),
    );
    let pipeline = MuniPipeline::new(storage, warehouse, config);
    EtlEngine::new(pipeline).run().await
}

fn exit_config_error(e: muni_etl::EtlError) -> ! {
    tracing::error!("Configuration validation failed: {}", e);
    eprintln!("{}", e);
    std::process::exit(1);
}
