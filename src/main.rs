use clap::Parser;
use contact_hub::utils::{logger, validation::Validate};
use contact_hub::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(args.verbose, args.log_json);
    tracing::info!("Starting contact-hub");

    let settings = args.into_settings()?;
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e.into());
    }
    tracing::debug!("Upload directory: {}", settings.import.upload_dir.display());

    contact_hub::app::serve(settings).await?;
    Ok(())
}
