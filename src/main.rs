//! LUXE House AI - Main Entry Point

use clap::Parser;
use luxe_house::cli::{cmd_predict, cmd_serve, cmd_stats, cmd_train, Cli, Commands};
use luxe_house::valuation::ValuationForm;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luxe_house=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { data, output, trees, seed } => {
            cmd_train(data, output, trees, seed)?;
        }
        Commands::Serve { data, model, port, host } => {
            cmd_serve(data, model, host, port).await?;
        }
        Commands::Predict {
            model,
            area,
            bedrooms,
            bathrooms,
            floors,
            year_built,
            location,
            condition,
            garage,
        } => {
            let form = ValuationForm {
                area: Some(area),
                bedrooms: Some(bedrooms),
                bathrooms: Some(bathrooms),
                floors: Some(floors),
                yearbuilt: Some(year_built),
                location: Some(location),
                condition: Some(condition),
                garage: Some(garage),
            };
            cmd_predict(model, form)?;
        }
        Commands::Stats { data } => {
            cmd_stats(data)?;
        }
    }

    Ok(())
}
