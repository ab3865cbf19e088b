use anyhow::Result;
use brentcast::application::model::TrainedModel;
use brentcast::application::predictor;
use brentcast::application::trainer::{self, TrainerConfig};
use brentcast::config::ForecastConfig;
use brentcast::domain::features::DaySpec;
use brentcast::domain::ports::PriceHistorySource;
use brentcast::infrastructure::ipeadata::IpeadataClient;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Brent crude price forecasting from the IPEADATA history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and clean the historical series and print a summary
    Fetch {
        /// Write the cleaned series to a CSV file
        #[arg(long)]
        out: Option<PathBuf>,

        /// How many of the most recent observations to print
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Fetch the history, train the model and report held-out metrics
    Train {
        /// Persist the trained model as JSON
        #[arg(long)]
        model: Option<PathBuf>,

        /// Override the configured split/forest seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the configured number of trees
        #[arg(long)]
        trees: Option<usize>,
    },
    /// Predict a daily price or a monthly average
    Predict {
        #[arg(long)]
        year: i32,

        /// Month number, 1-12
        #[arg(long)]
        month: u32,

        /// Day of month for a daily prediction; omit for a monthly average
        #[arg(long, conflicts_with = "date")]
        day: Option<u32>,

        /// Full date as DD/MM/YYYY for a daily prediction
        #[arg(long)]
        date: Option<String>,

        /// Reuse a previously saved model instead of refetching and retraining
        #[arg(long)]
        model: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        trees: Option<usize>,
    },
}

fn trainer_config(base: &ForecastConfig, seed: Option<u64>, trees: Option<usize>) -> TrainerConfig {
    TrainerConfig {
        seed: seed.unwrap_or(base.trainer.seed),
        n_trees: trees.unwrap_or(base.trainer.n_trees),
        ..base.trainer
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    let config = ForecastConfig::from_env()?;
    let source = IpeadataClient::new(Duration::from_secs(config.http_timeout_secs));

    match cli.command {
        Command::Fetch { out, tail } => {
            let series = source.fetch_series().await?;

            println!("Most recent {} observations:", tail.min(series.len()));
            for point in series.tail(tail) {
                println!("  {}  {:8.2}", point.date, point.price);
            }

            if let Some(last) = series.last() {
                let year = last.date.year() - 1;
                let means = series.monthly_means(year);
                if !means.is_empty() {
                    println!("\nMonthly mean price in {}:", year);
                    for (month, mean) in means {
                        println!("  {:02}/{}  {:8.2}", month, year, mean);
                    }
                }
            }

            if let Some(path) = out {
                let file = std::fs::File::create(&path)?;
                series.to_csv(file)?;
                info!("Series exported to {:?}", path);
            }
        }
        Command::Train { model, seed, trees } => {
            let series = source.fetch_series().await?;
            let (trained, metrics) = trainer::train(&series, trainer_config(&config, seed, trees))?;

            println!("Model performance on held-out data:");
            println!("{}", serde_json::to_string_pretty(&metrics)?);

            if let Some(path) = model {
                trained.save(&path)?;
            }
        }
        Command::Predict {
            year,
            month,
            day,
            date,
            model,
            seed,
            trees,
        } => {
            let trained = match model {
                Some(path) if path.exists() => TrainedModel::load(&path)?,
                _ => {
                    let series = source.fetch_series().await?;
                    trainer::train(&series, trainer_config(&config, seed, trees))?.0
                }
            };

            match (day, date) {
                (Some(day), _) => {
                    let price =
                        predictor::predict_day(&trained, year, month, DaySpec::DayOfMonth(day))?;
                    println!(
                        "Predicted Brent price for {:02}/{:02}/{}: ${:.2} per barrel",
                        day, month, year, price
                    );
                }
                (None, Some(text)) => {
                    let price =
                        predictor::predict_day(&trained, year, month, DaySpec::Text(text.clone()))?;
                    println!("Predicted Brent price for {}: ${:.2} per barrel", text, price);
                }
                (None, None) => {
                    let price = predictor::predict_month(&trained, year, month)?;
                    println!(
                        "Predicted average Brent price for {:02}/{}: ${:.2} per barrel",
                        month, year, price
                    );
                }
            }
        }
    }

    Ok(())
}
