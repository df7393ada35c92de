use chrono::Utc;
use clap::{Parser, Subcommand};
use std::error::Error;
use tracing::{error, info, warn};

use spotreba::cleaner::Cleaner;
use spotreba::config::{load_config, AppConfig};
use spotreba::encoder::FittedEncoder;
use spotreba::model::{PredictionInput, PredictionRecord, RawListing};
use spotreba::parser::ListingParser;
use spotreba::predictor::{train_test_split, LinearModel, Metrics};
use spotreba::scraper::{polite_delay, HttpScraper, Scraper};
use spotreba::storage::{artifacts, dataset, prediction_log};

#[derive(Parser)]
#[command(name = "spotreba", about = "Fuel consumption prediction for used-car listings")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config.json")]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the configured categories into the raw dataset.
    Scrape,
    /// Clean the raw dataset into the canonical dataset.
    Clean,
    /// Fit the encoder and the regression model on the canonical dataset.
    Fit,
    /// Predict combined consumption for one vehicle and log the result.
    Predict {
        #[arg(long)]
        body_type: String,
        #[arg(long)]
        fuel_type: String,
        #[arg(long)]
        engine_class: String,
        /// Power in kW.
        #[arg(long)]
        power: f64,
        /// Production year.
        #[arg(long)]
        year: u32,
    },
    /// List every served prediction from the log.
    Predictions,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Config load error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Scrape => run_scrape(&config).await,
        Command::Clean => run_clean(&config),
        Command::Fit => run_fit(&config),
        Command::Predict {
            body_type,
            fuel_type,
            engine_class,
            power,
            year,
        } => run_predict(&config, body_type, fuel_type, engine_class, power, year),
        Command::Predictions => run_predictions(&config),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Walks every configured category page by page, fetches each car detail
/// page and parses it into a raw record. A failing listing is logged and
/// skipped, never aborts the batch; Ctrl-C stops the crawl and flushes
/// whatever was collected so far.
async fn run_scrape(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let scraper = HttpScraper::new()?;
    let parser = ListingParser::new();
    let mut results: Vec<RawListing> = Vec::new();

    'categories: for category in &config.categories {
        info!("Processing category: {}", category.name);
        for page in 1..=config.max_pages {
            let page_url = category.page_url(page);
            let html = match scraper.fetch(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Category page fetch failed: {} | {}", page_url, e);
                    break;
                }
            };

            let links = parser.listing_links(&html, &page_url);
            if links.is_empty() {
                break;
            }
            info!("Page {}: {} cars", page, links.len());

            for (i, link) in links.iter().enumerate() {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted, flushing partial results...");
                        break 'categories;
                    }
                    listing = fetch_listing(&scraper, &parser, link, config.delay_lambda) => {
                        match listing {
                            Some(listing) => {
                                results.push(listing);
                                info!("{}/{} ok", i + 1, links.len());
                            }
                            None => warn!("{}/{} no data: {}", i + 1, links.len(), link),
                        }
                    }
                }
            }
        }
    }

    dataset::write_raw(&config.raw_dataset_path, &results)?;
    info!(
        "Saved {} records to {}",
        results.len(),
        config.raw_dataset_path
    );
    Ok(())
}

async fn fetch_listing(
    scraper: &HttpScraper,
    parser: &ListingParser,
    url: &str,
    delay_lambda: f64,
) -> Option<RawListing> {
    polite_delay(delay_lambda).await;
    match scraper.fetch(url).await {
        Ok(html) => parser.parse_listing(&html),
        Err(e) => {
            warn!("Listing fetch failed: {} | {}", url, e);
            None
        }
    }
}

fn run_clean(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let raws = dataset::read_raw(&config.raw_dataset_path)?;
    let canonical = Cleaner::new(config.reference_year).clean(&raws);
    dataset::write_canonical(&config.canonical_dataset_path, &canonical)?;
    info!(
        "Saved {} canonical records to {}",
        canonical.len(),
        config.canonical_dataset_path
    );
    Ok(())
}

/// Fits the encoder on the canonical dataset and the regression model on
/// the training split, then persists both as a validated pair.
fn run_fit(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let records = dataset::read_canonical(&config.canonical_dataset_path)?;
    info!("Fitting on {} canonical records", records.len());

    let (train, test) = train_test_split(&records, 0.2, 42);

    let mut encoder = FittedEncoder::fit(&records);
    if config.standardize_numeric {
        encoder = encoder.with_scaler(&train);
    }

    let x_train = encoder.transform_all(&train);
    let y_train: Vec<f64> = train.iter().map(|r| r.consumption).collect();
    let model = LinearModel::fit(&x_train, &y_train, encoder.schema_fingerprint())?;

    let x_test = encoder.transform_all(&test);
    let y_test: Vec<f64> = test.iter().map(|r| r.consumption).collect();
    let metrics = Metrics::compute(&model, &x_test, &y_test);
    info!(
        "MAE: {:.2} | RMSE: {:.2} | R²: {:.2}",
        metrics.mae, metrics.rmse, metrics.r2
    );

    artifacts::save_encoder(&config.encoder_path, &encoder)?;
    artifacts::save_model(&config.model_path, &model)?;
    info!(
        "Saved encoder to {} and model to {}",
        config.encoder_path, config.model_path
    );
    Ok(())
}

fn run_predict(
    config: &AppConfig,
    body_type: String,
    fuel_type: String,
    engine_class: String,
    power: f64,
    year: u32,
) -> Result<(), Box<dyn Error>> {
    let encoder = artifacts::load_encoder(&config.encoder_path)?;
    let model = artifacts::load_model(&config.model_path)?;
    artifacts::validate_pairing(&encoder, &model)?;

    let vehicle_age = config
        .reference_year
        .checked_sub(year)
        .ok_or_else(|| format!("production year {} is past {}", year, config.reference_year))?;

    let input = PredictionInput {
        body_type,
        fuel_type,
        engine_class,
        power,
        vehicle_age,
    };
    let consumption = model.predict(&encoder.transform_input(&input))?;
    let rounded = (consumption * 10.0).round() / 10.0;

    prediction_log::append(
        &config.prediction_log_path,
        &PredictionRecord {
            body_type: input.body_type,
            fuel_type: input.fuel_type,
            engine_class: input.engine_class,
            power: input.power,
            vehicle_age: input.vehicle_age,
            fuel_consumption: rounded,
            predicted_at: Utc::now(),
        },
    )?;

    println!("{} l/100km", rounded);
    Ok(())
}

fn run_predictions(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let records = prediction_log::list(&config.prediction_log_path)?;
    for record in &records {
        println!(
            "{} | {} {} {} | {} kW | age {} | {} l/100km",
            record.predicted_at.format("%Y-%m-%d %H:%M:%S"),
            record.body_type,
            record.fuel_type,
            record.engine_class,
            record.power,
            record.vehicle_age,
            record.fuel_consumption
        );
    }
    info!("{} predictions served so far", records.len());
    Ok(())
}
