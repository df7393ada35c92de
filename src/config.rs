use serde::Deserialize;
use std::fs;

use crate::model::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Display name, e.g. "4x4-offroad-suv".
    pub name: String,
    /// First-page URL of the category.
    pub url: String,
    /// Template for pages 2+, with "{page}" substituted. Kept per category
    /// because the site renders paging fragments differently per section.
    pub page_url_template: String,
}

impl CategoryConfig {
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.url.clone()
        } else {
            self.page_url_template.replace("{page}", &page.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub categories: Vec<CategoryConfig>,
    /// Year the vehicle age is computed against.
    pub reference_year: u32,
    /// Hard cap on pages walked per category.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Rate of the exponential inter-request delay.
    #[serde(default = "default_delay_lambda")]
    pub delay_lambda: f64,
    #[serde(default = "default_raw_dataset")]
    pub raw_dataset_path: String,
    #[serde(default = "default_canonical_dataset")]
    pub canonical_dataset_path: String,
    #[serde(default = "default_encoder")]
    pub encoder_path: String,
    #[serde(default = "default_model")]
    pub model_path: String,
    #[serde(default = "default_prediction_log")]
    pub prediction_log_path: String,
    /// Standardize power/age with a scaler fit on the training rows.
    /// Off by default: the serving path matches the unscaled baseline.
    #[serde(default)]
    pub standardize_numeric: bool,
}

fn default_max_pages() -> u32 {
    30
}

fn default_delay_lambda() -> f64 {
    1.5
}

fn default_raw_dataset() -> String {
    "vsechna_auta.csv".into()
}

fn default_canonical_dataset() -> String {
    "auta_cista.csv".into()
}

fn default_encoder() -> String {
    "encoder.json".into()
}

fn default_model() -> String {
    "model.json".into()
}

fn default_prediction_log() -> String {
    "predictions.csv".into()
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
