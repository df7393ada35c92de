use crate::model::ScrapeError;

#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}
