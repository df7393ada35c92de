pub mod fetcher;
pub mod traits;

pub use fetcher::{polite_delay, HttpScraper};
pub use traits::Scraper;
