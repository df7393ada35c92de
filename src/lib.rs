pub mod cleaner;
pub mod config;
pub mod encoder;
pub mod model;
pub mod parser;
pub mod predictor;
pub mod scraper;
pub mod storage;
