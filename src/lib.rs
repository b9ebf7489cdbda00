pub mod calculator;
pub mod config;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod service;
pub mod store;


pub use calculator::CalculatorService;
pub use config::DatabaseConfig;
pub use resolver::{resolve, ResolveError};
pub use service::StockMinutePriceService;
pub use store::{MinutePriceSession, MinutePriceSource, MySqlSource};
