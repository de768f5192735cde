pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use api::create_router;
pub use client::BufiClient;
pub use config::AppConfig;
pub use error::{ApiError, Result};
pub use service::LedgerService;
pub use store::{CsvRowStore, MemoryRowStore, RowStore, SheetRange, SheetsRowStore};
