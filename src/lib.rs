pub mod app;
pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod summary;
pub mod utils;

pub use app::App;
pub use config::Config;
pub use database::Database;
pub use models::{Memo, MemoFormData};
pub use summary::SummaryClient;
pub use utils::Profile;
