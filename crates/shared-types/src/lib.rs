pub mod config;
pub mod database;
pub mod decision;
pub mod error;
pub mod feature_flags;
pub mod models;
pub mod requests;
pub mod templates;

pub use config::*;
pub use database::*;
pub use decision::*;
pub use error::*;
pub use feature_flags::*;
pub use models::*;
pub use requests::*;
pub use templates::*;
