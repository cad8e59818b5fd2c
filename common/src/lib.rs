pub mod claims;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod redirect;
pub mod routes;
pub mod session;
pub mod token_store;
pub mod utils;

pub use config::*;
pub use error::*;
pub use utils::*;
