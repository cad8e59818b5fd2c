// dashboard-web/src/lib.rs
pub mod api;
pub mod cache;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod resources;
pub mod state;
pub mod static_files;
pub mod store;
pub mod utils;
pub mod views;

pub use error::DashboardError;
pub use state::AppState;
