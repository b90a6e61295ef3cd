//! Browser front end for financial insights
//!
//! Serves the input form, runs the insight pipeline on submission and
//! renders statement tables, section text and charts as one HTML page.

pub mod app;
pub mod errors;
pub mod render;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use errors::AppError;
pub use state::AppState;
