//! LeafCare dashboard
//!
//! Ties the stores, weather, care engine and AI gateways together behind one
//! handler per user action, and renders the results for the terminal or as
//! JSON.

pub mod cli;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod outcome;
pub mod render;
pub mod view;

pub use cli::{execute, Cli, Command, Rendered};
pub use context::{DashboardContext, GardenWeather};
pub use dashboard::{build_card, build_dashboard, CardWeather};
pub use error::AppError;
pub use outcome::Outcome;
pub use view::*;
