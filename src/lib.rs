//! Brent crude price forecasting.
//!
//! Three-stage pipeline: fetch and clean the IPEADATA price history
//! ([`infrastructure::ipeadata`]), fit a seeded random-forest regressor
//! over calendar features ([`application::trainer`]), and answer daily or
//! monthly-average price predictions ([`application::predictor`]).

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
