//! Polymarket Gamma API integration (market discovery)

pub mod messages;
pub mod rest;

pub use rest::GammaClient;
