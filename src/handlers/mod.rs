pub mod api;
pub mod generator;
pub mod helpers;
pub mod vantage;
