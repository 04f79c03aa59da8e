//! Indicator data model and baseline store

pub mod store;
pub mod vector;

pub use store::IndicatorStore;
pub use vector::{CountryRecord, IndicatorVector};
