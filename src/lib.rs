//! Indicator Explorer - country indicators with a coupled prediction engine

pub mod core;
pub mod engine;
pub mod explorer;
pub mod indicators;
pub mod llm;

pub use crate::core::error::{ExplorerError, Result};
pub use crate::core::types::{FieldId, Source};
pub use crate::engine::PredictionEngine;
pub use crate::indicators::{IndicatorStore, IndicatorVector};
