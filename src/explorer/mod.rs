//! Interactive exploration state

pub mod session;

pub use session::{ExplorerSession, SliderChangeEvent};
