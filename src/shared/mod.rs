//! Shared application state between the scan pipeline and a presentation layer

pub mod state;

pub use state::SharedAppState;
