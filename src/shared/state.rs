//! Shared application state
//!
//! Holds the configuration and the latest completed scan. A presentation
//! layer renders whatever result is current; a new capture replaces it
//! wholesale, so there are no ordering dependencies between partial updates.
//! Callers share it behind `Arc<parking_lot::RwLock<_>>`.

use crate::config::AppConfig;
use crate::scan::ScanResult;

/// Central state shared between the scan runner and a presentation layer
#[derive(Debug, Clone, Default)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// Result of the most recent completed scan
    latest_scan: Option<ScanResult>,
}

impl SharedAppState {
    /// Create shared state with the given configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            latest_scan: None,
        }
    }

    /// Publish a completed scan, replacing any previous result
    pub fn publish_scan(&mut self, result: ScanResult) {
        self.latest_scan = Some(result);
    }

    /// The most recent completed scan, if any
    pub fn latest_scan(&self) -> Option<&ScanResult> {
        self.latest_scan.as_ref()
    }

    /// Drop the current result (e.g. when the user retakes the photo)
    pub fn clear_scan(&mut self) {
        self.latest_scan = None;
    }
}
