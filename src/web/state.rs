//! Application state shared across handlers

use crate::aggregate::Aggregator;
use crate::config::Settings;
use crate::omdb::MovieSource;
use crate::session::Controller;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Interaction controller
    pub controller: Arc<Controller>,
}

impl AppState {
    /// Create new application state over a movie source
    pub fn new(settings: Settings, source: Arc<dyn MovieSource>) -> Self {
        let aggregator = Aggregator::from_settings(source, &settings);
        let controller = Arc::new(Controller::new(aggregator, settings.aggregator.clone()));

        Self {
            settings: Arc::new(settings),
            controller,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
