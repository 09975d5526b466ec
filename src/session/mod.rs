//! Interaction session module
//!
//! Holds the application state for one browsing session and applies user
//! actions to it.

mod controller;
mod state;

pub use controller::Controller;
pub use state::{PanelEntries, Update, ViewState, YearPanel};
