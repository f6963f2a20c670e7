//! Modelforge API
//!
//! Turns visual neural-network model descriptions into complete
//! Keras/TensorFlow training scripts:
//! - Layer registry with per-kind defaults and code fragments
//! - Validator producing blocking errors and advisory warnings
//! - Staged emission pipeline assembling the final Python script
//! - HTTP API exposing generation and layer-kind discovery

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::ScriptCompiler;

/// Create the application state shared by all request handlers
pub fn create_app_state() -> AppState {
    AppState::new(Arc::new(ScriptCompiler::new()))
}
