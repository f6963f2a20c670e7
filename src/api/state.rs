//! Application state shared across handlers

use std::sync::Arc;

use crate::domain::ScriptCompiler;

/// Shared handler state. The compiler is a pure transform over the
/// immutable layer registry, so one instance serves every request
/// concurrently without further synchronization.
#[derive(Clone)]
pub struct AppState {
    pub compiler: Arc<ScriptCompiler>,
}

impl AppState {
    pub fn new(compiler: Arc<ScriptCompiler>) -> Self {
        Self { compiler }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(ScriptCompiler::new()))
    }
}
