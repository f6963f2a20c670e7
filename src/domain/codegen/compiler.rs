//! Compiler façade
//!
//! Orchestrates the validator and the emission pipeline. A compilation
//! is a pure function of its input and the layer registry: no I/O, no
//! shared mutable state, no partial documents.

use crate::domain::blueprint::{Finding, ModelDescription};
use crate::domain::codegen::registry::LayerRegistry;
use crate::domain::codegen::{pipeline, validator};

/// Result of one compilation call
#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    /// The description passed the lint stage; the document carries every
    /// advisory finding alongside it
    Success {
        document: String,
        advisories: Vec<Finding>,
    },

    /// At least one blocking finding; no document is emitted, not even
    /// partially
    Rejected {
        errors: Vec<Finding>,
        advisories: Vec<Finding>,
    },
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Turns a model description into training-script source text
pub struct ScriptCompiler {
    registry: &'static LayerRegistry,
}

impl ScriptCompiler {
    pub fn new() -> Self {
        Self {
            registry: LayerRegistry::global(),
        }
    }

    pub fn registry(&self) -> &'static LayerRegistry {
        self.registry
    }

    /// Validate and, when nothing blocks, emit the full training script.
    /// All findings are collected before any decision is made; warnings
    /// are never dropped on either path.
    pub fn compile(&self, description: &ModelDescription) -> CompileOutcome {
        let findings = validator::validate(description);

        let (errors, advisories): (Vec<Finding>, Vec<Finding>) =
            findings.into_iter().partition(|f| f.is_blocking());

        if !errors.is_empty() {
            return CompileOutcome::Rejected { errors, advisories };
        }

        CompileOutcome::Success {
            document: pipeline::emit(description, self.registry),
            advisories,
        }
    }
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new()
    }
}
