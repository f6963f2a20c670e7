//! Domain layer - model description entities and the script compiler

pub mod blueprint;
pub mod codegen;
pub mod error;

pub use blueprint::{
    Finding, InputConfig, LayerNode, LossFunction, ModelDescription, Optimizer, OutputConfig,
    ParamValue, Preprocessing, Severity, TrainingConfig,
};
pub use codegen::{CompileOutcome, LayerRegistry, ScriptCompiler};
pub use error::DomainError;
