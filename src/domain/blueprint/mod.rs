//! Model description types: layers, configuration blocks and findings

pub mod entity;
pub mod finding;
pub mod validation;

pub use entity::{
    render_number, InputConfig, LayerNode, LossFunction, ModelDescription, Optimizer,
    OutputConfig, ParamValue, Preprocessing, TrainingConfig,
};
pub use finding::{Finding, Severity};
pub use validation::{is_identifier_safe, sanitize_model_name};
