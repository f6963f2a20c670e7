//! Configuration-to-source-code compiler: validation, layer emission
//! rules and the staged emission pipeline

pub mod compiler;
pub mod pipeline;
pub mod registry;
pub mod validator;

pub use compiler::{CompileOutcome, ScriptCompiler};
pub use registry::{LayerRegistry, ACTIVATION_KINDS};
pub use validator::validate;
