//! Model description entities - the unit of compilation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single layer parameter value as it arrives on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric view of the value. Text that parses as a number counts;
    /// booleans do not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value as a source-code literal fragment. Whole numbers
    /// print without a trailing `.0` so `Dense(128.0)` never appears.
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => render_number(*n),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Format a float the way the generated script expects numbers
pub fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One structural or activation unit in the user's architecture.
///
/// `id` is assigned by the editor at creation and stays stable across
/// edits and reordering; the compiler treats it as opaque. `kind` stays
/// a free string so unrecognized kinds flow through to the registry's
/// passthrough comment instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerNode {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl LayerNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            kind: kind.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Finding scope for this node: the editor-assigned id when present,
    /// otherwise a positional reference.
    pub fn scope(&self, position: usize) -> String {
        if self.id.is_empty() {
            format!("layers[{}]", position)
        } else {
            self.id.clone()
        }
    }
}

/// Preprocessing applied to the input data before training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preprocessing {
    Normalize,
    Standardize,
    #[default]
    None,
}

/// Input configuration block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputConfig {
    /// Comma-separated positive integer dimensions, e.g. "28,28,1"
    pub input_shape: String,

    pub data_preprocessing: Preprocessing,

    /// Enables the on-the-fly augmentation sub-model and switches the
    /// architecture stage to the functional emission strategy
    pub augmentation: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            input_shape: String::new(),
            data_preprocessing: Preprocessing::None,
            augmentation: false,
        }
    }
}

impl InputConfig {
    /// Parse the declared input shape into dimensions. Returns `None`
    /// when any component is missing, non-numeric or non-positive.
    pub fn shape_dims(&self) -> Option<Vec<u64>> {
        if self.input_shape.trim().is_empty() {
            return None;
        }

        self.input_shape
            .split(',')
            .map(|part| match part.trim().parse::<u64>() {
                Ok(dim) if dim > 0 => Some(dim),
                _ => None,
            })
            .collect()
    }
}

/// Optimizer selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimizer {
    #[default]
    Adam,
    Sgd,
    Rmsprop,
    Adagrad,
}

impl Optimizer {
    /// Keras optimizer class name used in the emitted construction call
    pub fn keras_class(&self) -> &'static str {
        match self {
            Self::Adam => "Adam",
            Self::Sgd => "SGD",
            Self::Rmsprop => "RMSprop",
            Self::Adagrad => "Adagrad",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adam => "adam",
            Self::Sgd => "sgd",
            Self::Rmsprop => "rmsprop",
            Self::Adagrad => "adagrad",
        }
    }
}

/// Loss function selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    #[default]
    CategoricalCrossentropy,
    BinaryCrossentropy,
    Mse,
    Mae,
}

impl LossFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CategoricalCrossentropy => "categorical_crossentropy",
            Self::BinaryCrossentropy => "binary_crossentropy",
            Self::Mse => "mse",
            Self::Mae => "mae",
        }
    }
}

/// Training configuration block.
///
/// `epochs` and `batch_size` deserialize as floats on purpose: the wire
/// format accepts arbitrary JSON numbers, and the validator is the one
/// place that rejects non-integers, so every bad value surfaces as a
/// Finding instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingConfig {
    pub train_test_split: f64,
    pub validation_split: f64,
    pub epochs: f64,
    pub batch_size: f64,
    pub optimizer: Optimizer,
    pub learning_rate: f64,
    pub loss_function: LossFunction,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            train_test_split: 0.8,
            validation_split: 0.2,
            epochs: 10.0,
            batch_size: 32.0,
            optimizer: Optimizer::Adam,
            learning_rate: 0.001,
            loss_function: LossFunction::CategoricalCrossentropy,
        }
    }
}

/// Output configuration block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub metrics: Vec<String>,
    pub evaluate_on_test_set: bool,
    pub save_model: bool,
    pub model_name: String,

    /// Number of output classes used by the label-encoding stage
    pub num_classes: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metrics: vec!["accuracy".to_string()],
            evaluate_on_test_set: false,
            save_model: false,
            model_name: "my_model".to_string(),
            num_classes: 10,
        }
    }
}

/// The full compilation input: layer sequence plus the three
/// configuration blocks. Layer order is the forward-pass order of the
/// network and is never reordered by the compiler.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescription {
    #[serde(default)]
    pub layers: Vec<LayerNode>,

    #[serde(default)]
    pub input_config: InputConfig,

    #[serde(default)]
    pub training_config: TrainingConfig,

    #[serde(default)]
    pub output_config: OutputConfig,
}
