//! Validator/Linter
//!
//! Inspects the full model description and produces findings, each with
//! an explicit severity fixed at rule definition. Every rule runs on
//! every call; nothing short-circuits, so the caller always sees the
//! complete problem list in one round trip.

use crate::domain::blueprint::{
    is_identifier_safe, Finding, InputConfig, LayerNode, ModelDescription, OutputConfig,
    ParamValue, TrainingConfig,
};
use crate::domain::codegen::registry::LayerRegistry;

/// Run every lint rule against the description
pub fn validate(description: &ModelDescription) -> Vec<Finding> {
    let registry = LayerRegistry::global();
    let mut findings = Vec::new();

    validate_input_config(&description.input_config, &mut findings);
    validate_training_config(&description.training_config, &mut findings);
    validate_output_config(&description.output_config, &mut findings);
    validate_layers(&description.layers, &mut findings);
    validate_adjacency(&description.layers, registry, &mut findings);

    findings
}

fn validate_input_config(config: &InputConfig, findings: &mut Vec<Finding>) {
    const SCOPE: &str = "inputConfig.inputShape";

    if config.input_shape.trim().is_empty() {
        findings.push(Finding::error(
            SCOPE,
            "input shape is required: architecture emission cannot proceed without it",
        ));
        return;
    }

    if config.shape_dims().is_none() {
        findings.push(Finding::error(
            SCOPE,
            format!(
                "input shape '{}' must be comma-separated positive integers",
                config.input_shape
            ),
        ));
    }
}

fn validate_training_config(config: &TrainingConfig, findings: &mut Vec<Finding>) {
    let lr = config.learning_rate;
    if lr <= 0.0 {
        findings.push(Finding::error(
            "trainingConfig.learningRate",
            format!("learning rate {} must be positive", lr),
        ));
    } else if lr > 1.0 {
        // The two warning bands are mutually exclusive tiers, most
        // severe first
        findings.push(Finding::warning(
            "trainingConfig.learningRate",
            format!("learning rate {} is unusually high", lr),
        ));
    } else if lr > 0.1 {
        findings.push(Finding::warning(
            "trainingConfig.learningRate",
            format!("learning rate {} is very high, typically <0.1", lr),
        ));
    }

    if !is_positive_integer(config.epochs) {
        findings.push(Finding::error(
            "trainingConfig.epochs",
            format!("epochs {} must be a positive integer", config.epochs),
        ));
    } else if config.epochs > 1000.0 {
        findings.push(Finding::warning(
            "trainingConfig.epochs",
            format!("{} epochs may take a very long time to train", config.epochs),
        ));
    }

    if !is_positive_integer(config.batch_size) {
        findings.push(Finding::error(
            "trainingConfig.batchSize",
            format!("batch size {} must be a positive integer", config.batch_size),
        ));
    } else if config.batch_size < 8.0 {
        findings.push(Finding::warning(
            "trainingConfig.batchSize",
            format!("batch size {} is very small and may cause unstable training", config.batch_size),
        ));
    } else if config.batch_size > 1024.0 {
        findings.push(Finding::warning(
            "trainingConfig.batchSize",
            format!("batch size {} is very large and may exhaust memory", config.batch_size),
        ));
    }

    let vs = config.validation_split;
    if !(0.0..1.0).contains(&vs) {
        findings.push(Finding::error(
            "trainingConfig.validationSplit",
            format!("validation split {} must be in [0, 1)", vs),
        ));
    } else if vs > 0.0 && vs < 0.1 {
        findings.push(Finding::warning(
            "trainingConfig.validationSplit",
            format!("validation split {} is too small to be meaningful", vs),
        ));
    }

    let tts = config.train_test_split;
    if !(tts > 0.0 && tts <= 1.0) {
        findings.push(Finding::error(
            "trainingConfig.trainTestSplit",
            format!("train/test split {} must be in (0, 1]", tts),
        ));
    } else if tts < 0.5 {
        findings.push(Finding::warning(
            "trainingConfig.trainTestSplit",
            format!("train/test split {} makes the test set larger than the train set", tts),
        ));
    }
}

fn validate_output_config(config: &OutputConfig, findings: &mut Vec<Finding>) {
    if config.save_model && !is_identifier_safe(&config.model_name) {
        findings.push(Finding::warning(
            "outputConfig.modelName",
            format!(
                "model name '{}' is not identifier-safe and will be sanitized in the save call",
                config.model_name
            ),
        ));
    }
}

fn validate_layers(layers: &[LayerNode], findings: &mut Vec<Finding>) {
    for (position, layer) in layers.iter().enumerate() {
        let scope = layer.scope(position);

        match layer.kind.as_str() {
            "Conv2D" | "SeparableConv2D" => {
                check_integer_param(layer, "filters", &scope, Some((1024.0, "filter count")), findings);
                check_integer_param(layer, "kernelSize", &scope, Some((11.0, "kernel size")), findings);
            }
            "Dense" => {
                check_integer_param(layer, "units", &scope, Some((4096.0, "unit count")), findings);
            }
            "Dropout" => {
                check_dropout_rate(layer, &scope, findings);
            }
            "MaxPooling2D" | "AvgPooling2D" => {
                check_integer_param(layer, "poolSize", &scope, Some((5.0, "pool size")), findings);
                check_integer_param(layer, "strides", &scope, None, findings);
            }
            // Unknown kinds are handled by the registry's passthrough
            // comment and never produce a blocking finding
            _ => {}
        }
    }
}

/// Positive-integer rule shared by count-like layer params, with an
/// optional "suspiciously large" warning threshold
fn check_integer_param(
    layer: &LayerNode,
    name: &str,
    scope: &str,
    warn_above: Option<(f64, &str)>,
    findings: &mut Vec<Finding>,
) {
    let Some(value) = layer.params.get(name) else {
        // Missing params fall back to registry defaults, which are valid
        return;
    };

    match value.as_f64() {
        Some(v) if is_positive_integer(v) => {
            if let Some((threshold, label)) = warn_above {
                if v > threshold {
                    findings.push(Finding::warning(
                        scope,
                        format!("{} {} of {} is unusually large", layer.kind, label, ParamValue::Number(v).render()),
                    ));
                }
            }
        }
        _ => findings.push(Finding::error(
            scope,
            format!("{}.{} must be a positive integer", layer.kind, name),
        )),
    }
}

fn check_dropout_rate(layer: &LayerNode, scope: &str, findings: &mut Vec<Finding>) {
    let Some(value) = layer.params.get("rate") else {
        return;
    };

    match value.as_f64() {
        Some(rate) if (0.0..1.0).contains(&rate) => {
            if rate > 0.7 {
                findings.push(Finding::warning(
                    scope,
                    format!("dropout rate {} is very aggressive and may prevent learning", rate),
                ));
            }
        }
        _ => findings.push(Finding::error(
            scope,
            "Dropout.rate must be a number in [0, 1)",
        )),
    }
}

fn validate_adjacency(layers: &[LayerNode], registry: &LayerRegistry, findings: &mut Vec<Finding>) {
    for (position, pair) in layers.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);

        if registry.is_activation(&prev.kind) && registry.is_activation(&cur.kind) {
            findings.push(Finding::warning(
                format!("{}+{}", prev.scope(position), cur.scope(position + 1)),
                format!(
                    "consecutive activation layers {} and {} are usually a mistake",
                    prev.kind, cur.kind
                ),
            ));
        }
    }
}

fn is_positive_integer(value: f64) -> bool {
    value > 0.0 && value.fract() == 0.0
}
