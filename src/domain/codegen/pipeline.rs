//! Emission Pipeline
//!
//! Ordered sequence of stage emitters, each appending one section of the
//! generated training script. Every stage is a pure function of the
//! model description: byte-identical input produces byte-identical
//! output, with no time- or randomness-dependent text. Stages are
//! invoked only after the validator reported zero blocking findings.

use crate::domain::blueprint::{
    render_number, InputConfig, ModelDescription, OutputConfig, Preprocessing, TrainingConfig,
    sanitize_model_name,
};
use crate::domain::codegen::registry::LayerRegistry;

/// Assemble the full training script
pub fn emit(description: &ModelDescription, registry: &LayerRegistry) -> String {
    let stages: Vec<Vec<String>> = vec![
        header(),
        imports(&description.training_config),
        data_loading(&description.input_config),
        preprocessing(&description.input_config),
        label_encoding(&description.output_config),
        split_commentary(&description.training_config),
        augmentation(&description.input_config),
        architecture(description, registry),
        compilation(&description.training_config, &description.output_config),
        summary(),
        training(&description.training_config),
        evaluation(&description.output_config),
        history_plot(),
        persistence(&description.output_config),
        inference_demo(),
    ];

    let mut document = stages
        .iter()
        .filter(|stage| !stage.is_empty())
        .map(|stage| stage.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    document.push('\n');
    document
}

fn lines(strs: &[&str]) -> Vec<String> {
    strs.iter().map(|s| s.to_string()).collect()
}

/// Script docstring with install instructions
pub fn header() -> Vec<String> {
    lines(&[
        r#"""""#,
        "Generated TensorFlow/Keras Deep Learning Model",
        "Auto-generated code - Ready to run!",
        "",
        "INSTALLATION INSTRUCTIONS:",
        "pip install tensorflow numpy scikit-learn matplotlib",
        r#"""""#,
    ])
}

/// Stage 1: imports. The split utility is only pulled in when a split
/// actually happens; matplotlib is always imported because the history
/// plot stage is unconditional.
pub fn imports(training: &TrainingConfig) -> Vec<String> {
    let mut out = lines(&[
        "# ========== Imports ==========",
        "import tensorflow as tf",
        "from tensorflow import keras",
        "from tensorflow.keras import layers",
        "import numpy as np",
    ]);

    if training.train_test_split < 1.0 {
        out.push("from sklearn.model_selection import train_test_split".to_string());
    }

    out.push("import matplotlib.pyplot as plt".to_string());
    out
}

/// Stage 2: placeholder dataset load, with reshape statements when the
/// declared input shape is three-dimensional
pub fn data_loading(input: &InputConfig) -> Vec<String> {
    let mut out = lines(&[
        "# ========== Data Loading & Preprocessing ==========",
        "# Load your dataset here",
        "# Example using MNIST dataset:",
        "(X_train, y_train), (X_test, y_test) = keras.datasets.mnist.load_data()",
    ]);

    if let Some(dims) = input.shape_dims() {
        if dims.len() == 3 {
            let shape = dims
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            out.push(String::new());
            out.push("# Reshape data to match the declared input shape".to_string());
            out.push(format!("X_train = X_train.reshape(-1, {})", shape));
            out.push(format!("X_test = X_test.reshape(-1, {})", shape));
        }
    }

    out
}

/// Stage 3: preprocessing branch
pub fn preprocessing(input: &InputConfig) -> Vec<String> {
    match input.data_preprocessing {
        Preprocessing::Normalize => lines(&[
            "# Data Preprocessing",
            r#"X_train = X_train.astype("float32") / 255.0"#,
            r#"X_test = X_test.astype("float32") / 255.0"#,
        ]),
        Preprocessing::Standardize => lines(&[
            "# Data Preprocessing",
            "mean = np.mean(X_train)",
            "std = np.std(X_train)",
            "X_train = (X_train - mean) / std",
            "X_test = (X_test - mean) / std",
        ]),
        Preprocessing::None => Vec::new(),
    }
}

/// Stage 4: one-hot label encoding, class count from the output config
pub fn label_encoding(output: &OutputConfig) -> Vec<String> {
    vec![
        "# One-hot encode labels (adjust num_classes as needed)".to_string(),
        format!(
            "num_classes = {}  # Change this based on your dataset",
            output.num_classes
        ),
        "y_train = keras.utils.to_categorical(y_train, num_classes)".to_string(),
        "y_test = keras.utils.to_categorical(y_test, num_classes)".to_string(),
    ]
}

/// Stage 5: split commentary. The placeholder dataset is pre-split, so
/// this documents the requested ratio instead of emitting code.
pub fn split_commentary(training: &TrainingConfig) -> Vec<String> {
    if training.train_test_split >= 1.0 {
        return Vec::new();
    }

    let train_pct = training.train_test_split * 100.0;
    let test_size = 1.0 - training.train_test_split;
    vec![
        format!(
            "# Train/Test Split: {:.0}% training, {:.0}% testing",
            train_pct,
            100.0 - train_pct
        ),
        "# The example dataset is pre-split; to split your own data use:".to_string(),
        format!(
            "# X_train, X_test, y_train, y_test = train_test_split(X, y, test_size={:.2}, random_state=42)",
            test_size
        ),
    ]
}

/// Stage 6: on-the-fly augmentation sub-model, composed into the
/// architecture stage's functional strategy
pub fn augmentation(input: &InputConfig) -> Vec<String> {
    if !input.augmentation {
        return Vec::new();
    }

    lines(&[
        "# Data Augmentation",
        "data_augmentation = keras.Sequential([",
        r#"    layers.RandomFlip("horizontal"),"#,
        "    layers.RandomRotation(0.1),",
        "    layers.RandomZoom(0.1),",
        "])",
    ])
}

/// Stage 7: model architecture. Augmentation selects between the two
/// mutually exclusive strategies: a functional assembly threading the
/// augmentation sub-model, or a plain sequential container.
pub fn architecture(description: &ModelDescription, registry: &LayerRegistry) -> Vec<String> {
    if description.input_config.augmentation {
        functional_architecture(description, registry)
    } else {
        sequential_architecture(description, registry)
    }
}

fn sequential_architecture(
    description: &ModelDescription,
    registry: &LayerRegistry,
) -> Vec<String> {
    let mut out = lines(&[
        "# ========== Model Architecture ==========",
        "model = keras.Sequential([",
    ]);

    for (position, layer) in description.layers.iter().enumerate() {
        let fragment = registry.emit(
            &layer.kind,
            &layer.params,
            position,
            &description.input_config,
        );
        if fragment.starts_with('#') {
            out.push(format!("    {}", fragment));
        } else {
            out.push(format!("    {},", fragment));
        }
    }

    out.push("])".to_string());
    out
}

fn functional_architecture(
    description: &ModelDescription,
    registry: &LayerRegistry,
) -> Vec<String> {
    let shape = declared_shape(&description.input_config);
    let mut out = lines(&["# ========== Model Architecture =========="]);

    out.push(format!("inputs = keras.Input(shape=({}))", shape));
    out.push("x = data_augmentation(inputs)".to_string());

    for (position, layer) in description.layers.iter().enumerate() {
        if layer.kind == "Input" {
            // The functional strategy already emitted its input node
            continue;
        }

        // Offset past the explicit input node so no layer re-binds the
        // input shape
        let fragment = registry.emit(
            &layer.kind,
            &layer.params,
            position + 1,
            &description.input_config,
        );
        if fragment.starts_with('#') {
            out.push(fragment);
        } else {
            out.push(format!("x = {}(x)", fragment));
        }
    }

    let name = sanitize_model_name(&description.output_config.model_name);
    out.push(format!(
        "model = keras.Model(inputs=inputs, outputs=x, name=\"{}\")",
        name
    ));
    out
}

fn declared_shape(input: &InputConfig) -> String {
    match input.shape_dims() {
        Some(dims) => dims
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        None => input.input_shape.trim().to_string(),
    }
}

/// Stage 8: optimizer construction and compile call
pub fn compilation(training: &TrainingConfig, output: &OutputConfig) -> Vec<String> {
    let metrics = output
        .metrics
        .iter()
        .map(|m| format!("\"{}\"", m))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        "# ========== Model Compilation ==========".to_string(),
        format!(
            "# Optimizer: {}, Learning Rate: {}",
            training.optimizer.as_str(),
            training.learning_rate
        ),
        format!(
            "optimizer = keras.optimizers.{}(learning_rate={})",
            training.optimizer.keras_class(),
            training.learning_rate
        ),
        "model.compile(".to_string(),
        "    optimizer=optimizer,".to_string(),
        format!("    loss='{}',", training.loss_function.as_str()),
        format!("    metrics=[{}]", metrics),
        ")".to_string(),
    ]
}

/// Stage 9: model introspection banner
pub fn summary() -> Vec<String> {
    lines(&[
        "# Model Summary",
        r#"print("\n" + "="*50)"#,
        r#"print("MODEL SUMMARY")"#,
        r#"print("="*50)"#,
        "model.summary()",
        r#"print("="*50 + "\n")"#,
    ])
}

/// Stage 10: fit call
pub fn training(config: &TrainingConfig) -> Vec<String> {
    vec![
        "# ========== Model Training ==========".to_string(),
        format!(
            "# Training for {} epochs with batch size {}",
            render_number(config.epochs),
            render_number(config.batch_size)
        ),
        "history = model.fit(".to_string(),
        "    X_train, y_train,".to_string(),
        format!("    epochs={},", render_number(config.epochs)),
        format!("    batch_size={},", render_number(config.batch_size)),
        format!("    validation_split={},", config.validation_split),
        "    verbose=1".to_string(),
        ")".to_string(),
    ]
}

/// Stage 11: test-set evaluation, only when requested
pub fn evaluation(output: &OutputConfig) -> Vec<String> {
    if !output.evaluate_on_test_set {
        return Vec::new();
    }

    lines(&[
        "# ========== Model Evaluation ==========",
        r#"print("\nEvaluating model on test set...")"#,
        "test_loss, test_acc = model.evaluate(X_test, y_test, verbose=0)",
        r#"print(f"\nTest Accuracy: {test_acc:.4f} ({test_acc*100:.2f}%)")"#,
        r#"print(f"Test Loss: {test_loss:.4f}")"#,
    ])
}

/// Stage 12: two-panel accuracy/loss history plot, always emitted
pub fn history_plot() -> Vec<String> {
    lines(&[
        "# ========== Plot Training History ==========",
        "plt.figure(figsize=(12, 4))",
        "plt.subplot(1, 2, 1)",
        r#"plt.plot(history.history["accuracy"], label="Training Accuracy")"#,
        r#"plt.plot(history.history["val_accuracy"], label="Validation Accuracy")"#,
        r#"plt.title("Model Accuracy")"#,
        r#"plt.xlabel("Epoch")"#,
        r#"plt.ylabel("Accuracy")"#,
        "plt.legend()",
        "plt.grid(True)",
        "",
        "plt.subplot(1, 2, 2)",
        r#"plt.plot(history.history["loss"], label="Training Loss")"#,
        r#"plt.plot(history.history["val_loss"], label="Validation Loss")"#,
        r#"plt.title("Model Loss")"#,
        r#"plt.xlabel("Epoch")"#,
        r#"plt.ylabel("Loss")"#,
        "plt.legend()",
        "plt.grid(True)",
        "",
        "plt.tight_layout()",
        r#"plt.savefig("training_history.png")"#,
        r#"print("\nTraining history plot saved as training_history.png")"#,
    ])
}

/// Stage 13: save call plus a commented reload example, only when
/// requested
pub fn persistence(output: &OutputConfig) -> Vec<String> {
    if !output.save_model {
        return Vec::new();
    }

    let name = sanitize_model_name(&output.model_name);
    vec![
        "# ========== Save Model ==========".to_string(),
        format!("model.save('{}.h5')", name),
        format!(r#"print("\nModel saved as {}.h5")"#, name),
        String::new(),
        "# To load the model later, use:".to_string(),
        format!("# loaded_model = keras.models.load_model('{}.h5')", name),
    ]
}

/// Stage 14: fixed 5-sample prediction demo
pub fn inference_demo() -> Vec<String> {
    lines(&[
        "# ========== Make Predictions ==========",
        "predictions = model.predict(X_test[:5])",
        "predicted_classes = np.argmax(predictions, axis=1)",
        "actual_classes = np.argmax(y_test[:5], axis=1)",
        "",
        r#"print("\nSample Predictions:")"#,
        r#"print("="*50)"#,
        "for i in range(5):",
        r#"    print(f"Sample {i+1}:")"#,
        r#"    print(f"  Predicted: {predicted_classes[i]}, Actual: {actual_classes[i]}")"#,
        r#"    print(f"  Confidence: {predictions[i][predicted_classes[i]]:.4f}")"#,
        r#"print("="*50)"#,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blueprint::{LayerNode, Optimizer, ParamValue};

    fn description() -> ModelDescription {
        ModelDescription {
            layers: vec![
                LayerNode::new("Flatten"),
                LayerNode::new("Dense")
                    .with_param("units", ParamValue::Number(64.0))
                    .with_param("activation", ParamValue::Text("relu".to_string())),
                LayerNode::new("Dense")
                    .with_param("units", ParamValue::Number(10.0))
                    .with_param("activation", ParamValue::Text("softmax".to_string())),
            ],
            input_config: InputConfig {
                input_shape: "28,28,1".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_emit_is_deterministic() {
        let desc = description();
        let registry = LayerRegistry::global();
        assert_eq!(emit(&desc, registry), emit(&desc, registry));
    }

    #[test]
    fn test_imports_split_utility_conditional() {
        let mut config = TrainingConfig::default();
        assert!(imports(&config)
            .iter()
            .any(|l| l.contains("train_test_split")));

        config.train_test_split = 1.0;
        assert!(!imports(&config)
            .iter()
            .any(|l| l.contains("train_test_split")));
    }

    #[test]
    fn test_imports_always_include_plotting() {
        let mut config = TrainingConfig::default();
        config.train_test_split = 1.0;
        assert!(imports(&config)
            .iter()
            .any(|l| l.contains("matplotlib.pyplot")));
    }

    #[test]
    fn test_data_loading_reshape_for_3d_shape() {
        let input = InputConfig {
            input_shape: "32, 32, 3".to_string(),
            ..Default::default()
        };
        let out = data_loading(&input);
        assert!(out.contains(&"X_train = X_train.reshape(-1, 32, 32, 3)".to_string()));
        assert!(out.contains(&"X_test = X_test.reshape(-1, 32, 32, 3)".to_string()));
    }

    #[test]
    fn test_data_loading_no_reshape_for_other_shapes() {
        let input = InputConfig {
            input_shape: "784".to_string(),
            ..Default::default()
        };
        assert!(!data_loading(&input).iter().any(|l| l.contains("reshape")));
    }

    #[test]
    fn test_preprocessing_branches() {
        let mut input = InputConfig::default();

        input.data_preprocessing = Preprocessing::Normalize;
        assert!(preprocessing(&input).iter().any(|l| l.contains("255.0")));

        input.data_preprocessing = Preprocessing::Standardize;
        let out = preprocessing(&input);
        assert!(out.iter().any(|l| l.contains("np.mean")));
        assert!(out.iter().any(|l| l.contains("np.std")));

        input.data_preprocessing = Preprocessing::None;
        assert!(preprocessing(&input).is_empty());
    }

    #[test]
    fn test_label_encoding_uses_configured_class_count() {
        let output = OutputConfig {
            num_classes: 2,
            ..Default::default()
        };
        assert!(label_encoding(&output)
            .iter()
            .any(|l| l.starts_with("num_classes = 2")));
    }

    #[test]
    fn test_split_commentary() {
        let config = TrainingConfig::default();
        let out = split_commentary(&config);
        assert!(out[0].contains("80% training, 20% testing"));
        assert!(out[2].contains("test_size=0.20"));

        let no_split = TrainingConfig {
            train_test_split: 1.0,
            ..Default::default()
        };
        assert!(split_commentary(&no_split).is_empty());
    }

    #[test]
    fn test_augmentation_block() {
        let mut input = InputConfig::default();
        assert!(augmentation(&input).is_empty());

        input.augmentation = true;
        let out = augmentation(&input);
        assert!(out.iter().any(|l| l.contains("RandomFlip")));
        assert!(out.iter().any(|l| l.contains("RandomRotation")));
        assert!(out.iter().any(|l| l.contains("RandomZoom")));
    }

    #[test]
    fn test_sequential_architecture() {
        let out = architecture(&description(), LayerRegistry::global());

        assert_eq!(out[1], "model = keras.Sequential([");
        assert_eq!(out[2], "    layers.Flatten(),");
        assert_eq!(out[3], "    layers.Dense(64, activation='relu'),");
        assert_eq!(out[4], "    layers.Dense(10, activation='softmax'),");
        assert_eq!(out[5], "])");
    }

    #[test]
    fn test_functional_architecture() {
        let mut desc = description();
        desc.input_config.augmentation = true;

        let out = architecture(&desc, LayerRegistry::global());
        assert!(out.contains(&"inputs = keras.Input(shape=(28, 28, 1))".to_string()));
        assert!(out.contains(&"x = data_augmentation(inputs)".to_string()));
        assert!(out.contains(&"x = layers.Flatten()(x)".to_string()));
        assert!(out.contains(&"x = layers.Dense(64, activation='relu')(x)".to_string()));
        assert!(out
            .last()
            .unwrap()
            .starts_with("model = keras.Model(inputs=inputs, outputs=x"));
    }

    #[test]
    fn test_functional_skips_explicit_input_layer() {
        let mut desc = description();
        desc.input_config.augmentation = true;
        desc.layers.insert(0, LayerNode::new("Input"));

        let out = architecture(&desc, LayerRegistry::global());
        // Exactly one input binding: the functional strategy's own
        let input_lines = out.iter().filter(|l| l.contains("keras.Input")).count();
        assert_eq!(input_lines, 1);
        assert!(!out.iter().any(|l| l.contains("layers.Input")));
    }

    #[test]
    fn test_strategies_reference_every_layer_once_in_order() {
        let desc = description();
        let registry = LayerRegistry::global();

        for augmented in [false, true] {
            let mut desc = desc.clone();
            desc.input_config.augmentation = augmented;
            let text = architecture(&desc, registry).join("\n");

            let flatten = text.find("layers.Flatten()").unwrap();
            let dense64 = text.find("layers.Dense(64").unwrap();
            let dense10 = text.find("layers.Dense(10").unwrap();
            assert!(flatten < dense64 && dense64 < dense10);
            assert_eq!(text.matches("layers.Dense(64").count(), 1);
        }
    }

    #[test]
    fn test_unknown_kind_passthrough_in_both_strategies() {
        let mut desc = description();
        desc.layers.push(LayerNode::new("HyperBlock"));
        let registry = LayerRegistry::global();

        let sequential = architecture(&desc, registry).join("\n");
        assert!(sequential.contains("# Unknown layer type: HyperBlock"));

        desc.input_config.augmentation = true;
        let functional = architecture(&desc, registry).join("\n");
        assert!(functional.contains("# Unknown layer type: HyperBlock"));
        assert!(!functional.contains("x = #"));
    }

    #[test]
    fn test_compilation_stage() {
        let training_config = TrainingConfig {
            optimizer: Optimizer::Rmsprop,
            learning_rate: 0.01,
            ..Default::default()
        };
        let output_config = OutputConfig {
            metrics: vec!["accuracy".to_string(), "precision".to_string()],
            ..Default::default()
        };

        let out = compilation(&training_config, &output_config);
        assert!(out.contains(&"optimizer = keras.optimizers.RMSprop(learning_rate=0.01)".to_string()));
        assert!(out.contains(&"    loss='categorical_crossentropy',".to_string()));
        assert!(out.contains(&r#"    metrics=["accuracy", "precision"]"#.to_string()));
    }

    #[test]
    fn test_training_stage() {
        let out = training(&TrainingConfig::default());
        assert!(out.contains(&"    epochs=10,".to_string()));
        assert!(out.contains(&"    batch_size=32,".to_string()));
        assert!(out.contains(&"    validation_split=0.2,".to_string()));
    }

    #[test]
    fn test_evaluation_conditional() {
        let mut output = OutputConfig::default();
        assert!(evaluation(&output).is_empty());

        output.evaluate_on_test_set = true;
        assert!(evaluation(&output)
            .iter()
            .any(|l| l.contains("model.evaluate")));
    }

    #[test]
    fn test_persistence_conditional() {
        let mut output = OutputConfig::default();
        assert!(persistence(&output).is_empty());

        output.save_model = true;
        output.model_name = "digit_classifier".to_string();
        let out = persistence(&output);
        assert!(out.contains(&"model.save('digit_classifier.h5')".to_string()));
        assert!(out
            .iter()
            .any(|l| l.contains("keras.models.load_model('digit_classifier.h5')")));
    }

    #[test]
    fn test_persistence_sanitizes_model_name() {
        let output = OutputConfig {
            save_model: true,
            model_name: "my model".to_string(),
            ..Default::default()
        };
        assert!(persistence(&output).contains(&"model.save('my_model.h5')".to_string()));
    }

    #[test]
    fn test_history_plot_always_present() {
        let out = history_plot();
        assert!(out.iter().any(|l| l.contains("training_history.png")));
        assert!(out.iter().any(|l| l.contains("val_accuracy")));
    }

    #[test]
    fn test_full_document_layout() {
        let mut desc = description();
        desc.output_config.evaluate_on_test_set = true;
        let document = emit(&desc, LayerRegistry::global());

        // Stages appear in pipeline order
        let import_pos = document.find("# ========== Imports").unwrap();
        let arch_pos = document.find("# ========== Model Architecture").unwrap();
        let compile_pos = document.find("# ========== Model Compilation").unwrap();
        let train_pos = document.find("# ========== Model Training").unwrap();
        let eval_pos = document.find("# ========== Model Evaluation").unwrap();
        let predict_pos = document.find("# ========== Make Predictions").unwrap();

        assert!(import_pos < arch_pos);
        assert!(arch_pos < compile_pos);
        assert!(compile_pos < train_pos);
        assert!(train_pos < eval_pos);
        assert!(eval_pos < predict_pos);

        // No save block unless requested
        assert!(!document.contains("# ========== Save Model"));
    }
}
