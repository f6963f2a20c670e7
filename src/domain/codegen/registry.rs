//! Layer Registry
//!
//! Static mapping from layer kind to its default parameters and the
//! emission rule producing the layer's source fragment. New kinds are
//! added here without touching the emission pipeline.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

use crate::domain::blueprint::{InputConfig, ParamValue};

/// Layer kinds that are pure activations. Two of these back to back is
/// almost always a modelling mistake, which the validator flags.
pub const ACTIVATION_KINDS: [&str; 4] = ["ReLU", "Softmax", "Sigmoid", "Tanh"];

/// Fallback shape used when neither the layer nor the input config
/// declares one. Matches the editor's MNIST-flavored placeholder.
const FALLBACK_SHAPE: &str = "28, 28, 1";

type EmitFn = fn(&ResolvedParams<'_>, &EmitContext<'_>) -> String;

/// Emission rule for one layer kind: its default parameter set and the
/// function producing a one-line source fragment
pub struct LayerRule {
    defaults: BTreeMap<&'static str, ParamValue>,
    emit: EmitFn,
}

/// Context handed to each emission rule
pub struct EmitContext<'a> {
    /// Position of the node in the layer sequence; position 0 is where
    /// the input shape gets bound
    pub position: usize,
    pub input_config: &'a InputConfig,
}

impl EmitContext<'_> {
    /// The network's declared input shape, normalized to "d1, d2, d3"
    /// form, falling back to the editor placeholder when undeclared.
    fn declared_shape(&self) -> String {
        match self.input_config.shape_dims() {
            Some(dims) => dims
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            None if !self.input_config.input_shape.trim().is_empty() => {
                self.input_config.input_shape.trim().to_string()
            }
            None => FALLBACK_SHAPE.to_string(),
        }
    }
}

/// Node parameters overlaid on the rule's defaults
pub struct ResolvedParams<'a> {
    params: &'a BTreeMap<String, ParamValue>,
    defaults: &'a BTreeMap<&'static str, ParamValue>,
}

impl ResolvedParams<'_> {
    fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name).or_else(|| self.defaults.get(name))
    }

    /// Render the parameter as a source literal, falling back to the
    /// registry default when the node omits it
    fn render(&self, name: &str) -> String {
        self.get(name).map(ParamValue::render).unwrap_or_default()
    }
}

/// Registry of supported layer kinds
pub struct LayerRegistry {
    rules: HashMap<&'static str, LayerRule>,
}

static REGISTRY: Lazy<LayerRegistry> = Lazy::new(LayerRegistry::new);

impl LayerRegistry {
    /// The process-wide registry. Immutable after construction; the only
    /// state shared between concurrent compilations.
    pub fn global() -> &'static LayerRegistry {
        &REGISTRY
    }

    pub fn new() -> Self {
        let mut rules: HashMap<&'static str, LayerRule> = HashMap::new();

        rules.insert("Input", LayerRule {
            defaults: BTreeMap::new(),
            emit: emit_input,
        });
        rules.insert("Dense", LayerRule {
            defaults: defaults(&[("units", num(128.0)), ("activation", text("relu"))]),
            emit: emit_dense,
        });
        rules.insert("Conv2D", LayerRule {
            defaults: defaults(&[
                ("filters", num(32.0)),
                ("kernelSize", num(3.0)),
                ("activation", text("relu")),
                ("padding", text("same")),
            ]),
            emit: emit_conv2d,
        });
        rules.insert("SeparableConv2D", LayerRule {
            defaults: defaults(&[
                ("filters", num(64.0)),
                ("kernelSize", num(3.0)),
                ("activation", text("relu")),
            ]),
            emit: emit_separable_conv2d,
        });
        rules.insert("MaxPooling2D", LayerRule {
            defaults: defaults(&[("poolSize", num(2.0)), ("strides", num(2.0))]),
            emit: emit_max_pooling,
        });
        rules.insert("AvgPooling2D", LayerRule {
            defaults: defaults(&[("poolSize", num(2.0)), ("strides", num(2.0))]),
            emit: emit_avg_pooling,
        });
        rules.insert("Flatten", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.Flatten()".to_string(),
        });
        rules.insert("Dropout", LayerRule {
            defaults: defaults(&[("rate", num(0.5))]),
            emit: |p, _| format!("layers.Dropout({})", p.render("rate")),
        });
        rules.insert("BatchNormalization", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.BatchNormalization()".to_string(),
        });
        rules.insert("ReLU", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.ReLU()".to_string(),
        });
        rules.insert("LeakyReLU", LayerRule {
            defaults: defaults(&[("alpha", num(0.3))]),
            emit: |p, _| format!("layers.LeakyReLU(alpha={})", p.render("alpha")),
        });
        rules.insert("Softmax", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.Softmax()".to_string(),
        });
        rules.insert("Sigmoid", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.Activation('sigmoid')".to_string(),
        });
        rules.insert("Tanh", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.Activation('tanh')".to_string(),
        });
        rules.insert("GlobalAveragePooling2D", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.GlobalAveragePooling2D()".to_string(),
        });
        rules.insert("GlobalMaxPooling2D", LayerRule {
            defaults: BTreeMap::new(),
            emit: |_, _| "layers.GlobalMaxPooling2D()".to_string(),
        });

        Self { rules }
    }

    /// Default parameter set for a kind, `None` when unregistered
    pub fn default_params(&self, kind: &str) -> Option<&BTreeMap<&'static str, ParamValue>> {
        self.rules.get(kind).map(|rule| &rule.defaults)
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.rules.contains_key(kind)
    }

    pub fn is_activation(&self, kind: &str) -> bool {
        ACTIVATION_KINDS.contains(&kind)
    }

    /// Registered kinds in deterministic order
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<&'static str> = self.rules.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Emit the source fragment for one layer node.
    ///
    /// Missing parameters fall back to the kind's defaults; extra
    /// parameters are ignored. Unknown kinds never fail: they produce a
    /// passthrough comment naming the kind so the pipeline stays total.
    pub fn emit(
        &self,
        kind: &str,
        params: &BTreeMap<String, ParamValue>,
        position: usize,
        input_config: &InputConfig,
    ) -> String {
        let Some(rule) = self.rules.get(kind) else {
            return format!("# Unknown layer type: {}", kind);
        };

        let resolved = ResolvedParams {
            params,
            defaults: &rule.defaults,
        };
        let ctx = EmitContext {
            position,
            input_config,
        };

        (rule.emit)(&resolved, &ctx)
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn num(n: f64) -> ParamValue {
    ParamValue::Number(n)
}

fn text(s: &str) -> ParamValue {
    ParamValue::Text(s.to_string())
}

fn defaults(entries: &[(&'static str, ParamValue)]) -> BTreeMap<&'static str, ParamValue> {
    entries.iter().cloned().collect()
}

fn emit_input(params: &ResolvedParams<'_>, ctx: &EmitContext<'_>) -> String {
    // A layer-level shape override wins over the declared input shape
    let shape = match params.get("shape") {
        Some(value) => value.render(),
        None => ctx.declared_shape(),
    };
    format!("layers.Input(shape=({}))", shape)
}

fn emit_dense(params: &ResolvedParams<'_>, ctx: &EmitContext<'_>) -> String {
    let mut fragment = format!(
        "layers.Dense({}, activation='{}')",
        params.render("units"),
        params.render("activation"),
    );
    bind_input_shape(&mut fragment, ctx);
    fragment
}

fn emit_conv2d(params: &ResolvedParams<'_>, ctx: &EmitContext<'_>) -> String {
    let kernel = params.render("kernelSize");
    let mut fragment = format!(
        "layers.Conv2D({}, ({}, {}), activation='{}', padding='{}')",
        params.render("filters"),
        kernel,
        kernel,
        params.render("activation"),
        params.render("padding"),
    );
    bind_input_shape(&mut fragment, ctx);
    fragment
}

fn emit_separable_conv2d(params: &ResolvedParams<'_>, ctx: &EmitContext<'_>) -> String {
    let kernel = params.render("kernelSize");
    let mut fragment = format!(
        "layers.SeparableConv2D({}, ({}, {}), activation='{}')",
        params.render("filters"),
        kernel,
        kernel,
        params.render("activation"),
    );
    bind_input_shape(&mut fragment, ctx);
    fragment
}

fn emit_max_pooling(params: &ResolvedParams<'_>, _: &EmitContext<'_>) -> String {
    let pool = params.render("poolSize");
    format!(
        "layers.MaxPooling2D(pool_size=({}, {}), strides={})",
        pool,
        pool,
        params.render("strides"),
    )
}

fn emit_avg_pooling(params: &ResolvedParams<'_>, _: &EmitContext<'_>) -> String {
    let pool = params.render("poolSize");
    format!(
        "layers.AveragePooling2D(pool_size=({}, {}), strides={})",
        pool,
        pool,
        params.render("strides"),
    )
}

/// A structural layer opening the stack without an explicit `Input`
/// node carries the network's input shape as a layer argument, so the
/// emitted program is valid even when the user never dragged one in.
fn bind_input_shape(fragment: &mut String, ctx: &EmitContext<'_>) {
    if ctx.position != 0 {
        return;
    }

    let shape = ctx.declared_shape();
    fragment.truncate(fragment.len() - 1);
    fragment.push_str(&format!(", input_shape=({})", shape));
    fragment.push(')');
}
