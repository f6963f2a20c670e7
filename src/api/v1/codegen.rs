//! Code generation endpoints

use std::collections::BTreeMap;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{
    CompileOutcome, Finding, InputConfig, LayerNode, LayerRegistry, ModelDescription,
    OutputConfig, ParamValue, TrainingConfig,
};

/// Request to generate a training script.
///
/// `layers` is required: a body without it (or with a non-list value)
/// is rejected as malformed before the compiler ever runs. The three
/// configuration blocks are optional and fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub layers: Vec<LayerNode>,

    #[serde(default)]
    pub input_config: InputConfig,

    #[serde(default)]
    pub training_config: TrainingConfig,

    #[serde(default)]
    pub output_config: OutputConfig,
}

impl From<GenerateRequest> for ModelDescription {
    fn from(request: GenerateRequest) -> Self {
        Self {
            layers: request.layers,
            input_config: request.input_config,
            training_config: request.training_config,
            output_config: request.output_config,
        }
    }
}

/// Response from script generation. Lint rejections travel on this type
/// too, with `success: false` and the error list filled in, so callers
/// can render findings without treating the request as malformed.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Finding>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Finding>,

    pub message: String,
}

/// POST /v1/codegen/generate
pub async fn generate_code(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, ApiError> {
    debug!(layer_count = request.layers.len(), "Generating training script");

    let description = ModelDescription::from(request);

    let response = match state.compiler.compile(&description) {
        CompileOutcome::Success { document, advisories } => {
            info!(
                warnings = advisories.len(),
                bytes = document.len(),
                "Training script generated"
            );
            GenerateResponse {
                success: true,
                code: Some(document),
                errors: Vec::new(),
                warnings: advisories,
                message: "Code generated successfully".to_string(),
            }
        }
        CompileOutcome::Rejected { errors, advisories } => {
            info!(errors = errors.len(), "Model description rejected by linter");
            GenerateResponse {
                success: false,
                code: None,
                errors,
                warnings: advisories,
                message: "Model description failed validation".to_string(),
            }
        }
    };

    Ok(Json(response).into_response())
}

/// One registered layer kind with its default parameter set
#[derive(Debug, Clone, Serialize)]
pub struct LayerKindInfo {
    pub kind: String,
    pub params: BTreeMap<String, ParamValue>,
}

/// Response listing the layer palette
#[derive(Debug, Clone, Serialize)]
pub struct LayerKindsResponse {
    pub kinds: Vec<LayerKindInfo>,
}

/// GET /v1/codegen/layers
///
/// Serves the registry as the single source of truth for the editor's
/// layer palette.
pub async fn list_layer_kinds() -> Result<Response, ApiError> {
    let registry = LayerRegistry::global();

    let kinds = registry
        .kinds()
        .into_iter()
        .map(|kind| LayerKindInfo {
            kind: kind.to_string(),
            params: registry
                .default_params(kind)
                .map(|defaults| {
                    defaults
                        .iter()
                        .map(|(name, value)| (name.to_string(), value.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    Ok(Json(LayerKindsResponse { kinds }).into_response())
}
