//! Placement-hint client.
//!
//! The hint service sees the current layout and the incoming asset and
//! proposes a box for it. Its answer is advisory: the placement engine
//! validates it and falls back to local strategies when it is unusable.

use canvas::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use canvas::doc::Scene;
use canvas::placement::PlacementHint;
use serde::Serialize;
use serde_json::Value;

use super::assets::AssetMetadata;
use super::types::ServiceError;
use super::{HttpBackend, read_text};

/// Source of placement hints.
#[async_trait::async_trait]
pub trait HintSource: Send + Sync {
    async fn suggest(&self, request: &HintRequest) -> Result<PlacementHint, ServiceError>;
}

/// Logical box of one element already on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistingElement {
    #[serde(rename = "type")]
    pub element_type: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Body of `POST {api}/placement/suggest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HintRequest {
    pub existing_elements: Vec<ExistingElement>,
    pub asset_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_category: Option<String>,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl HintRequest {
    /// Describe the scene's current layout for an incoming asset.
    #[must_use]
    pub fn from_scene(scene: &Scene, asset_reference: &str, metadata: Option<&AssetMetadata>) -> Self {
        let existing_elements = scene
            .elements()
            .iter()
            .map(|el| {
                let b = el.bounds();
                ExistingElement {
                    element_type: el.element_type().as_str(),
                    x: b.x,
                    y: b.y,
                    width: b.width,
                    height: b.height,
                }
            })
            .collect();
        Self {
            existing_elements,
            asset_reference: asset_reference.to_string(),
            asset_description: metadata.and_then(|m| m.description.clone()),
            asset_category: metadata.and_then(|m| m.category.clone()),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }
}

/// Parse a hint response body. Fields that are missing or not numbers are
/// left as `None`; the placement engine decides what that means.
///
/// # Errors
///
/// Returns [`ServiceError::Parse`] if the body is not a JSON object.
pub fn parse_hint_response(text: &str) -> Result<PlacementHint, ServiceError> {
    let value: Value = serde_json::from_str(text).map_err(|e| ServiceError::Parse(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ServiceError::Parse("hint response is not an object".into()));
    };
    let number = |key: &str| fields.get(key).and_then(Value::as_f64);
    Ok(PlacementHint { x: number("x"), y: number("y"), width: number("width"), height: number("height") })
}

#[async_trait::async_trait]
impl HintSource for HttpBackend {
    async fn suggest(&self, request: &HintRequest) -> Result<PlacementHint, ServiceError> {
        let url = self.endpoint("/placement/suggest")?;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let text = read_text(response).await?;
        parse_hint_response(&text)
    }
}

#[cfg(test)]
#[path = "hint_test.rs"]
mod tests;
