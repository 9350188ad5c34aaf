//! Gemini `generateContent` client
//!
//! Builds the single analysis request (system instruction, inline image
//! data, fixed response schema) and parses the structured JSON the model
//! returns. Wire types follow the REST API's snake_case field names.

use crate::constants::{API_KEY_ENV, GEMINI_API_BASE, GEMINI_MODEL};
use crate::types::{AnalysisResult, EncodedImage};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

const SYSTEM_INSTRUCTION: &str = "\
You are an expert Design Professor specializing in Automotive and Industrial Design. \
Your goal is to educate students on the difference between \"Smart Design\" (Engineering, \
Functional, Systems, Technical) and \"Entertainment Design\" (User Experience, Aesthetics, \
Comfort, Fun, Emotional Connection).\n\
\n\
You will be provided with an exploded view diagram of a vehicle or product.\n\
1. Identify every labeled part visible in the image.\n\
2. For each part, categorize it strictly into 'Smart Design', 'Entertainment Design', or 'Hybrid Design'.\n\
3. Explain the skills required to design this part.\n\
4. Provide a brief reasoning for the classification.\n\
5. ESTIMATE the 2D bounding box for the part within the image as [ymin, xmin, ymax, xmax] \
on a scale of 0 to 1000. This is crucial for the interactive display.\n\
\n\
Output valid JSON matching the schema provided.";

const USER_PROMPT: &str = "Analyze this exploded view diagram. Identify parts, categorize \
them into Smart Design, Entertainment Design, or Hybrid Design, and provide bounding boxes. \
Output in JSON.";

/// Failure sources for the single analysis request. Every variant collapses
/// to one dismissible banner message in the UI; there is no retry.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key is missing. Set the GEMINI_API_KEY environment variable.")]
    MissingApiKey,
    #[error("Failed to fetch image from external source: {0}")]
    ImageFetch(String),
    #[error("Could not decode the selected image: {0}")]
    ImageDecode(String),
    #[error("AI analysis request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("AI analysis failed with HTTP {0}. The API key may be invalid or rate-limited.")]
    Api(reqwest::StatusCode),
    #[error("The model returned no content.")]
    EmptyResponse,
    #[error("The model response was not valid analysis JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

// ============================================================================
// REQUEST CONSTRUCTION
// ============================================================================

/// Schema the model is constrained to; property names match [`AnalysisResult`]
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overview": {
                "type": "STRING",
                "description": "A 2-sentence summary of how this specific object balances smart and entertainment design.",
            },
            "parts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING", "description": "Unique slug id for the part" },
                        "name": { "type": "STRING", "description": "The name of the part as usually labeled in the diagram" },
                        "category": {
                            "type": "STRING",
                            "enum": ["Smart Design", "Entertainment Design", "Hybrid Design"],
                        },
                        "description": { "type": "STRING", "description": "What this part does." },
                        "skills": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "List of 2-3 professional skills needed (e.g., Ergonomics, UI Design, Structural Engineering).",
                        },
                        "reasoning": { "type": "STRING", "description": "Why it fits into this category." },
                        "boundingBox": {
                            "type": "ARRAY",
                            "items": { "type": "NUMBER" },
                            "description": "Bounding box coordinates [ymin, xmin, ymax, xmax] normalized to 1000 (0-1000 scale).",
                        },
                    },
                    "required": ["id", "name", "category", "description", "skills", "reasoning", "boundingBox"],
                },
            },
        },
        "required": ["overview", "parts"],
    })
}

fn build_request(image: &EncodedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content {
            parts: vec![Part::Text {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        },
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text {
                    text: USER_PROMPT.to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

// ============================================================================
// CALL & RESPONSE EXTRACTION
// ============================================================================

/// Issue the single analysis request and parse the structured response.
/// The credential is read from the environment at call time.
pub async fn analyze_image(
    client: &reqwest::Client,
    image: &EncodedImage,
) -> Result<AnalysisResult, AnalysisError> {
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or(AnalysisError::MissingApiKey)?;

    let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, GEMINI_MODEL);
    debug!(model = GEMINI_MODEL, mime = %image.mime_type, "Sending analysis request");

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&build_request(image))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AnalysisError::Api(response.status()));
    }

    let body: GenerateContentResponse = response.json().await?;
    let text = extract_text(&body).ok_or(AnalysisError::EmptyResponse)?;
    let result: AnalysisResult = serde_json::from_str(&text)?;
    debug!(parts = result.parts.len(), "Analysis response parsed");
    Ok(result)
}

/// Concatenated text parts of the first candidate, or None if there are none
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let mut text = String::new();
    for part in &content.parts {
        if let Part::Text { text: t } = part {
            text.push_str(t);
        }
    }
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_inline_data_and_schema() {
        let image = EncodedImage {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
        };
        let value = serde_json::to_value(build_request(&image)).unwrap();

        let inline = &value["contents"][0]["parts"][0]["inline_data"];
        assert_eq!(inline["mime_type"], "image/png");
        assert_eq!(inline["data"], "aGVsbG8=");

        let config = &value["generation_config"];
        assert_eq!(config["response_mime_type"], "application/json");
        let categories = &config["response_schema"]["properties"]["parts"]["items"]["properties"]
            ["category"]["enum"];
        assert_eq!(
            categories,
            &json!(["Smart Design", "Entertainment Design", "Hybrid Design"])
        );
    }

    #[test]
    fn schema_requires_overview_and_parts() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["overview", "parts"]));
    }

    #[test]
    fn extract_text_concatenates_candidate_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": { "parts": [{"text": "{\"overview\""}, {"text": ": \"x\"}"}] }
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(extract_text(&body).unwrap(), r#"{"overview": "x"}"#);
    }

    #[test]
    fn extract_text_handles_empty_candidates() {
        let body: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(&body).is_none());

        let body: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(&body).is_none());
    }

    #[test]
    fn full_response_round_trips_into_analysis_result() {
        let payload = r#"{
            "overview": "Balanced device.",
            "parts": [{
                "id": "heatsink",
                "name": "Heatsink",
                "category": "Smart Design",
                "description": "Dissipates heat.",
                "skills": ["Thermal Engineering"],
                "reasoning": "Purely functional.",
                "boundingBox": [10, 20, 110, 220]
            }]
        }"#;
        let body = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part::Text {
                        text: payload.to_string(),
                    }],
                }),
            }],
        };
        let text = extract_text(&body).unwrap();
        let result: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(result.parts.len(), 1);
        assert!(result.parts[0].bounding_box.is_some());
    }
}
