//! Script Concordance Test (SCT) generation and storage shapes.

use serde::{Deserialize, Serialize};

/// Training level an SCT is generated for. Serialized with the backend's
/// Spanish identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "pregrado")]
    Undergraduate,
    #[serde(rename = "internado")]
    Internship,
    #[serde(rename = "residente")]
    Residency,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Undergraduate => "pregrado",
            Difficulty::Internship => "internado",
            Difficulty::Residency => "residente",
        }
    }
}

/// Body of `POST /api/sct/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctGenerateRequest {
    pub num_items: u32,
    pub difficulty: Difficulty,
    pub focus: String,
}

/// A single SCT item. `correct_answer` is on the -2..=2 Likert scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub vignette: String,
    pub hypothesis: String,
    pub new_info: String,
    pub correct_answer: i8,
    pub explanation: String,
}

impl SctItem {
    /// Whether `correct_answer` lies on the response scale.
    pub fn has_valid_answer(&self) -> bool {
        (-2..=2).contains(&self.correct_answer)
    }
}

/// Response of `/api/sct/generate` and `/api/sct/example`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctTestResponse {
    pub items: Vec<SctItem>,
    pub difficulty: String,
    pub focus: String,
    pub total: u32,
}

/// Body of `POST /api/sct/save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctSaveRequest {
    pub name: String,
    pub difficulty: String,
    pub focus: String,
    pub num_items: u32,
    pub items: Vec<SctItem>,
}

impl SctSaveRequest {
    /// Build a save request from a generated test.
    pub fn from_response(name: impl Into<String>, response: &SctTestResponse) -> Self {
        Self {
            name: name.into(),
            difficulty: response.difficulty.clone(),
            focus: response.focus.clone(),
            num_items: response.items.len() as u32,
            items: response.items.clone(),
        }
    }
}

/// Entry of `GET /api/sct/list` and response of `/api/sct/save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctTestSummary {
    pub id: u64,
    pub name: String,
    pub difficulty: String,
    pub focus: String,
    pub num_items: u32,
    pub created_at: String,
}

/// Response of `GET /api/sct/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SctTestDetail {
    pub id: u64,
    pub name: String,
    pub difficulty: String,
    pub focus: String,
    pub num_items: u32,
    pub items: Vec<SctItem>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode_response;

    #[test]
    fn test_generate_request_uses_backend_identifiers() {
        let request = SctGenerateRequest {
            num_items: 5,
            difficulty: Difficulty::Residency,
            focus: "tuberculosis".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""difficulty":"residente""#));
        assert!(json.contains(r#""num_items":5"#));
    }

    #[test]
    fn test_response_and_save_request() {
        let body = r#"{
            "items": [{
                "id": 1,
                "vignette": "Paciente de 45 años con tos",
                "hypothesis": "Tuberculosis pulmonar",
                "new_info": "Baciloscopia positiva",
                "correct_answer": 2,
                "explanation": "Confirma la hipótesis"
            }],
            "difficulty": "pregrado",
            "focus": "tuberculosis",
            "total": 1
        }"#;
        let response: SctTestResponse = decode_response(200, body).unwrap();
        assert_eq!(response.items.len(), 1);
        assert!(response.items[0].has_valid_answer());

        let save = SctSaveRequest::from_response("Test TB", &response);
        assert_eq!(save.num_items, 1);
        assert_eq!(save.difficulty, "pregrado");
    }

    #[test]
    fn test_answer_out_of_scale() {
        let item = SctItem {
            id: None,
            vignette: String::new(),
            hypothesis: String::new(),
            new_info: String::new(),
            correct_answer: 3,
            explanation: String::new(),
        };
        assert!(!item.has_valid_answer());
    }
}
