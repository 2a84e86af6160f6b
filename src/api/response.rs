use serde::Serialize;

/// Uniform response envelope: every endpoint answers with a stable code, a
/// human-readable message, and an optional payload.
#[derive(Debug, Serialize)]
pub struct ResultResponse<T> {
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ResultResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "SUCCESS".to_string(),
            message: "request processed successfully".to_string(),
            data: Some(data),
        }
    }
}

impl ResultResponse<()> {
    pub fn success_empty() -> Self {
        Self {
            code: "SUCCESS".to_string(),
            message: "request processed successfully".to_string(),
            data: None,
        }
    }

    pub fn failure(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        }
    }
}
