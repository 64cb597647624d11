// ABOUTME: Wire types for the backend HTTP API.
// ABOUTME: Field names match the backend's JSON exactly; do not rename casually.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login payload: the bearer token plus the user's identity.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
}

/// Submission to the judge service proxy.
#[derive(Debug, Serialize)]
pub struct ExecuteRequest<'a> {
    pub source_code: &'a str,
    pub language_id: u32,
    pub stdin: &'a str,
}

/// Error body the backend returns on rejected requests.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_request_uses_snake_case_wire_names() {
        let req = ExecuteRequest {
            source_code: "print(1)",
            language_id: 71,
            stdin: "",
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["source_code"], "print(1)");
        assert_eq!(value["language_id"], 71);
        assert_eq!(value["stdin"], "");
    }

    #[test]
    fn login_response_deserializes_flat_payload() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"token":"tok","id":7,"username":"ada","email":"ada@example.com"}"#,
        )
        .unwrap();
        assert_eq!(resp.token, "tok");
        assert_eq!(resp.id, 7);
        assert_eq!(resp.username, "ada");
    }

    #[test]
    fn register_response_tolerates_missing_message() {
        let resp: RegisterResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.message, "");
    }
}
