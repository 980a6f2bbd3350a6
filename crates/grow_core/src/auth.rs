use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct AuthRequest {
    #[serde(default)]
    password: Option<String>,
}

/// Status code plus the JSON body returned to the admin gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponse {
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResponse {
    fn accepted() -> Self {
        Self {
            status: 200,
            success: true,
            error: None,
        }
    }

    fn rejected() -> Self {
        Self {
            status: 401,
            success: false,
            error: None,
        }
    }

    fn malformed() -> Self {
        Self {
            status: 400,
            success: false,
            error: Some("Invalid request".to_string()),
        }
    }
}

/// Compares the posted `{ "password": .. }` body against `expected`. An unset
/// expected password or a body without a password is rejected, including when
/// neither is set. CORS preflight is left to whatever serves this check.
pub fn check_password(body: &str, expected: Option<&str>) -> AuthResponse {
    let Ok(request) = serde_json::from_str::<AuthRequest>(body) else {
        tracing::debug!("rejecting malformed auth body");
        return AuthResponse::malformed();
    };
    match expected {
        Some(expected) if request.password.as_deref() == Some(expected) => {
            AuthResponse::accepted()
        }
        _ => AuthResponse::rejected(),
    }
}
