use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::user::{Actor, Role};
use crate::utils::token::decode_token;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

impl Claims {
    /// The identity these claims vouch for, if both subject and role are well formed.
    pub fn actor(&self) -> Option<Actor> {
        let user_id = Uuid::parse_str(&self.sub).ok()?;
        let role: Role = self.role.as_deref()?.parse().ok()?;
        Some(Actor { user_id, role })
    }
}

fn unauthorized(code: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": code })),
    )
        .into_response()
}

/// Validates the bearer token and attaches the caller's [`Actor`] to the request.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let Ok(claims) = decode_token(token.trim(), &state.config.jwt_secret) else {
        return unauthorized("invalid_token");
    };
    let Some(actor) = claims.actor() else {
        tracing::warn!(sub = %claims.sub, "token carries an unusable subject or role");
        return unauthorized("invalid_token");
    };

    req.extensions_mut().insert(actor);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_require_uuid_subject_and_known_role() {
        let id = Uuid::new_v4();
        let good = Claims {
            sub: id.to_string(),
            exp: 0,
            role: Some("admin".into()),
        };
        assert_eq!(
            good.actor(),
            Some(Actor {
                user_id: id,
                role: Role::Admin
            })
        );

        let bad_sub = Claims {
            sub: "42".into(),
            ..good.clone()
        };
        assert!(bad_sub.actor().is_none());

        let no_role = Claims { role: None, ..good.clone() };
        assert!(no_role.actor().is_none());

        let odd_role = Claims {
            role: Some("recruiter".into()),
            ..good
        };
        assert!(odd_role.actor().is_none());
    }
}
