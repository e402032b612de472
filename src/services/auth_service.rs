use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::database::UserStore;
use crate::dto::auth_dto::{AuthUserResponse, LoginPayload, RegisterPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, Role};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::issue_token;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    jwt_ttl_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, jwt_ttl_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            jwt_ttl_hours,
        }
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<AuthUserResponse> {
        payload.validate()?;
        let email = payload.email.trim().to_lowercase();
        let role = payload.role.unwrap_or(Role::Student);

        let created = self
            .users
            .insert(NewUser {
                name: payload.name.trim().to_string(),
                email: email.clone(),
                role,
                password_hash: hash_password(&payload.password)?,
            })
            .await?;
        let Some(user) = created else {
            warn!(%email, "registration for existing email refused");
            return Err(Error::Conflict("User already exists".to_string()));
        };

        info!(user_id = %user.id, role = %user.role, "user registered");
        let token = issue_token(user.id, user.role, &self.jwt_secret, self.jwt_ttl_hours)?;
        Ok(AuthUserResponse::new(user, token))
    }

    /// Unknown account, wrong role and wrong password all look the same to
    /// the caller.
    pub async fn login(&self, payload: LoginPayload) -> Result<AuthUserResponse> {
        payload.validate()?;
        let Some(role) = payload.role else {
            return Err(Error::BadRequest(
                "Please provide email and password".to_string(),
            ));
        };
        let email = payload.email.trim().to_lowercase();

        let user = self.users.find_by_email_and_role(&email, role).await?;
        let Some(user) = user.filter(|u| verify_password(&payload.password, &u.password_hash))
        else {
            warn!(%email, "failed login");
            return Err(Error::BadRequest("Invalid credentials".to_string()));
        };

        let token = issue_token(user.id, user.role, &self.jwt_secret, self.jwt_ttl_hours)?;
        Ok(AuthUserResponse::new(user, token))
    }
}
