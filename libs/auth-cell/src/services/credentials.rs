use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{AppState, UserRepository};
use shared_models::auth::{LoginRequest, TokenResponse, UserAccount};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, verify_password};

use crate::models::AuthError;

pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    config: Arc<AppConfig>,
}

impl CredentialService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: Arc::clone(&state.users),
            config: Arc::clone(&state.config),
        }
    }

    /// Checks the password and issues a token for the account.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AuthError> {
        debug!("Login attempt for {}", request.login);

        let account = match self.users.find_by_login(&request.login).await? {
            Some(account) => account,
            None => {
                warn!("Login for unknown account {}", request.login);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let matches = verify_password(&request.password, &account.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !matches {
            warn!("Wrong password for {}", request.login);
            return Err(AuthError::InvalidCredentials);
        }

        let token = issue_token(
            &account.login,
            &self.config.jwt_secret,
            &self.config.jwt_issuer,
            Duration::hours(self.config.jwt_ttl_hours),
        )?;

        info!("Issued token for {}", account.login);
        Ok(TokenResponse { token })
    }

    /// Stores a new account with an argon2 hash of `password`.
    pub async fn register(&self, login: &str, password: &str) -> Result<UserAccount, AuthError> {
        if login.trim().is_empty() || password.is_empty() {
            return Err(AuthError::BlankCredentials);
        }

        let password_hash = hash_password(password).map_err(|e| AuthError::Hashing(e.to_string()))?;
        let account = self
            .users
            .insert(UserAccount {
                id: Uuid::new_v4(),
                login: login.trim().to_string(),
                password_hash,
            })
            .await?;

        info!("Registered account {}", account.login);
        Ok(account)
    }

    /// Creates the configured admin account unless it already exists.
    pub async fn seed_admin(&self) -> Result<(), AuthError> {
        let (Some(login), Some(password)) = (&self.config.admin_login, &self.config.admin_password) else {
            debug!("No admin credentials configured");
            return Ok(());
        };

        if self.users.find_by_login(login).await?.is_some() {
            debug!("Admin account {} already present", login);
            return Ok(());
        }

        self.register(login, password).await.map(|_| ())
    }
}
