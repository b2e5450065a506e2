use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, RegisterRequest},
    errors::AuthError,
    jwt::TokenService,
    password::{hash_password, verify_dummy, verify_password},
    repo::{RoleStore, UserStore},
    repo_types::{NewUser, Principal, User},
};

/// Role given to every self-registered account.
pub const DEFAULT_ROLE: &str = "USER";

/// Registration, login and token authentication over the user and role stores.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, roles: Arc<dyn RoleStore>, tokens: TokenService) -> Self {
        Self {
            users,
            roles,
            tokens,
        }
    }

    /// Hashes the password and stores a new `USER` account.
    ///
    /// Username and password rules are checked by the caller beforehand.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        let role = self
            .roles
            .find_by_name(DEFAULT_ROLE)
            .await?
            .ok_or_else(|| AuthError::RoleNotFound(DEFAULT_ROLE.to_string()))?;

        let password_hash = hash_password(&req.password)?;

        let user = self
            .users
            .save(NewUser {
                username: req.username.clone(),
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Returns the principal for matching credentials. An unknown username and
    /// a wrong password fail with the same error.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn login(&self, req: &LoginRequest) -> Result<Principal, AuthError> {
        let Some(user) = self.users.find_by_username(&req.username).await? else {
            warn!("login for unknown username");
            verify_dummy(&req.password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&req.password, &user.password_hash)? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        Ok(Principal::from(&user))
    }

    /// Session token for a logged-in principal, valid for the configured ttl.
    pub fn issue_token(&self, principal: &Principal) -> Result<String, AuthError> {
        self.tokens
            .issue(&principal.username, self.tokens.default_ttl())
    }

    /// Resolves a bearer token to the username it was issued for. Expired
    /// tokens are rejected before the username is trusted.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<String, AuthError> {
        if self.tokens.is_expired(token)? {
            debug!("token expired");
            return Err(AuthError::TokenExpired);
        }
        let username = self.tokens.extract_username(token)?;
        debug!(username = %username, "token authenticated");
        self.find_by_username(&username).await?;
        Ok(username)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, AuthError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))
    }

    pub async fn get_user_id(&self, username: &str) -> Result<Uuid, AuthError> {
        Ok(self.find_by_username(username).await?.id)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(id.to_string()))
    }

    /// True when no account uses `username` yet. Advisory only: the store's
    /// uniqueness constraint is what actually rejects duplicates.
    pub async fn is_unique_username(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.users.find_by_username(username).await?.is_none())
    }
}
