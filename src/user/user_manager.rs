use super::{
    auth::is_password_long_enough, AuthToken, AuthTokenKind, AuthTokenValue, PasswordCredentials,
    TokenLifetimes, User, UserStore, UserUpdate,
};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username, email, and password are required")]
    MissingRegistrationFields,
    #[error("Username/Email and password are required")]
    MissingLoginFields,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email already exists")]
    EmailTaken,
    #[error("Invalid username/email or password")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("User not found")]
    NotFound,
    #[error("Unauthorized to {0} this user")]
    Forbidden(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// A freshly issued access/refresh token pair.
#[derive(Clone, Debug)]
pub struct TokenPair {
    pub access: AuthToken,
    pub refresh: AuthToken,
}

pub struct UserManager {
    user_store: Arc<dyn UserStore>,
    token_lifetimes: TokenLifetimes,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl UserManager {
    pub fn new(user_store: Arc<dyn UserStore>, token_lifetimes: TokenLifetimes) -> Self {
        Self {
            user_store,
            token_lifetimes,
        }
    }

    fn ensure_username_free(&self, username: &str) -> Result<(), UserError> {
        if self.user_store.get_user_id_by_username(username)?.is_some() {
            return Err(UserError::UsernameTaken);
        }
        Ok(())
    }

    fn ensure_email_free(&self, email: &str) -> Result<(), UserError> {
        if self.user_store.get_user_id_by_email(email)?.is_some() {
            return Err(UserError::EmailTaken);
        }
        Ok(())
    }

    /// Creates a user with password credentials, without issuing any token.
    pub fn add_user(&self, username: &str, email: &str, password: &str) -> Result<User, UserError> {
        if is_blank(username) || is_blank(email) || password.is_empty() {
            return Err(UserError::MissingRegistrationFields);
        }
        if !is_password_long_enough(password) {
            return Err(UserError::PasswordTooShort);
        }
        self.ensure_username_free(username)?;
        self.ensure_email_free(email)?;

        let user_id = self.user_store.create_user(username, email)?;
        let credentials = PasswordCredentials::create(user_id, password)?;
        self.user_store.set_password_credentials(&credentials)?;
        info!("Created user {} ({})", username, user_id);

        self.user_store
            .get_user(user_id)?
            .ok_or(UserError::NotFound)
    }

    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, TokenPair), UserError> {
        let user = self.add_user(username, email, password)?;
        let tokens = self.issue_tokens(user.id)?;
        Ok((user, tokens))
    }

    /// Checks `password` against the credentials of the user whose username or email is
    /// `login`.
    pub fn check_password(&self, login: &str, password: &str) -> Result<User, UserError> {
        if is_blank(login) || password.is_empty() {
            return Err(UserError::MissingLoginFields);
        }
        let user = self
            .user_store
            .get_user_by_login(login)?
            .ok_or(UserError::InvalidCredentials)?;
        let credentials = self
            .user_store
            .get_password_credentials(user.id)?
            .ok_or(UserError::InvalidCredentials)?;

        let valid = credentials.verify(password)?;
        self.user_store.update_password_last_tried(user.id, valid)?;
        if !valid {
            debug!("Wrong password for user {}", user.id);
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    pub fn login(&self, login: &str, password: &str) -> Result<(User, TokenPair), UserError> {
        let user = self.check_password(login, password)?;
        let tokens = self.issue_tokens(user.id)?;
        info!("User {} logged in", user.id);
        Ok((user, tokens))
    }

    fn issue_token(&self, user_id: usize, kind: AuthTokenKind) -> Result<AuthToken, UserError> {
        let lifetime = match kind {
            AuthTokenKind::Access => self.token_lifetimes.access,
            AuthTokenKind::Refresh => self.token_lifetimes.refresh,
        };
        let token = AuthToken::new(user_id, kind, lifetime);
        self.user_store.add_user_auth_token(&token)?;
        Ok(token)
    }

    fn issue_tokens(&self, user_id: usize) -> Result<TokenPair, UserError> {
        Ok(TokenPair {
            access: self.issue_token(user_id, AuthTokenKind::Access)?,
            refresh: self.issue_token(user_id, AuthTokenKind::Refresh)?,
        })
    }

    /// Returns the token if it exists, has the given kind and hasn't expired. Marks it
    /// as used.
    pub fn resolve_token(
        &self,
        value: &AuthTokenValue,
        kind: AuthTokenKind,
    ) -> Result<AuthToken, UserError> {
        let token = self
            .user_store
            .get_user_auth_token(value)?
            .ok_or(UserError::InvalidToken)?;
        if token.kind != kind || token.is_expired() {
            return Err(UserError::InvalidToken);
        }
        self.user_store
            .update_user_auth_token_last_used_timestamp(value)?;
        Ok(token)
    }

    /// Exchanges a valid refresh token for a new access token.
    pub fn refresh(&self, refresh_value: &AuthTokenValue) -> Result<AuthToken, UserError> {
        let refresh = self.resolve_token(refresh_value, AuthTokenKind::Refresh)?;
        if self.user_store.get_user(refresh.user_id)?.is_none() {
            return Err(UserError::InvalidToken);
        }
        self.issue_token(refresh.user_id, AuthTokenKind::Access)
    }

    pub fn logout(&self, value: &AuthTokenValue) -> Result<(), UserError> {
        if let Some(token) = self.user_store.delete_user_auth_token(value)? {
            info!("User {} logged out", token.user_id);
        }
        Ok(())
    }

    pub fn get_user(&self, user_id: usize) -> Result<User, UserError> {
        self.user_store
            .get_user(user_id)?
            .ok_or(UserError::NotFound)
    }

    pub fn find_user(&self, login: &str) -> Result<Option<User>, UserError> {
        Ok(self.user_store.get_user_by_login(login)?)
    }

    pub fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.user_store.get_all_users()?)
    }

    pub fn update_user(
        &self,
        actor_id: usize,
        user_id: usize,
        update: UserUpdate,
    ) -> Result<User, UserError> {
        if actor_id != user_id {
            return Err(UserError::Forbidden("update"));
        }
        let user = self.get_user(user_id)?;

        let username = update
            .username
            .filter(|username| *username != user.username);
        if let Some(username) = &username {
            if is_blank(username) {
                return Err(UserError::MissingRegistrationFields);
            }
            self.ensure_username_free(username)?;
        }
        let email = update.email.filter(|email| *email != user.email);
        if let Some(email) = &email {
            if is_blank(email) {
                return Err(UserError::MissingRegistrationFields);
            }
            self.ensure_email_free(email)?;
        }
        if let Some(password) = &update.password {
            if !is_password_long_enough(password) {
                return Err(UserError::PasswordTooShort);
            }
        }

        self.user_store
            .update_user(user_id, username.as_deref(), email.as_deref())?;
        if let Some(password) = update.password {
            self.set_password(user_id, &password)?;
        }
        self.get_user(user_id)
    }

    /// Replaces the password of `user_id`. Existing tokens stay valid.
    pub fn set_password(&self, user_id: usize, password: &str) -> Result<(), UserError> {
        if !is_password_long_enough(password) {
            return Err(UserError::PasswordTooShort);
        }
        let credentials = PasswordCredentials::create(user_id, password)?;
        self.user_store.set_password_credentials(&credentials)?;
        Ok(())
    }

    pub fn delete_user(&self, actor_id: usize, user_id: usize) -> Result<(), UserError> {
        if actor_id != user_id {
            return Err(UserError::Forbidden("delete"));
        }
        self.remove_user(user_id)
    }

    /// Deletes a user without any ownership check. Used by admin tooling.
    pub fn remove_user(&self, user_id: usize) -> Result<(), UserError> {
        if !self.user_store.delete_user(user_id)? {
            return Err(UserError::NotFound);
        }
        info!("Deleted user {}", user_id);
        Ok(())
    }

    pub fn get_user_tokens(&self, user_id: usize) -> Result<Vec<AuthToken>, UserError> {
        Ok(self.user_store.get_all_user_auth_tokens(user_id)?)
    }

    pub fn prune_expired_tokens(&self) -> Result<usize, UserError> {
        Ok(self
            .user_store
            .prune_expired_auth_tokens(SystemTime::now())?)
    }
}
