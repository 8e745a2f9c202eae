use super::{AuthToken, AuthTokenValue, PasswordCredentials, User};
use anyhow::Result;
use std::time::SystemTime;

pub trait UserStore: UserAuthCredentialsStore + UserAuthTokenStore + Send + Sync {
    /// Creates a new user and returns its id.
    fn create_user(&self, username: &str, email: &str) -> Result<usize>;

    fn get_user(&self, user_id: usize) -> Result<Option<User>>;

    fn get_user_id_by_username(&self, username: &str) -> Result<Option<usize>>;

    fn get_user_id_by_email(&self, email: &str) -> Result<Option<usize>>;

    /// Looks a user up by username first, then by email.
    fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let user_id = match self.get_user_id_by_username(login)? {
            Some(id) => Some(id),
            None => self.get_user_id_by_email(login)?,
        };
        match user_id {
            Some(id) => self.get_user(id),
            None => Ok(None),
        }
    }

    fn get_all_users(&self) -> Result<Vec<User>>;

    fn update_user(&self, user_id: usize, username: Option<&str>, email: Option<&str>)
        -> Result<()>;

    /// Deletes the user with its credentials and tokens. Returns false if there was no
    /// such user.
    fn delete_user(&self, user_id: usize) -> Result<bool>;
}

pub trait UserAuthCredentialsStore: Send + Sync {
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>>;

    /// Inserts or replaces the password credentials of `credentials.user_id`.
    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()>;

    fn update_password_last_tried(&self, user_id: usize, success: bool) -> Result<()>;
}

pub trait UserAuthTokenStore: Send + Sync {
    fn get_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>>;

    fn delete_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>>;

    fn update_user_auth_token_last_used_timestamp(&self, value: &AuthTokenValue) -> Result<()>;

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()>;

    fn get_all_user_auth_tokens(&self, user_id: usize) -> Result<Vec<AuthToken>>;

    /// Removes every token that expired before `now`. Returns how many were removed.
    fn prune_expired_auth_tokens(&self, now: SystemTime) -> Result<usize>;
}
