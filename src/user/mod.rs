pub mod auth;
mod seed;
mod sqlite_user_store;
mod user_manager;
pub mod user_models;
mod user_store;

pub use auth::{
    is_password_long_enough, AuthToken, AuthTokenKind, AuthTokenValue, PasswordCredentials,
    PasswordHasher, TokenLifetimes, MIN_PASSWORD_LENGTH,
};
pub use seed::{seed_test_users, SeedReport, TEST_USERS, TEST_USERS_PASSWORD};
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::{TokenPair, UserError, UserManager};
pub use user_models::{User, UserUpdate, UserView};
pub use user_store::{UserAuthCredentialsStore, UserAuthTokenStore, UserStore};
