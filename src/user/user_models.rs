use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: usize,
    pub username: String,
    pub email: String,
    pub created: SystemTime,
}

/// The public representation of a user, as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: usize,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        let created: DateTime<Utc> = user.created.into();
        UserView {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: created.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Fields a user may change on their own account. Absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
