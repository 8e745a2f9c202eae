use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned_db, Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
    DEFAULT_TIMESTAMP,
};
use crate::user::*;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::{
    path::Path,
    str::FromStr,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime},
};
use tracing::debug;

const USER_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "user",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// V 0
const USER_TABLE_V_0: Table = Table {
    name: "user",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_user_email", "email")],
};
const USER_PASSWORD_CREDENTIALS_V_0: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_tried", &SqlType::Integer),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[],
};
const AUTH_TOKEN_TABLE_V_0: Table = Table {
    name: "auth_token",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_FOREIGN_KEY)
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
        sqlite_column!(
            "kind",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("expires", &SqlType::Integer),
    ],
    indices: &[("idx_auth_token_value", "value")],
};

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USER_TABLE_V_0,
        USER_PASSWORD_CREDENTIALS_V_0,
        AUTH_TOKEN_TABLE_V_0,
    ],
    migration: None,
}];

fn system_time_from_column_result(value: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(value as u64)
}

fn system_time_to_column(value: SystemTime) -> i64 {
    value
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

const SELECT_USER: &str = "SELECT id, username, email, created FROM user";
const SELECT_AUTH_TOKEN: &str =
    "SELECT user_id, value, created, last_used, kind, expires FROM auth_token";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created: system_time_from_column_result(row.get(3)?),
    })
}

fn auth_token_from_row(row: &Row) -> rusqlite::Result<AuthToken> {
    let kind_int: i32 = row.get(4)?;
    let kind = AuthTokenKind::from_int(kind_int).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Integer,
            format!("Invalid token kind {}", kind_int).into(),
        )
    })?;
    Ok(AuthToken {
        user_id: row.get(0)?,
        value: AuthTokenValue(row.get(1)?),
        created: system_time_from_column_result(row.get(2)?),
        last_used: row
            .get::<usize, Option<i64>>(3)?
            .map(system_time_from_column_result),
        kind,
        expires: row
            .get::<usize, Option<i64>>(5)?
            .map(system_time_from_column_result),
    })
}

#[derive(Clone)]
pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, VERSIONED_SCHEMAS)?;
        Ok(SqliteUserStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn find_user_id(&self, column: &str, value: &str) -> Result<Option<usize>> {
        let conn = self.conn.lock().unwrap();
        let id = conn
            .query_row(
                &format!("SELECT id FROM user WHERE {} = ?1", column),
                params![value],
                |row| row.get::<usize, usize>(0),
            )
            .optional()?;
        Ok(id)
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(&self, username: &str, email: &str) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user (username, email) VALUES (?1, ?2)",
            params![username, email],
        )
        .with_context(|| format!("Failed to create user {}", username))?;
        Ok(conn.last_insert_rowid() as usize)
    }

    fn get_user(&self, user_id: usize) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_USER),
                params![user_id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn get_user_id_by_username(&self, username: &str) -> Result<Option<usize>> {
        self.find_user_id("username", username)
    }

    fn get_user_id_by_email(&self, email: &str) -> Result<Option<usize>> {
        self.find_user_id("email", email)
    }

    fn get_all_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_USER))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<User>, _>>()?;
        Ok(users)
    }

    fn update_user(
        &self,
        user_id: usize,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        if let Some(username) = username {
            debug!("update_user({user_id}) updating username to {username}");
            tx.execute(
                "UPDATE user SET username = ?1 WHERE id = ?2",
                params![username, user_id],
            )?;
        }
        if let Some(email) = email {
            debug!("update_user({user_id}) updating email to {email}");
            tx.execute(
                "UPDATE user SET email = ?1 WHERE id = ?2",
                params![email, user_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_user(&self, user_id: usize) -> Result<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM auth_token WHERE user_id = ?1", params![user_id])?;
        tx.execute(
            "DELETE FROM user_password_credentials WHERE user_id = ?1",
            params![user_id],
        )?;
        let deleted = tx.execute("DELETE FROM user WHERE id = ?1", params![user_id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }
}

impl UserAuthTokenStore for SqliteUserStore {
    fn get_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let token = conn
            .query_row(
                &format!("{} WHERE value = ?1", SELECT_AUTH_TOKEN),
                params![value.0],
                auth_token_from_row,
            )
            .optional()?;
        Ok(token)
    }

    fn delete_user_auth_token(&self, value: &AuthTokenValue) -> Result<Option<AuthToken>> {
        let Some(token) = self.get_user_auth_token(value)? else {
            return Ok(None);
        };
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM auth_token WHERE value = ?1", params![value.0])?;
        Ok(Some(token))
    }

    fn update_user_auth_token_last_used_timestamp(&self, value: &AuthTokenValue) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE auth_token SET last_used = ?1 WHERE value = ?2",
            params![system_time_to_column(SystemTime::now()), value.0],
        )?;
        Ok(())
    }

    fn add_user_auth_token(&self, token: &AuthToken) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO auth_token (user_id, value, created, kind, expires) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                token.user_id,
                token.value.0,
                system_time_to_column(token.created),
                token.kind.to_int(),
                token.expires.map(system_time_to_column),
            ],
        )
        .context("Failed to store auth token")?;
        Ok(())
    }

    fn get_all_user_auth_tokens(&self, user_id: usize) -> Result<Vec<AuthToken>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{} WHERE user_id = ?1 ORDER BY created",
            SELECT_AUTH_TOKEN
        ))?;
        let tokens = stmt
            .query_map(params![user_id], auth_token_from_row)?
            .collect::<Result<Vec<AuthToken>, _>>()?;
        Ok(tokens)
    }

    fn prune_expired_auth_tokens(&self, now: SystemTime) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM auth_token WHERE expires IS NOT NULL AND expires <= ?1",
            params![system_time_to_column(now)],
        )?;
        Ok(removed)
    }
}

impl UserAuthCredentialsStore for SqliteUserStore {
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT user_id, salt, hash, hasher, created, last_tried, last_used FROM user_password_credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<usize, usize>(0)?,
                        row.get::<usize, String>(1)?,
                        row.get::<usize, String>(2)?,
                        row.get::<usize, String>(3)?,
                        row.get::<usize, i64>(4)?,
                        row.get::<usize, Option<i64>>(5)?,
                        row.get::<usize, Option<i64>>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((user_id, salt, hash, hasher, created, last_tried, last_used)) = row else {
            return Ok(None);
        };
        let hasher = PasswordHasher::from_str(&hasher)
            .with_context(|| format!("Invalid hasher for user {}", user_id))?;
        Ok(Some(PasswordCredentials {
            user_id,
            salt,
            hash,
            hasher,
            created: system_time_from_column_result(created),
            last_tried: last_tried.map(system_time_from_column_result),
            last_used: last_used.map(system_time_from_column_result),
        }))
    }

    fn set_password_credentials(&self, credentials: &PasswordCredentials) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO user_password_credentials (user_id, salt, hash, hasher, created) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                credentials.user_id,
                credentials.salt,
                credentials.hash,
                credentials.hasher.to_string(),
                system_time_to_column(credentials.created),
            ],
        )
        .with_context(|| format!("Failed to store credentials of user {}", credentials.user_id))?;
        Ok(())
    }

    fn update_password_last_tried(&self, user_id: usize, success: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = system_time_to_column(SystemTime::now());
        if success {
            conn.execute(
                "UPDATE user_password_credentials SET last_tried = ?1, last_used = ?1 WHERE user_id = ?2",
                params![now, user_id],
            )?;
        } else {
            conn.execute(
                "UPDATE user_password_credentials SET last_tried = ?1 WHERE user_id = ?2",
                params![now, user_id],
            )?;
        }
        Ok(())
    }
}
