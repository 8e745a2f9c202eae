//! Passwords and session tokens

use anyhow::{bail, Result};

use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime};

/// Shortest password accepted at registration or password change, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn is_password_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct AuthTokenValue(pub String);

impl AuthTokenValue {
    pub fn generate() -> AuthTokenValue {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();
        AuthTokenValue(random_string)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum AuthTokenKind {
    Access,
    Refresh,
}

impl AuthTokenKind {
    pub fn to_int(self) -> i32 {
        match self {
            AuthTokenKind::Access => 0,
            AuthTokenKind::Refresh => 1,
        }
    }

    pub fn from_int(value: i32) -> Option<AuthTokenKind> {
        match value {
            0 => Some(AuthTokenKind::Access),
            1 => Some(AuthTokenKind::Refresh),
            _ => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct AuthToken {
    pub user_id: usize,
    pub value: AuthTokenValue,
    pub kind: AuthTokenKind,
    pub created: SystemTime,
    pub expires: Option<SystemTime>,
    pub last_used: Option<SystemTime>,
}

impl AuthToken {
    pub fn new(user_id: usize, kind: AuthTokenKind, lifetime: Duration) -> AuthToken {
        let created = SystemTime::now();
        AuthToken {
            user_id,
            value: AuthTokenValue::generate(),
            kind,
            created,
            expires: Some(created + lifetime),
            last_used: None,
        }
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }
}

/// How long freshly issued tokens stay valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::from_secs(60 * 60),
            refresh: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

mod moodtunes_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{
            rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        },
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash<T: AsRef<str>>(plain: &[u8], b64_salt: T) -> Result<String> {
        let salt = SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
        let hash_string = Argon2::default()
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(hash_string)
    }

    pub fn verify<T: AsRef<str>>(plain_pw: &[u8], target_hash: T) -> Result<bool> {
        let password_hash =
            PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(Argon2::default()
            .verify_password(plain_pw, &password_hash)
            .is_ok())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum PasswordHasher {
    Argon2,
    /// Fast test-only hasher - DO NOT use in production!
    #[cfg(feature = "test-fast-hasher")]
    TestFast,
}

impl PasswordHasher {
    /// The hasher used for new credentials.
    pub fn current() -> PasswordHasher {
        #[cfg(feature = "test-fast-hasher")]
        {
            PasswordHasher::TestFast
        }
        #[cfg(not(feature = "test-fast-hasher"))]
        {
            PasswordHasher::Argon2
        }
    }

    pub fn generate_b64_salt(&self) -> String {
        match self {
            PasswordHasher::Argon2 => moodtunes_argon2::generate_b64_salt(),
            #[cfg(feature = "test-fast-hasher")]
            PasswordHasher::TestFast => "test_salt".to_string(),
        }
    }

    pub fn hash<T: AsRef<str>>(&self, plain: &[u8], b64_salt: T) -> Result<String> {
        match self {
            PasswordHasher::Argon2 => moodtunes_argon2::hash(plain, b64_salt),
            #[cfg(feature = "test-fast-hasher")]
            PasswordHasher::TestFast => {
                let hex: String = plain.iter().map(|b| format!("{:02x}", b)).collect();
                Ok(format!("$testfast${}${}", b64_salt.as_ref(), hex))
            }
        }
    }

    pub fn verify(&self, plain_pw: &str, target_hash: &str) -> Result<bool> {
        match self {
            PasswordHasher::Argon2 => moodtunes_argon2::verify(plain_pw.as_bytes(), target_hash),
            #[cfg(feature = "test-fast-hasher")]
            PasswordHasher::TestFast => {
                let hex: String = plain_pw
                    .as_bytes()
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect();
                Ok(target_hash
                    .strip_prefix("$testfast$")
                    .and_then(|s| s.split('$').nth(1))
                    .is_some_and(|stored| stored == hex))
            }
        }
    }
}

impl FromStr for PasswordHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(PasswordHasher::Argon2),
            #[cfg(feature = "test-fast-hasher")]
            "test_fast" => Ok(PasswordHasher::TestFast),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl fmt::Display for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordHasher::Argon2 => write!(f, "argon2"),
            #[cfg(feature = "test-fast-hasher")]
            PasswordHasher::TestFast => write!(f, "test_fast"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PasswordCredentials {
    pub user_id: usize,
    pub salt: String,
    pub hash: String,
    pub hasher: PasswordHasher,

    pub created: SystemTime,
    pub last_tried: Option<SystemTime>,
    pub last_used: Option<SystemTime>,
}

impl PasswordCredentials {
    pub fn create(user_id: usize, password: &str) -> Result<PasswordCredentials> {
        let hasher = PasswordHasher::current();
        let salt = hasher.generate_b64_salt();
        let hash = hasher.hash(password.as_bytes(), &salt)?;
        Ok(PasswordCredentials {
            user_id,
            salt,
            hash,
            hasher,
            created: SystemTime::now(),
            last_tried: None,
            last_used: None,
        })
    }

    pub fn verify(&self, password: &str) -> Result<bool> {
        self.hasher.verify(password, &self.hash)
    }
}
