use super::auth_gate::AuthGate;
use super::routing::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// What the auth screen does after a submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Navigate(Route),
    ShowError(String),
}

/// State of the login/register form.
#[derive(Clone, Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    /// Username or email, used when logging in.
    pub login: String,
    pub password: String,
    error: Option<String>,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            email: String::new(),
            login: String::new(),
            password: String::new(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
    }

    /// Submits the form through `gate`. On success the caller should navigate to the
    /// browse screen; on failure the message is kept on the form and nothing navigates.
    pub async fn submit(&mut self, gate: &dyn AuthGate) -> AuthOutcome {
        self.error = None;
        let result = match self.mode {
            AuthMode::Login => gate.login(&self.login, &self.password).await,
            AuthMode::Register => {
                gate.register(&self.username, &self.email, &self.password)
                    .await
            }
        };
        match result {
            Ok(_) => AuthOutcome::Navigate(Route::Browse),
            Err(err) => {
                let message = err.message().to_string();
                self.error = Some(message.clone());
                AuthOutcome::ShowError(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::auth_gate::validate_registration_password;
    use crate::client::AuthError;
    use crate::user::UserView;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGate {
        calls: AtomicUsize,
        user: Mutex<Option<UserView>>,
    }

    fn user(username: &str) -> UserView {
        UserView {
            id: 1,
            username: username.to_string(),
            email: format!("{}@example.in", username),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[async_trait]
    impl AuthGate for FakeGate {
        async fn login(&self, identifier: &str, password: &str) -> Result<UserView, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password == "test123" {
                *self.user.lock().unwrap() = Some(user(identifier));
                Ok(user(identifier))
            } else {
                Err(AuthError::Rejected(
                    "Invalid username/email or password".to_string(),
                ))
            }
        }

        async fn register(
            &self,
            username: &str,
            _email: &str,
            password: &str,
        ) -> Result<UserView, AuthError> {
            validate_registration_password(password)?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.user.lock().unwrap() = Some(user(username));
            Ok(user(username))
        }

        async fn logout(&self) {
            *self.user.lock().unwrap() = None;
        }

        fn current_user(&self) -> Option<UserView> {
            self.user.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn successful_login_navigates_to_browse() {
        let gate = FakeGate::default();
        let mut form = AuthForm::new(AuthMode::Login);
        form.login = "meera_bangalore".to_string();
        form.password = "test123".to_string();

        assert_eq!(form.submit(&gate).await, AuthOutcome::Navigate(Route::Browse));
        assert!(form.error().is_none());
        assert!(gate.is_authenticated());
    }

    #[tokio::test]
    async fn rejected_login_shows_backend_message() {
        let gate = FakeGate::default();
        let mut form = AuthForm::new(AuthMode::Login);
        form.login = "meera_bangalore".to_string();
        form.password = "wrong-password".to_string();

        assert_eq!(
            form.submit(&gate).await,
            AuthOutcome::ShowError("Invalid username/email or password".to_string())
        );
        assert_eq!(form.error(), Some("Invalid username/email or password"));
        assert!(!gate.is_authenticated());
    }

    #[tokio::test]
    async fn short_password_registration_never_reaches_gate_backend() {
        let gate = FakeGate::default();
        let mut form = AuthForm::new(AuthMode::Register);
        form.username = "rohan_delhi".to_string();
        form.email = "rohan.gupta@delhi.in".to_string();
        form.password = "12345".to_string();

        let outcome = form.submit(&gate).await;
        assert_eq!(
            outcome,
            AuthOutcome::ShowError("Password must be at least 6 characters".to_string())
        );
        assert_eq!(gate.calls.load(Ordering::SeqCst), 0);

        form.password = "123456".to_string();
        assert_eq!(form.submit(&gate).await, AuthOutcome::Navigate(Route::Browse));
        assert_eq!(gate.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn switching_mode_clears_error() {
        let mut form = AuthForm::new(AuthMode::Login);
        form.error = Some("boom".to_string());
        form.switch_mode(AuthMode::Register);
        assert!(form.error().is_none());
        assert_eq!(form.mode, AuthMode::Register);
    }
}
