//! Client side of the browser: the auth gate and the screens it guards.

mod auth_form;
mod auth_gate;
mod error;
mod routing;

pub use auth_form::{AuthForm, AuthMode, AuthOutcome};
pub use auth_gate::{
    validate_registration_password, AuthGate, AuthSession, HttpAuthGate,
    PASSWORD_TOO_SHORT_MESSAGE,
};
pub use error::{AuthError, AUTH_UNAVAILABLE_MESSAGE};
pub use routing::{resolve_route, Route};
