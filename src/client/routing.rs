/// The two screens of the browser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Auth,
    Browse,
}

/// Where a request for `requested` actually lands. Browsing needs a session and the
/// auth screen is pointless with one.
pub fn resolve_route(requested: Route, authenticated: bool) -> Route {
    match (requested, authenticated) {
        (Route::Browse, false) => Route::Auth,
        (Route::Auth, true) => Route::Browse,
        (route, _) => route,
    }
}
