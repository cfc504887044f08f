//! Client-side routes and the authentication guard

use std::fmt;

/// A page of the application
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Login page
    Login,
    /// Account creation, first step
    Signup,
    /// Account creation, second step
    SignupPart2,
    /// Inbox overview
    Home,
    /// Compose a new email
    New,
    /// Answer an email
    Answer,
    /// Search
    Search,
    /// Emails set aside to answer later
    ReplyLater,
    /// Sorting rules
    Rules,
    /// Settings
    Settings,
}

impl Route {
    const ALL: [Route; 10] = [
        Route::Login,
        Route::Signup,
        Route::SignupPart2,
        Route::Home,
        Route::New,
        Route::Answer,
        Route::Search,
        Route::ReplyLater,
        Route::Rules,
        Route::Settings,
    ];

    /// The URL path of the route
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Signup => "/signup",
            Route::SignupPart2 => "/signup_part2",
            Route::Home => "/home",
            Route::New => "/new",
            Route::Answer => "/answer",
            Route::Search => "/search",
            Route::ReplyLater => "/reply_later",
            Route::Rules => "/rules",
            Route::Settings => "/settings",
        }
    }

    /// Look a route up by path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Whether the route needs a signed-in user
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup | Route::SignupPart2)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// What the guard decided
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Show the route
    Allow(Route),

    /// Go somewhere else instead
    Redirect(Route),
}

/// Decide where a navigation to `path` ends up.
///
/// Protected routes without a session and unknown paths go to the login page.
pub fn guard(path: &str, authenticated: bool) -> Navigation {
    match Route::from_path(path) {
        Some(route) if route.requires_auth() && !authenticated => Navigation::Redirect(Route::Login),
        Some(route) => Navigation::Allow(route),
        None => Navigation::Redirect(Route::Login),
    }
}
