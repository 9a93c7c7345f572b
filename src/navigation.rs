use std::fmt;

use crate::error::AppError;

/// Navigation targets the client can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Assets,
    Audit,
    Join(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Assets => "/assets".to_string(),
            Route::Audit => "/audit".to_string(),
            Route::Join(code) => format!("/join/{code}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Unauthorized API responses send the user to `/login`.
pub fn redirect_for(err: &AppError) -> Option<Route> {
    if err.is_auth_failure() {
        Some(Route::Login)
    } else {
        None
    }
}
