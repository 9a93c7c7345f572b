use crate::error::AppError;

/// Where the browser goes to start the Google sign-in flow.
pub fn google_login_url(api_url: &str) -> String {
    format!("{}/auth/google", api_url.trim_end_matches('/'))
}

/// Where the browser goes to join an organization by invite code. The API
/// handles the OAuth hand-off from there.
pub fn join_url(api_url: &str, code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Join code is required".to_string()));
    }
    let encoded: String = form_urlencoded::byte_serialize(code.as_bytes()).collect();
    Ok(format!("{}/auth/join/{encoded}", api_url.trim_end_matches('/')))
}

/// Message for the `error` parameter the OAuth callback sends back to `/login`.
pub fn login_error_message(code: &str) -> &'static str {
    match code {
        "auth_failed" => "Authentication failed. Please try again.",
        "no_user_info" => "Could not get user info from Google.",
        "no_email" => "No email provided by Google.",
        "account_disabled" => "Your account has been disabled.",
        _ => "An error occurred. Please try again.",
    }
}

/// What the sign-in callback handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Token(String),
    Error(&'static str),
}

/// Accept either a bare token or the callback's query string
/// (`token=...` on success, `error=<code>` on failure).
pub fn parse_callback(input: &str) -> Result<Callback, AppError> {
    let input = input.trim().trim_start_matches('?');
    if !input.contains('=') {
        if input.is_empty() {
            return Err(AppError::BadRequest("Token must not be empty".to_string()));
        }
        return Ok(Callback::Token(input.to_string()));
    }

    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        match key.as_ref() {
            "error" => return Ok(Callback::Error(login_error_message(&value))),
            "token" | "access_token" if !value.is_empty() => {
                return Ok(Callback::Token(value.into_owned()));
            }
            _ => {}
        }
    }
    Err(AppError::BadRequest("No token in callback".to_string()))
}
