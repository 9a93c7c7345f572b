pub mod command;
pub mod render;

use chrono::Local;

use crate::api::PasswordLogin;
use crate::auth::login;
use crate::browser::{LoadState, Tab};
use crate::error::AppError;
use crate::models::{AssetEventType, UserEventType};
use crate::navigation::Route;
use crate::state::SharedState;

pub use command::{Command, FeedName};

/// What a command produced for the terminal.
#[derive(Debug, Default)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply {
            text: text.into(),
            quit: false,
        }
    }
}

pub async fn execute(state: &SharedState, cmd: Command) -> Result<Reply, AppError> {
    let browser = &state.browser;

    if cmd.needs_dashboard() {
        let load = browser.load_state();
        if load != LoadState::Ready {
            tracing::debug!("Refusing {cmd:?} while dashboard is {load:?}");
            return Ok(Reply::text(view(state)));
        }
    }

    let reply = match cmd {
        Command::Help => Reply::text(command::HELP),
        Command::Quit => Reply {
            text: String::new(),
            quit: true,
        },
        Command::Show => Reply::text(view(state)),
        Command::Refresh => {
            browser.refresh().await;
            Reply::text(view(state))
        }
        Command::Tab(tab) => {
            browser.set_tab(tab);
            Reply::text(view(state))
        }
        Command::Search(feed, text) => {
            match feed {
                FeedName::Users => browser.user_events().set_search(&text),
                FeedName::Assets => browser.asset_events().set_search(&text),
            }
            Reply::text(format!(
                "Searching {} for \"{text}\" (run 'show' to see results)",
                feed_label(feed)
            ))
        }
        Command::Type(feed, value) => {
            match feed {
                FeedName::Users => {
                    let t = value
                        .as_deref()
                        .map(str::parse::<UserEventType>)
                        .transpose()
                        .map_err(AppError::BadRequest)?;
                    browser.user_events().set_event_type(t).await;
                }
                FeedName::Assets => {
                    let t = value
                        .as_deref()
                        .map(str::parse::<AssetEventType>)
                        .transpose()
                        .map_err(AppError::BadRequest)?;
                    browser.asset_events().set_event_type(t).await;
                }
            }
            Reply::text(feed_view(state, feed))
        }
        Command::Clear(feed) => {
            match feed {
                FeedName::Users => browser.user_events().clear_filters().await,
                FeedName::Assets => browser.asset_events().clear_filters().await,
            }
            Reply::text(feed_view(state, feed))
        }
        Command::More(feed) => {
            let issued = match feed {
                FeedName::Users => browser.user_events().load_more().await,
                FeedName::Assets => browser.asset_events().load_more().await,
            };
            if issued {
                Reply::text(feed_view(state, feed))
            } else {
                Reply::text(format!("No more {} to load", feed_label(feed)))
            }
        }
        Command::Export(feed) => {
            let today = Local::now().date_naive();
            let export = match feed {
                FeedName::Users => browser.user_events().export(today),
                FeedName::Assets => browser.asset_events().export(today),
            };
            let path = export.write_to(&state.config.export_dir).await?;
            Reply::text(format!("Wrote {}", path.display()))
        }
        Command::Theme => {
            let mode = state.theme.toggle()?;
            Reply::text(format!("Theme: {mode}"))
        }
        Command::LoginGoogle => Reply::text(format!(
            "Open {} in a browser, then run 'token <value>' with the token you receive",
            login::google_login_url(&state.config.api_url)
        )),
        Command::LoginPassword { email, password } => {
            let resp = state.api.login(&PasswordLogin { email, password }).await?;
            state.session.set_token(&resp.access_token)?;
            tracing::info!("Signed in, opening {}", Route::Audit);
            browser.load().await;
            Reply::text(view(state))
        }
        Command::Token(input) => match login::parse_callback(&input)? {
            login::Callback::Token(token) => {
                state.session.set_token(&token)?;
                tracing::info!("Token stored, opening {}", Route::Audit);
                browser.load().await;
                Reply::text(view(state))
            }
            login::Callback::Error(message) => Reply::text(message),
        },
        Command::Join(code) => {
            let url = login::join_url(&state.config.api_url, &code)?;
            tracing::debug!("Joining via {}", Route::Join(code).path());
            Reply::text(format!("Open {url} in a browser to join the organization"))
        }
        Command::Logout => {
            let route = browser.logout()?;
            Reply::text(format!("Signed out, go to {route}"))
        }
    };

    if let Some(route) = browser.pending_redirect() {
        return Ok(Reply::text(format!(
            "{}\nSession expired, go to {route} ('login')",
            reply.text
        )));
    }
    Ok(reply)
}

fn feed_label(feed: FeedName) -> &'static str {
    match feed {
        FeedName::Users => "user events",
        FeedName::Assets => "asset events",
    }
}

/// Render whatever the dashboard should currently show.
pub fn view(state: &SharedState) -> String {
    let browser = &state.browser;
    let mode = state.theme.applied();

    match browser.load_state() {
        LoadState::Idle | LoadState::Loading => "Loading audit data...".to_string(),
        LoadState::Failed(message) => render::failure(&message, &browser.go_to_login(), mode),
        LoadState::Redirect(Route::Login) => {
            "Not signed in. Use 'login google', 'login <email> <password>' or 'token <value>'."
                .to_string()
        }
        LoadState::Redirect(route) => {
            format!("The audit log is only available to administrators and auditors, go to {route}")
        }
        LoadState::Ready => {
            let who = browser
                .current_user()
                .map(|u| format!("{} ({})", u.email, u.role.as_str()))
                .unwrap_or_default();
            let body = match browser.tab() {
                Tab::Summary => browser
                    .summary()
                    .map(|s| render::summary(&s, mode))
                    .unwrap_or_default(),
                Tab::Users => render::user_events(&browser.user_events().snapshot(), mode),
                Tab::Assets => render::asset_events(&browser.asset_events().snapshot(), mode),
            };
            format!("Audit Dashboard - {who} [{}]\n{body}", browser.tab().as_str())
        }
    }
}

fn feed_view(state: &SharedState, feed: FeedName) -> String {
    let mode = state.theme.applied();
    match feed {
        FeedName::Users => render::user_events(&state.browser.user_events().snapshot(), mode),
        FeedName::Assets => render::asset_events(&state.browser.asset_events().snapshot(), mode),
    }
}
