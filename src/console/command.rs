use crate::browser::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedName {
    Users,
    Assets,
}

impl FeedName {
    fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "users" | "user" => Ok(FeedName::Users),
            "assets" | "asset" => Ok(FeedName::Assets),
            other => Err(format!("Unknown feed '{other}', expected 'users' or 'assets'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Refresh,
    Show,
    Tab(Tab),
    Search(FeedName, String),
    /// Raw type name; parsed against the feed's event types when run.
    Type(FeedName, Option<String>),
    Clear(FeedName),
    More(FeedName),
    Export(FeedName),
    Theme,
    LoginGoogle,
    LoginPassword { email: String, password: String },
    Token(String),
    Join(String),
    Logout,
    Quit,
}

pub const HELP: &str = "\
Commands:
  show                          redraw the current tab
  refresh                       reload summary and both feeds
  tab <summary|users|assets>    switch tab
  search <users|assets> [text]  filter by free text (applied after a pause)
  type <users|assets> [TYPE]    filter by event type, omit TYPE to clear it
  clear <users|assets>          clear search and type filters
  more <users|assets>           load the next page
  export <users|assets>         write the loaded rows to CSV
  theme                         toggle light/dark
  login google                  print the Google sign-in URL
  login <email> <password>      sign in with a password
  token <value|callback query>  store the sign-in token, or show its error
  join <code>                   print the organization join URL
  logout                        forget the session
  quit                          exit";

impl Command {
    /// Commands that read or fetch audit data. They only run once the
    /// dashboard has loaded for an authorized user.
    pub fn needs_dashboard(&self) -> bool {
        matches!(
            self,
            Command::Search(..)
                | Command::Type(..)
                | Command::Clear(_)
                | Command::More(_)
                | Command::Export(_)
        )
    }

    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "refresh" => Command::Refresh,
            "show" | "ls" => Command::Show,
            "tab" => Command::Tab(Tab::from_param(rest)),
            "search" => {
                let (feed, text) = split_feed(rest)?;
                Command::Search(feed, text.to_string())
            }
            "type" => {
                let (feed, value) = split_feed(rest)?;
                let value = Some(value.to_string()).filter(|v| !v.is_empty());
                Command::Type(feed, value)
            }
            "clear" => Command::Clear(FeedName::parse(rest)?),
            "more" => Command::More(FeedName::parse(rest)?),
            "export" => Command::Export(FeedName::parse(rest)?),
            "theme" => Command::Theme,
            "login" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [] | ["google"] => Command::LoginGoogle,
                [email, password] => Command::LoginPassword {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => return Err("Usage: login google | login <email> <password>".to_string()),
            },
            "token" if !rest.is_empty() => Command::Token(rest.to_string()),
            "token" => return Err("Usage: token <value>".to_string()),
            "join" if !rest.is_empty() => Command::Join(rest.to_string()),
            "join" => return Err("Usage: join <code>".to_string()),
            "logout" => Command::Logout,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command '{other}', try 'help'")),
        };
        Ok(Some(cmd))
    }
}

/// Split `<feed> [remainder]`, keeping the remainder verbatim (search text
/// may contain spaces).
fn split_feed(rest: &str) -> Result<(FeedName, &str), String> {
    let (feed, remainder) = match rest.split_once(char::is_whitespace) {
        Some((feed, remainder)) => (feed, remainder.trim_start()),
        None => (rest, ""),
    };
    Ok((FeedName::parse(feed)?, remainder))
}
