//! Parsing of stdin lines into intents.

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Join(String),
    Login { username: String, room: String },
    Logout,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        if line.trim().is_empty() {
            return Command::Empty;
        }
        return Command::Say(line.to_string());
    };

    let words: Vec<&str> = rest.split_whitespace().collect();
    match words.as_slice() {
        ["join", room] => Command::Join(room.to_string()),
        ["join", ..] => Command::Invalid("usage: /join <room>".into()),
        ["login", username, room] => Command::Login {
            username: username.to_string(),
            room: room.to_string(),
        },
        ["login", ..] => Command::Invalid("usage: /login <user> <room>".into()),
        ["logout", ..] => Command::Logout,
        ["quit" | "exit", ..] => Command::Quit,
        [other, ..] => Command::Invalid(format!("unknown command /{other}")),
        [] => Command::Invalid("empty command".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_chat() {
        assert_eq!(parse("hello there "), Command::Say("hello there ".into()));
        assert_eq!(parse("   "), Command::Empty);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse("/join random"), Command::Join("random".into()));
        assert_eq!(
            parse(" /login bob lobby"),
            Command::Login {
                username: "bob".into(),
                room: "lobby".into()
            }
        );
        assert_eq!(parse("/logout"), Command::Logout);
        assert_eq!(parse("/exit"), Command::Quit);
    }

    #[test]
    fn malformed_commands_explain_themselves() {
        assert!(matches!(parse("/join"), Command::Invalid(_)));
        assert!(matches!(parse("/login bob"), Command::Invalid(_)));
        assert!(matches!(parse("/login a b c"), Command::Invalid(_)));
        assert_eq!(parse("/dance"), Command::Invalid("unknown command /dance".into()));
        assert!(matches!(parse("/"), Command::Invalid(_)));
    }
}
