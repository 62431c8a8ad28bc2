//! REPL command parsing.

use std::path::PathBuf;
use updater_core::project::DraftField;

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Credential is prompted for (hidden) when omitted
    Login(Option<String>),
    Logout,
    Verify,
    Set(DraftField, String),
    Services(String),
    ClearServices,
    Detail(usize, String),
    Images(Vec<PathBuf>),
    RemoveImage(usize),
    ClearImages,
    Show,
    Submit,
    Help,
    Quit,
}

/// Command words offered for completion.
pub const COMMAND_WORDS: &[&str] = &[
    "login",
    "logout",
    "verify",
    "set",
    "services",
    "clear-services",
    "detail",
    "image",
    "remove-image",
    "clear-images",
    "show",
    "submit",
    "help",
    "quit",
];

pub const HELP: &str = "\
Login screen:
  login [credential]        Log in (prompts for the credential when omitted)
  quit                      Exit

Project form:
  set <field> <value>       Edit heading | projectTitle | year | location
  services <a, b, c>        Commit the services list
  detail <n> <text>         Describe service number n (1-based)
  clear-services            Drop all services and details
  image <path>...           Stage image files
  remove-image <n>          Unstage image number n (1-based)
  clear-images              Unstage all images
  show                      Print the draft
  submit                    Verify session, confirm, upload
  verify                    Check the session with the server
  logout                    End the session";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(word, rest)| (word, rest.trim()))
        .unwrap_or((line, ""));

    match word {
        "login" => Ok(Command::Login((!rest.is_empty()).then(|| rest.to_string()))),
        "logout" => Ok(Command::Logout),
        "verify" => Ok(Command::Verify),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err("Usage: set <field> <value>".to_string());
            }
            Ok(Command::Set(field.parse()?, value.to_string()))
        }
        "services" => Ok(Command::Services(rest.to_string())),
        "clear-services" => Ok(Command::ClearServices),
        "detail" => {
            let (index, text) = rest
                .split_once(char::is_whitespace)
                .map(|(index, text)| (index, text.trim()))
                .unwrap_or((rest, ""));
            Ok(Command::Detail(parse_position(index)?, text.to_string()))
        }
        "image" | "images" => {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err("Usage: image <path>...".to_string());
            }
            Ok(Command::Images(paths))
        }
        "remove-image" => Ok(Command::RemoveImage(parse_position(rest)?)),
        "clear-images" => Ok(Command::ClearImages),
        "show" => Ok(Command::Show),
        "submit" => Ok(Command::Submit),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {other} (type 'help')")),
    }
}

/// Parses a 1-based position as shown to the operator into a 0-based index.
fn parse_position(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("Expected a position starting at 1, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_with_and_without_credential() {
        assert_eq!(parse("login"), Ok(Command::Login(None)));
        assert_eq!(
            parse("login  s3cret "),
            Ok(Command::Login(Some("s3cret".to_string())))
        );
    }

    #[test]
    fn test_set_keeps_value_spaces() {
        assert_eq!(
            parse("set projectTitle Tank Farm  Inspection"),
            Ok(Command::Set(
                DraftField::ProjectTitle,
                "Tank Farm  Inspection".to_string()
            ))
        );
        assert_eq!(
            parse("set year"),
            Ok(Command::Set(DraftField::Year, String::new()))
        );
    }

    #[test]
    fn test_set_rejects_unknown_field() {
        assert!(parse("set colour blue").is_err());
        assert!(parse("set").is_err());
    }

    #[test]
    fn test_detail_is_one_based() {
        assert_eq!(
            parse("detail 2 Annual survey"),
            Ok(Command::Detail(1, "Annual survey".to_string()))
        );
        assert!(parse("detail 0 nope").is_err());
        assert!(parse("detail x nope").is_err());
    }

    #[test]
    fn test_images_collects_paths() {
        assert_eq!(
            parse("image a.png shots/b.jpg"),
            Ok(Command::Images(vec![
                PathBuf::from("a.png"),
                PathBuf::from("shots/b.jpg")
            ]))
        );
        assert!(parse("image").is_err());
    }

    #[test]
    fn test_services_passes_raw_text() {
        assert_eq!(
            parse("services Audit, Inspection ,"),
            Ok(Command::Services("Audit, Inspection ,".to_string()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse("frobnicate").unwrap_err().contains("Unknown command"));
    }
}
