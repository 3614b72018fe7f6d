//! Line-oriented command language for driving a mounted mixer.

use std::fmt;

use oscmix_types::{ChannelKey, Message};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Publish { topic: String, message: Message },
    Send(Message),
    Click(ChannelKey),
    Mute(ChannelKey),
    Unmute(ChannelKey),
    Volume { key: ChannelKey, volume: f32 },
    Advance(f64),
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    UnknownCommand(String),
    MissingArgument { command: &'static str, argument: &'static str },
    BadNumber { command: &'static str, value: String },
    BadMessage(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::UnknownCommand(c) => write!(f, "unknown command: {}", c),
            ScriptError::MissingArgument { command, argument } => {
                write!(f, "{}: missing <{}>", command, argument)
            }
            ScriptError::BadNumber { command, value } => {
                write!(f, "{}: not a number: {}", command, value)
            }
            ScriptError::BadMessage(e) => write!(f, "bad message: {}", e),
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse one script line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let command = match word {
        "publish" => {
            let (topic, rest) = split_word(rest);
            if topic.is_empty() {
                return Err(ScriptError::MissingArgument { command: "publish", argument: "topic" });
            }
            Command::Publish {
                topic: topic.to_string(),
                message: parse_message("publish", rest)?,
            }
        }
        "send" => Command::Send(parse_message("send", rest)?),
        "click" => Command::Click(key_arg("click", rest)?),
        "mute" => Command::Mute(key_arg("mute", rest)?),
        "unmute" => Command::Unmute(key_arg("unmute", rest)?),
        "volume" => {
            let (key, value) = split_word(rest);
            if key.is_empty() {
                return Err(ScriptError::MissingArgument { command: "volume", argument: "key" });
            }
            Command::Volume {
                key: ChannelKey::from(key),
                volume: number_arg("volume", "value", value)?,
            }
        }
        "advance" => Command::Advance(number_arg("advance", "seconds", rest)?),
        "status" => Command::Status,
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn key_arg(command: &'static str, rest: &str) -> Result<ChannelKey, ScriptError> {
    let (key, _) = split_word(rest);
    if key.is_empty() {
        return Err(ScriptError::MissingArgument { command, argument: "key" });
    }
    Ok(ChannelKey::from(key))
}

fn number_arg<T: std::str::FromStr>(
    command: &'static str,
    argument: &'static str,
    rest: &str,
) -> Result<T, ScriptError> {
    let value = rest.trim();
    if value.is_empty() {
        return Err(ScriptError::MissingArgument { command, argument });
    }
    value.parse().map_err(|_| ScriptError::BadNumber {
        command,
        value: value.to_string(),
    })
}

/// A JSON envelope (`{"kind": ..., "payload": ...}`), or a bare kind.
fn parse_message(command: &'static str, rest: &str) -> Result<Message, ScriptError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ScriptError::MissingArgument { command, argument: "message" });
    }
    if rest.starts_with('{') {
        serde_json::from_str(rest).map_err(|e| ScriptError::BadMessage(e.to_string()))
    } else {
        Ok(Message::new(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# start the mixer"), Ok(None));
    }

    #[test]
    fn send_accepts_json_or_bare_kind() {
        assert_eq!(
            parse_line("send INIT"),
            Ok(Some(Command::Send(Message::new("INIT"))))
        );
        assert_eq!(
            parse_line(r#"send {"kind":"UPDATE_FREQUENCIES","payload":{"sine":330}}"#),
            Ok(Some(Command::Send(Message::with_payload(
                "UPDATE_FREQUENCIES",
                json!({ "sine": 330 })
            ))))
        );
    }

    #[test]
    fn publish_takes_topic_then_message() {
        assert_eq!(
            parse_line("publish selection DEACTIVATE:sine"),
            Ok(Some(Command::Publish {
                topic: "selection".into(),
                message: Message::new("DEACTIVATE:sine"),
            }))
        );
        assert_eq!(
            parse_line("publish"),
            Err(ScriptError::MissingArgument { command: "publish", argument: "topic" })
        );
    }

    #[test]
    fn channel_commands() {
        assert_eq!(
            parse_line("click triangle"),
            Ok(Some(Command::Click(ChannelKey::from("triangle"))))
        );
        assert_eq!(
            parse_line("volume square 0.5"),
            Ok(Some(Command::Volume {
                key: ChannelKey::from("square"),
                volume: 0.5,
            }))
        );
        assert_eq!(
            parse_line("volume square loud"),
            Err(ScriptError::BadNumber { command: "volume", value: "loud".into() })
        );
        assert_eq!(
            parse_line("mute"),
            Err(ScriptError::MissingArgument { command: "mute", argument: "key" })
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            parse_line("send {not json"),
            Err(ScriptError::BadMessage(_))
        ));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_line("explode now"),
            Err(ScriptError::UnknownCommand("explode".into()))
        );
    }
}
