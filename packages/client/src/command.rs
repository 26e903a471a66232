//! Prompt command parsing.
//!
//! ```text
//! /dm <user_id> <text>     direct message
//! /ch <channel_id> <text>  channel message
//! /quit                    leave
//! ```

use kairo_server::infrastructure::dto::websocket::ClientFrame;

use crate::error::CommandError;

const DM_USAGE: &str = "/dm <user_id> <text>";
const CH_USAGE: &str = "/ch <channel_id> <text>";

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(ClientFrame),
    Quit,
}

/// Parse one line typed at the prompt
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    };

    match name {
        "/quit" | "/exit" => Ok(Command::Quit),
        "/dm" => {
            let (receiver_id, content) = split_target(rest, DM_USAGE)?;
            Ok(Command::Send(ClientFrame::Direct {
                receiver_id,
                content,
            }))
        }
        "/ch" => {
            let (channel_id, content) = split_target(rest, CH_USAGE)?;
            Ok(Command::Send(ClientFrame::Channel {
                channel_id,
                content,
            }))
        }
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn split_target(rest: &str, usage: &'static str) -> Result<(u64, String), CommandError> {
    let (id, content) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandError::Usage(usage))?;
    let content = content.trim();
    if content.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    let id = id
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CommandError::InvalidId(id.to_string()))?;
    Ok((id, content.to_string()))
}
