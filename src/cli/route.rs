use crate::analyser::lookup::{Channel, ChannelKind, Context, Directory, User};

use super::CheckArgs;

/// Use the tokens given on the command line, or read whitespace-separated
/// tokens from `stdin` when there are none.
pub fn read_tokens(
    tokens: &[String],
    mut stdin: impl std::io::Read,
) -> Result<Vec<String>, anyhow::Error> {
    if !tokens.is_empty() {
        return Ok(tokens.to_vec());
    }

    let mut input = String::new();
    stdin.read_to_string(&mut input)?;
    Ok(input.split_whitespace().map(String::from).collect())
}

/// Build the conversation context for `argsig check`.
///
/// The author and channel are taken from `directory` when they are listed
/// there (by username, or by channel id or name); otherwise placeholders are
/// synthesised so the CLI works without any directory.
pub fn build_context(args: &CheckArgs, directory: &Directory) -> Context {
    let author = directory
        .users
        .iter()
        .find(|u| u.username == args.author)
        .or_else(|| {
            directory
                .members
                .iter()
                .map(|m| &m.user)
                .find(|u| u.username == args.author)
        })
        .cloned()
        .unwrap_or_else(|| User {
            id: "0".into(),
            username: args.author.clone(),
        });

    let channel = if args.direct {
        Channel {
            id: format!("dm-{}", author.id),
            name: author.username.clone(),
            kind: ChannelKind::Dm,
            viewable: true,
        }
    } else {
        let wanted = args.channel.as_deref().unwrap_or("cli");
        directory
            .channels
            .iter()
            .find(|c| c.id == wanted || c.name == wanted)
            .cloned()
            .unwrap_or_else(|| Channel {
                id: "0".into(),
                name: wanted.to_string(),
                kind: ChannelKind::Text,
                viewable: true,
            })
    };

    Context::new(author, channel)
}
