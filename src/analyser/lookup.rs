//! Entities resolved by lookup collaborators, and the traits through which
//! the validator reaches them.
//!
//! The validator never knows where users, channels or roles come from: the
//! caller injects a [`Lookup`] (consulted only when search mode is enabled)
//! and a [`MessageSink`] that delivers rendered failure messages back to the
//! conversation the arguments came from.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// A user as seen from inside a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl From<User> for Member {
    fn from(user: User) -> Self {
        Member {
            user,
            nickname: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Text,
    Dm,
    Voice,
    Category,
    News,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    #[serde(default = "default_viewable")]
    pub viewable: bool,
}

fn default_viewable() -> bool {
    true
}

impl Channel {
    /// Whether arguments may refer to this channel when visibility is enforced:
    /// viewable text channels and direct-message channels only.
    pub fn is_usable_target(&self) -> bool {
        match self.kind {
            ChannelKind::Text => self.viewable,
            ChannelKind::Dm => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// Where the arguments being validated came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub author: User,
    pub channel: Channel,
}

impl Context {
    pub fn new(author: User, channel: Channel) -> Self {
        Self { author, channel }
    }

    /// Direct-message contexts resolve `User` arguments through
    /// [`Lookup::resolve_user`] instead of [`Lookup::resolve_member`].
    pub fn is_direct(&self) -> bool {
        self.channel.kind == ChannelKind::Dm
    }
}

/// Entity resolution used by the `Channel`, `Role` and `User` argument types.
///
/// Every method returns `None` when nothing matches; "not found" is never an
/// error. `self_allowed` asks the implementation to fall back to the caller's
/// own entity when the token does not resolve.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn resolve_user(&self, context: &Context, token: &str, self_allowed: bool)
    -> Option<User>;

    async fn resolve_member(
        &self,
        context: &Context,
        token: &str,
        self_allowed: bool,
    ) -> Option<Member> {
        self.resolve_user(context, token, self_allowed)
            .await
            .map(Member::from)
    }

    async fn resolve_channel(
        &self,
        context: &Context,
        token: &str,
        self_allowed: bool,
    ) -> Option<Channel>;

    async fn resolve_role(&self, context: &Context, token: &str) -> Option<Role>;
}

pub type SharedLookup = Arc<dyn Lookup>;

/// Delivers rendered failure messages to the originating conversation.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, context: &Context, text: &str);
}

pub type SharedSink = Arc<dyn MessageSink>;

/// Sink that drops every message. Failures are still recorded on the validator.
pub struct NullSink;

#[async_trait]
impl MessageSink for NullSink {
    async fn send(&self, _context: &Context, _text: &str) {}
}

/// Lookup that never finds anything.
pub struct NoLookup;

#[async_trait]
impl Lookup for NoLookup {
    async fn resolve_user(&self, _: &Context, _: &str, _: bool) -> Option<User> {
        None
    }

    async fn resolve_channel(&self, _: &Context, _: &str, _: bool) -> Option<Channel> {
        None
    }

    async fn resolve_role(&self, _: &Context, _: &str) -> Option<Role> {
        None
    }
}

/// Fixed set of known entities.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Directory {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Directory {
    /// Combine two directories; entries of `other` come first so they win
    /// lookups that match both.
    pub fn merge(self, other: Directory) -> Directory {
        fn chain<T>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
            first.into_iter().chain(second).collect()
        }
        Directory {
            users: chain(other.users, self.users),
            members: chain(other.members, self.members),
            channels: chain(other.channels, self.channels),
            roles: chain(other.roles, self.roles),
        }
    }
}

/// [`Lookup`] over an in-memory [`Directory`].
///
/// Tokens match by id, by mention (`<@id>`, `<@!id>`, `<#id>`, `<@&id>`) or by
/// case-insensitive name. Member lookups also match nicknames; when the
/// directory lists no members at all, its users are treated as members.
pub struct StaticLookup {
    directory: Directory,
}

impl StaticLookup {
    pub fn new(directory: Directory) -> Self {
        Self { directory }
    }

    fn find_user(&self, token: &str) -> Option<&User> {
        let id = strip_mention(token, &["<@!", "<@"]);
        self.directory
            .users
            .iter()
            .find(|u| u.id == id || u.username.eq_ignore_ascii_case(token))
    }

    fn find_member(&self, token: &str) -> Option<Member> {
        if self.directory.members.is_empty() {
            return self.find_user(token).cloned().map(Member::from);
        }
        let id = strip_mention(token, &["<@!", "<@"]);
        self.directory
            .members
            .iter()
            .find(|m| {
                m.user.id == id
                    || m.user.username.eq_ignore_ascii_case(token)
                    || m.nickname
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(token))
            })
            .cloned()
    }
}

#[async_trait]
impl Lookup for StaticLookup {
    async fn resolve_user(
        &self,
        context: &Context,
        token: &str,
        self_allowed: bool,
    ) -> Option<User> {
        match self.find_user(token) {
            Some(user) => Some(user.clone()),
            None if self_allowed => Some(context.author.clone()),
            None => None,
        }
    }

    async fn resolve_member(
        &self,
        context: &Context,
        token: &str,
        self_allowed: bool,
    ) -> Option<Member> {
        match self.find_member(token) {
            Some(member) => Some(member),
            None if self_allowed => Some(
                self.find_member(&context.author.id)
                    .unwrap_or_else(|| Member::from(context.author.clone())),
            ),
            None => None,
        }
    }

    async fn resolve_channel(
        &self,
        context: &Context,
        token: &str,
        self_allowed: bool,
    ) -> Option<Channel> {
        let id = strip_mention(token, &["<#"]);
        let name = token.strip_prefix('#').unwrap_or(token);
        match self
            .directory
            .channels
            .iter()
            .find(|c| c.id == id || c.name.eq_ignore_ascii_case(name))
        {
            Some(channel) => Some(channel.clone()),
            None if self_allowed => Some(context.channel.clone()),
            None => None,
        }
    }

    async fn resolve_role(&self, _context: &Context, token: &str) -> Option<Role> {
        let id = strip_mention(token, &["<@&"]);
        self.directory
            .roles
            .iter()
            .find(|r| r.id == id || r.name.eq_ignore_ascii_case(token))
            .cloned()
    }
}

/// Extract the id from a mention such as `<@123>`; other tokens are returned as-is.
fn strip_mention<'a>(token: &'a str, prefixes: &[&str]) -> &'a str {
    let Some(inner) = token.strip_suffix('>') else {
        return token;
    };
    prefixes
        .iter()
        .find_map(|p| inner.strip_prefix(p))
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(token)
}
