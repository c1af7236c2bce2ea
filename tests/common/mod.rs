use std::sync::{Arc, Mutex};

use argsig::analyser::lookup::{Channel, ChannelKind, Context, User};
use argsig::analyser::MessageSink;
use async_trait::async_trait;

/// Sink that keeps every delivered message for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, _context: &Context, text: &str) {
        self.sent.lock().unwrap().push(text.to_string());
    }
}

pub fn guild_context() -> Context {
    Context::new(
        User {
            id: "1".into(),
            username: "alice".into(),
        },
        Channel {
            id: "10".into(),
            name: "general".into(),
            kind: ChannelKind::Text,
            viewable: true,
        },
    )
}

pub fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
