use serde::Serialize;

/// Text object inside a block: `plain_text` for headers, `mrkdwn` for
/// sections.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BlockText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Outbound chat layout blocks. Serializes to the chat platform's block
/// JSON (`{"type": "header", ...}` and so on).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Header { text: BlockText },
    Section { text: BlockText },
    Divider,
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: BlockText {
                kind: "plain_text".to_string(),
                text: text.into(),
            },
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: BlockText {
                kind: "mrkdwn".to_string(),
                text: text.into(),
            },
        }
    }

    pub fn divider() -> Self {
        Block::Divider
    }
}

/// What a command handler hands back to the chat runtime to relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Blocks(Vec<Block>),
}

impl Reply {
    /// Flattened text view, for runtimes (and tests) that only need the
    /// message content.
    pub fn text_content(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| match b {
                    Block::Header { text } | Block::Section { text } => Some(text.text.as_str()),
                    Block::Divider => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
