use super::ChatMessage;

/// Messages for the plain assistant reply to a channel message.
pub fn assistant_reply_messages(user_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful assistant."),
        ChatMessage::user(user_text),
    ]
}

/// Messages for the /summarize command over fetched conversation text.
pub fn summary_messages(conversation: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are an incident response assistant. Summarize the conversation below \
             for an engineering audience: what happened, current status, and next steps. \
             Be concise and do not invent facts that are not in the conversation.",
        ),
        ChatMessage::user(conversation),
    ]
}
