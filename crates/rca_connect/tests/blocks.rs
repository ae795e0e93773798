use pretty_assertions::assert_eq;

use rca_connect::chat::{Block, Reply};

#[test]
fn blocks_serialize_to_platform_json() {
    let blocks = vec![
        Block::header("Incident summary"),
        Block::divider(),
        Block::section("*Severity:* P1"),
    ];
    let json = serde_json::to_value(&blocks).expect("serialize");

    assert_eq!(
        json,
        serde_json::json!([
            {"type": "header", "text": {"type": "plain_text", "text": "Incident summary"}},
            {"type": "divider"},
            {"type": "section", "text": {"type": "mrkdwn", "text": "*Severity:* P1"}}
        ])
    );
}

#[test]
fn text_content_flattens_blocks_in_order() {
    let reply = Reply::Blocks(vec![
        Block::header("Head"),
        Block::divider(),
        Block::section("Body"),
    ]);
    assert_eq!(reply.text_content(), "Head\nBody");

    let reply = Reply::Text("plain".to_string());
    assert_eq!(reply.text_content(), "plain");
}
