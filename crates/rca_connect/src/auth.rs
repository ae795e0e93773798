use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// HTTP Basic `Authorization` header value for Atlassian-style
/// email + API-token credentials.
pub(crate) fn basic_auth_header(email: &str, api_token: &str) -> String {
    let credentials = format!("{email}:{api_token}");
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::basic_auth_header;

    #[test]
    fn encodes_email_and_token() {
        // "a:b" -> "YTpi"
        assert_eq!(basic_auth_header("a", "b"), "Basic YTpi");
    }
}
