//! `Authorization` header parsing

/// Extract the credential from a `Bearer <token>` header value
///
/// The scheme is matched case-insensitively. Returns `None` for other
/// schemes, a missing or empty credential, or a credential containing
/// whitespace. The token is not verified.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let (scheme, credential) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let credential = credential.trim();
    if credential.is_empty() || credential.contains(char::is_whitespace) {
        return None;
    }
    Some(credential)
}
