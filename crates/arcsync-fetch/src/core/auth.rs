use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// `Basic` authorization header value for `username:password`.
pub fn basic_authorization(username: &str, password: &str) -> String {
    let token = STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {token}")
}
