//! Authentication credential handling.

use secrecy::{ExposeSecret, SecretString};

/// An opaque API credential.
///
/// The wrapped token is stored in a [`SecretString`] so it is zeroized on
/// drop and redacted from `Debug` output. When a credential is attached to
/// a session, every request carries `Authorization: token <value>`; when
/// no credential is supplied, requests are sent unauthenticated and the
/// header is omitted entirely.
///
/// # Example
///
/// ```
/// use octopage::AuthCredential;
///
/// let credential = AuthCredential::new("ghp_example");
/// ```
#[derive(Clone)]
pub struct AuthCredential {
    token: SecretString,
}

impl AuthCredential {
    /// Create a credential from a raw token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Render the `Authorization` header value: fixed `token` prefix,
    /// single space, raw credential.
    pub(crate) fn header_value(&self) -> String {
        format!("token {}", self.token.expose_secret())
    }
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCredential").finish_non_exhaustive()
    }
}

impl From<String> for AuthCredential {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for AuthCredential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_format() {
        let credential = AuthCredential::new("s3cret");
        assert_eq!(credential.header_value(), "token s3cret");
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = AuthCredential::new("s3cret");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("s3cret"));
    }
}
