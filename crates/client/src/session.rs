//! Read-only session context injected into the HTTP collaborator.
//!
//! Screens never read credentials from a global store; whoever builds the
//! collaborator hands it a [`SessionContext`]. The form controllers never
//! see it.

/// Credentials attached to every outgoing request.
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    access_token: String,
}

impl SessionContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

// The token never ends up in logs.
impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let session = SessionContext::new("secret-token");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
        assert_eq!(session.access_token(), "secret-token");
    }
}
