// Session module
// Explicit auth context handed to the scheduling core at construction.
// The core never reads ambient/global state to discover the current user.

/// The signed-in user as the scheduling core sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    /// A session for an authenticated user.
    pub fn authenticated(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            display_name: Some(display_name.into()),
        }
    }

    /// A session with nobody signed in. Mutations fail fast under it.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// The owner id used to scope read subscriptions.
    pub fn owner_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_session() {
        let session = Session::authenticated("user-1", "Dr. Enescu");
        assert!(session.is_authenticated());
        assert_eq!(session.owner_id(), Some("user-1"));
    }

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.owner_id().is_none());
    }
}
