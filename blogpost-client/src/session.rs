//! In-memory session state.

use blogpost_types::UserProfile;

/// Display name stamped on provisional comments when no profile is loaded.
pub const FALLBACK_DISPLAY_NAME: &str = "You";

/// The client's view of who is logged in.
///
/// The token decides authentication; the profile is a lazy enrichment
/// fetched from `/me` and can be absent even while a token is held (not
/// fetched yet, or the fetch failed).
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    user: Option<UserProfile>,
}

impl Session {
    /// Create an unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a persisted token.
    ///
    /// The profile starts empty; holding a token is only tentative
    /// authentication until a `/me` fetch confirms it.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    /// The session token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Whether a non-empty token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The loaded profile, if the `/me` fetch has succeeded.
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The logged-in user's id, when the profile is loaded.
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// The name to stamp on local artifacts: the profile's name, or
    /// [`FALLBACK_DISPLAY_NAME`] when no profile is loaded.
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or(FALLBACK_DISPLAY_NAME)
    }

    /// Adopt a token (after login or register).
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Replace the loaded profile.
    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    /// Drop the token and profile.
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}
