/// Remembers the last token a view acted on.
///
/// Views call [`TokenWatch::observe`] on every render; it answers `true` only
/// when the token differs from the previous observation and is non-empty.
#[derive(Debug, Default, Clone)]
pub struct TokenWatch {
    last_seen: Option<String>,
}

impl TokenWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, token: &str) -> bool {
        if self.last_seen.as_deref() == Some(token) {
            return false;
        }
        self.last_seen = Some(token.to_string());
        !token.is_empty()
    }

    /// Forget the last observation so the next non-empty token fires again.
    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}
