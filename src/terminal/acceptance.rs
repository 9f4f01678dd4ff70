use std::fmt;

/// The outcome of asking whether a connection may be made.
///
/// Rejections are ordinary values carrying a human-readable reason the
/// presentation layer can show as a tooltip; nothing is mutated either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAcceptable {
    pub can_accept: bool,
    pub reason: Option<String>,
}

impl ConnectionAcceptable {
    pub fn accept() -> Self {
        Self {
            can_accept: true,
            reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            can_accept: false,
            reason: Some(reason.into()),
        }
    }

    /// Runs `next` only when this check passed.
    pub(crate) fn and_then(self, next: impl FnOnce() -> ConnectionAcceptable) -> Self {
        if self.can_accept { next() } else { self }
    }
}

impl fmt::Display for ConnectionAcceptable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.can_accept, &self.reason) {
            (true, _) => f.write_str("accepted"),
            (false, Some(reason)) => write!(f, "rejected: {}", reason),
            (false, None) => f.write_str("rejected"),
        }
    }
}
