use std::fmt;

const BADGE_CAP: u64 = 99;

/// Notification badge text for an unread total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnreadBadge(u64);

impl UnreadBadge {
    pub fn new(count: u64) -> Self {
        Self(count)
    }

    pub fn count(&self) -> u64 {
        self.0
    }

    pub fn is_visible(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for UnreadBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => Ok(()),
            n if n > BADGE_CAP => write!(f, "{}+", BADGE_CAP),
            n => write!(f, "{}", n),
        }
    }
}
