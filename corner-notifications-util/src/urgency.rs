/// Urgency byte of the `urgency` hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum NotificationUrgency {
    Low = 0,
    #[default]
    Normal = 1,
    /// Critical notifications never expire on their own
    Critical = 2,
}

impl From<u8> for NotificationUrgency {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Low,
            2 => Self::Critical,
            _ => Self::Normal,
        }
    }
}

impl NotificationUrgency {
    /// Resolve a requested expiration in milliseconds.
    ///
    /// Critical urgency forces 0 (never). -1 and other negative values take
    /// `default_ms`, where a negative default also means never.
    pub fn effective_timeout(self, requested_ms: i32, default_ms: i32) -> u32 {
        if self == Self::Critical {
            return 0;
        }

        let timeout = if requested_ms < 0 { default_ms } else { requested_ms };
        u32::try_from(timeout).unwrap_or(0)
    }
}
