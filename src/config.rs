pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Well-known name of the notification service
pub const NOTIFICATIONS_NAME: &str = "org.freedesktop.Notifications";
pub const NOTIFICATIONS_PATH: &str = "/org/freedesktop/Notifications";

/// Object serving the daemon control interface
pub const ADMIN_PATH: &str = "/org/corner/Notifyd";
