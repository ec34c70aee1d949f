// Timing and layout constants for the notification daemon

use std::time::Duration;

// ============================================================================
// Fade-out Constants
// ============================================================================

/// Total duration of the fade-out
pub(crate) const FADE_TIME: Duration = Duration::from_millis(800);

/// Interval between fade ticks
pub(crate) const FADE_TICK: Duration = Duration::from_millis(50);

/// Interval between fade ticks while sliding out
pub(crate) const SLIDE_TICK: Duration = Duration::from_millis(25);

/// Number of opacity steps in a fade
pub(crate) const FADE_STEPS: u32 = (FADE_TIME.as_millis() / FADE_TICK.as_millis()) as u32;

/// Horizontal distance moved per slide tick (pixels)
pub(crate) const SLIDE_STEP: i32 = 10;

/// Opacity at or below which a fading notification is closed
pub(crate) const OPACITY_EPSILON: f64 = 0.0001;

/// Opacity while the pointer is over a notification
pub(crate) const HOVER_OPACITY: f64 = 1.0;

// ============================================================================
// Layout Constants
// ============================================================================

/// Gap between stacked notifications and the workarea edges (pixels)
pub(crate) const NOTIFICATION_SPACING: i32 = 0;

// ============================================================================
// D-Bus Constants
// ============================================================================

/// Attempts to acquire the bus name before giving up
pub(crate) const DBUS_CONNECT_ATTEMPTS: u32 = 5;

/// Delay between bus connection attempts
pub(crate) const DBUS_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Capacity of the daemon input channel
pub(crate) const INPUT_CHANNEL_CAPACITY: usize = 100;

// ============================================================================
// Headless Constants
// ============================================================================

/// Screen size assumed when no display server binding is available
pub(crate) const HEADLESS_SCREEN: (i32, i32) = (1920, 1080);
