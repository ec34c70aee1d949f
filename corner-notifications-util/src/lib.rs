pub mod action;
pub mod geometry;
pub mod image;
pub mod markup;
pub mod notification_image;
pub mod urgency;

pub use action::{NotificationAction, parse_actions};
pub use geometry::{Rect, StrutPartial};
pub use image::{ImageData, ImageDataError};
pub use markup::{BodyText, body_text, escape_text, is_valid_markup, sanitize_markup, strip_markup};
pub use notification_image::{ICON_SIZE, NotificationImage, ProcessedImage};
pub use urgency::NotificationUrgency;

use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, path::PathBuf, str::FromStr, sync::Arc};

#[cfg(feature = "zbus_notifications")]
use std::collections::HashMap;

/// A parsed `Notify` request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    /// Id of the notification to replace, 0 for a new one.
    pub replaces_id: u32,
    pub app_name: String,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<NotificationAction>,
    pub hints: Vec<Hint>,
    /// Milliseconds; -1 asks for the daemon default, 0 never expires.
    pub expire_timeout: i32,
}

impl Notification {
    #[allow(clippy::too_many_arguments)]
    #[cfg(feature = "zbus_notifications")]
    pub fn new(
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> Self {
        let hints = hints
            .into_iter()
            .filter_map(|(k, v)| match k {
                "desktop-entry" | "desktop_entry" => String::try_from(v).map(Hint::DesktopEntry).ok(),
                "urgency" => u8::try_from(v).map(Hint::Urgency).ok(),
                "value" => i32::try_from(v).map(Hint::Value).ok(),
                // presence flags, an explicit `false` turns them off
                "transient" => bool::try_from(v).unwrap_or(true).then_some(Hint::Transient),
                "x-canonical-private-icon-only" => {
                    bool::try_from(v).unwrap_or(true).then_some(Hint::IconOnly)
                }
                "image-path" | "image_path" => String::try_from(v)
                    .ok()
                    .filter(|s| !s.is_empty())
                    .map(|s| Hint::ImagePath(Image::from_path_or_name(s))),
                "image-data" | "image_data" | "icon-data" | "icon_data" => match v {
                    zbus::zvariant::Value::Structure(v) => match ImageData::try_from(v)
                        .and_then(NotificationImage::from_image_data)
                    {
                        Ok(image) => {
                            let image = Image::from(image);
                            Some(if k.starts_with("icon") {
                                Hint::IconData(image)
                            } else {
                                Hint::ImageData(image)
                            })
                        }
                        Err(err) => {
                            tracing::warn!("Invalid image data: {}", err);
                            None
                        }
                    },
                    _ => {
                        tracing::warn!("Invalid value for hint: {}", k);
                        None
                    }
                },
                _ => {
                    tracing::debug!("Ignoring hint: {}", k);
                    None
                }
            })
            .collect();

        Notification {
            replaces_id,
            app_name: app_name.to_string(),
            app_icon: app_icon.to_string(),
            summary: summary.to_string(),
            body: body.to_string(),
            actions: parse_actions(&actions),
            hints,
            expire_timeout,
        }
    }

    pub fn transient(&self) -> bool {
        self.hints.iter().any(|h| *h == Hint::Transient)
    }

    pub fn icon_only(&self) -> bool {
        self.hints.iter().any(|h| *h == Hint::IconOnly)
    }

    pub fn desktop_entry(&self) -> Option<&str> {
        self.hints.iter().find_map(|h| match h {
            Hint::DesktopEntry(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn urgency(&self) -> NotificationUrgency {
        self.hints
            .iter()
            .find_map(|h| match h {
                Hint::Urgency(u) => Some(NotificationUrgency::from(*u)),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Progress gauge value, clamped to 0..=100.
    pub fn gauge(&self) -> Option<u8> {
        self.hints.iter().find_map(|h| match h {
            Hint::Value(v) => Some((*v).clamp(0, 100) as u8),
            _ => None,
        })
    }

    /// The name shown for the sender; a desktop entry wins over the raw app name.
    pub fn display_app_name(&self) -> &str {
        self.desktop_entry().unwrap_or(&self.app_name)
    }

    /// Resolve the icon to show.
    ///
    /// `image-data` beats `image-path`, which beats a non-empty `app_icon`,
    /// then the legacy `icon_data`, then the icon of the desktop entry.
    pub fn icon(&self) -> Option<Image> {
        let image_data = self.hints.iter().find_map(|h| match h {
            Hint::ImageData(i) => Some(i),
            _ => None,
        });
        let image_path = self.hints.iter().find_map(|h| match h {
            Hint::ImagePath(i) => Some(i),
            _ => None,
        });
        let icon_data = self.hints.iter().find_map(|h| match h {
            Hint::IconData(i) => Some(i),
            _ => None,
        });

        image_data
            .or(image_path)
            .cloned()
            .or_else(|| {
                (!self.app_icon.is_empty())
                    .then(|| Image::from_path_or_name(self.app_icon.clone()))
            })
            .or_else(|| icon_data.cloned())
            .or_else(|| self.desktop_entry().map(|d| Image::DesktopEntry(d.to_string())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionId {
    Default,
    Custom(String),
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Default => write!(f, "default"),
            ActionId::Custom(value) => write!(f, "{}", value),
        }
    }
}

impl FromStr for ActionId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ActionId::from(s))
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        match s {
            "default" => ActionId::Default,
            s => ActionId::Custom(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hint {
    DesktopEntry(String),
    ImageData(Image),
    ImagePath(Image),
    IconData(Image),
    IconOnly,
    Transient,
    Urgency(u8),
    Value(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Image {
    /// Themed icon name
    Name(String),
    File(PathBuf),
    /// Icon of the named desktop entry
    DesktopEntry(String),
    /// RGBA
    Data {
        width: u32,
        height: u32,
        data: Arc<Vec<u8>>,
    },
}

impl Image {
    /// Classify a string as a `file://` URL, an absolute path, or an icon name.
    pub fn from_path_or_name(s: String) -> Self {
        url::Url::parse(&s)
            .ok()
            .filter(|u| u.scheme() == "file")
            .and_then(|u| u.to_file_path().ok())
            .map(Image::File)
            .or_else(|| s.starts_with('/').then(|| Image::File(PathBuf::from(&s))))
            .unwrap_or(Image::Name(s))
    }
}

impl From<ProcessedImage> for Image {
    fn from(image: ProcessedImage) -> Self {
        Image::Data {
            width: image.width,
            height: image.height,
            data: Arc::new(image.data),
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloseReason {
    Expired = 1,
    Dismissed = 2,
    CloseNotification = 3,
    Undefined = 4,
}
