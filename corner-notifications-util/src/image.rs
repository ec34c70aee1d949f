use std::fmt;

/// Raw pixels from an `image-data` hint, D-Bus signature `(iiibiiay)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: i32,
    pub height: i32,
    pub rowstride: i32,
    pub has_alpha: bool,
    pub bits_per_sample: i32,
    pub channels: i32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDataError {
    /// The structure does not have the `(iiibiiay)` signature
    Signature,
    InvalidDimensions { width: i32, height: i32 },
    UnsupportedFormat { bits_per_sample: i32, channels: i32, has_alpha: bool },
    /// Rowstride is too small to hold a row
    InvalidRowstride(i32),
    /// The pixel buffer does not match the declared geometry
    LengthMismatch { expected: usize, actual: usize },
    /// Scaling failed
    Resize(String),
}

impl fmt::Display for ImageDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageDataError::Signature => write!(f, "expected an (iiibiiay) structure"),
            ImageDataError::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions {}x{}", width, height)
            }
            ImageDataError::UnsupportedFormat {
                bits_per_sample,
                channels,
                has_alpha,
            } => write!(
                f,
                "unsupported format: {} bits per sample, {} channels, alpha {}",
                bits_per_sample, channels, has_alpha
            ),
            ImageDataError::InvalidRowstride(rowstride) => {
                write!(f, "rowstride {} is too small", rowstride)
            }
            ImageDataError::LengthMismatch { expected, actual } => write!(
                f,
                "expected {} bytes of pixel data, got {}",
                expected, actual
            ),
            ImageDataError::Resize(err) => write!(f, "failed to scale image: {}", err),
        }
    }
}

impl std::error::Error for ImageDataError {}

impl ImageData {
    /// Number of bytes the buffer must hold:
    /// `(height - 1) * rowstride + width * ((channels * bits_per_sample + 7) / 8)`.
    /// The last row carries no padding.
    /// `None` when a field is negative or the size does not fit in `usize`.
    pub fn expected_len(&self) -> Option<usize> {
        let dim = |v: i32| usize::try_from(v).ok();
        let bytes_per_pixel = dim(self.channels)?
            .checked_mul(dim(self.bits_per_sample)?)?
            .div_ceil(8);
        let padded_rows = dim(self.height)?
            .checked_sub(1)?
            .checked_mul(dim(self.rowstride)?)?;
        let last_row = dim(self.width)?.checked_mul(bytes_per_pixel)?;
        padded_rows.checked_add(last_row)
    }

    pub fn validate(&self) -> Result<(), ImageDataError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ImageDataError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let format_ok = self.bits_per_sample == 8
            && matches!(
                (self.channels, self.has_alpha),
                (3, false) | (4, true)
            );
        if !format_ok {
            return Err(ImageDataError::UnsupportedFormat {
                bits_per_sample: self.bits_per_sample,
                channels: self.channels,
                has_alpha: self.has_alpha,
            });
        }

        let Some(row_len) = self.width.checked_mul(self.channels) else {
            return Err(ImageDataError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        };
        if self.rowstride < row_len {
            return Err(ImageDataError::InvalidRowstride(self.rowstride));
        }

        let Some(expected) = self.expected_len() else {
            return Err(ImageDataError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        };
        if self.data.len() != expected {
            return Err(ImageDataError::LengthMismatch {
                expected,
                actual: self.data.len(),
            });
        }

        Ok(())
    }
}

#[cfg(feature = "zbus_notifications")]
impl TryFrom<zbus::zvariant::Structure<'_>> for ImageData {
    type Error = ImageDataError;

    fn try_from(value: zbus::zvariant::Structure<'_>) -> Result<Self, Self::Error> {
        let fields: [zbus::zvariant::Value<'_>; 7] = value
            .into_fields()
            .try_into()
            .map_err(|_| ImageDataError::Signature)?;
        let [width, height, rowstride, has_alpha, bits_per_sample, channels, data] = fields;

        let int = |v: zbus::zvariant::Value<'_>| i32::try_from(v).map_err(|_| ImageDataError::Signature);

        let image = ImageData {
            width: int(width)?,
            height: int(height)?,
            rowstride: int(rowstride)?,
            has_alpha: bool::try_from(has_alpha).map_err(|_| ImageDataError::Signature)?,
            bits_per_sample: int(bits_per_sample)?,
            channels: int(channels)?,
            data: Vec::<u8>::try_from(data).map_err(|_| ImageDataError::Signature)?,
        };

        image.validate()?;
        Ok(image)
    }
}
