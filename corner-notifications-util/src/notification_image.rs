//! Normalization of raw notification pixels.
//!
//! Pixel data from `image-data` and `icon_data` hints is stripped of its
//! row padding, converted to RGBA and scaled down to fit the icon slot
//! while preserving the aspect ratio.

use crate::image::{ImageData, ImageDataError};
use fast_image_resize as fr;
use image::{DynamicImage, RgbImage};

/// Edge length of the icon slot in pixels
pub const ICON_SIZE: u32 = 48;

/// Processed notification image ready for display
#[derive(Debug, Clone)]
pub struct ProcessedImage {
  /// Raw RGBA pixel data
  pub data: Vec<u8>,
  pub width: u32,
  pub height: u32,
}

/// Notification image processor
pub struct NotificationImage;

impl NotificationImage {
  /// Turn validated raw pixels into an RGBA icon no larger than [`ICON_SIZE`].
  ///
  /// # Errors
  ///
  /// Returns `ImageDataError` if the buffer does not match its declared
  /// geometry or scaling fails.
  pub fn from_image_data(image: ImageData) -> Result<ProcessedImage, ImageDataError> {
    image.validate()?;

    let width = image.width as u32;
    let height = image.height as u32;
    let channels = image.channels as usize;
    let row_len = width as usize * channels;

    // Drop the row padding
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in image.data.chunks(image.rowstride as usize) {
      pixels.extend_from_slice(&row[..row_len]);
    }

    let rgba = if image.has_alpha {
      pixels
    } else {
      let rgb = RgbImage::from_raw(width, height, pixels).ok_or(
        ImageDataError::LengthMismatch {
          expected: row_len * height as usize,
          actual: 0,
        },
      )?;
      DynamicImage::ImageRgb8(rgb).to_rgba8().into_raw()
    };

    let (width, height, data) = Self::scale_to_icon(width, height, rgba)?;
    Ok(ProcessedImage {
      data,
      width,
      height,
    })
  }

  /// Scale down to fit [`ICON_SIZE`], preserving aspect ratio. Smaller
  /// images are left alone.
  fn scale_to_icon(
    width: u32,
    height: u32,
    data: Vec<u8>,
  ) -> Result<(u32, u32, Vec<u8>), ImageDataError> {
    if width <= ICON_SIZE && height <= ICON_SIZE {
      return Ok((width, height, data));
    }

    let fit = |short: u32, long: u32| ((short as u64 * ICON_SIZE as u64) / long as u64).max(1) as u32;
    let (new_width, new_height) = if width >= height {
      (ICON_SIZE, fit(height, width))
    } else {
      (fit(width, height), ICON_SIZE)
    };

    let resize_err = |e: &dyn std::fmt::Display| ImageDataError::Resize(e.to_string());

    let mut src = fr::images::Image::from_vec_u8(width, height, data, fr::PixelType::U8x4)
      .map_err(|e| resize_err(&e))?;
    let mut dst = fr::images::Image::new(new_width, new_height, fr::PixelType::U8x4);

    // Premultiply so transparent pixels do not bleed color
    fr::MulDiv::default()
      .multiply_alpha_inplace(&mut src)
      .map_err(|e| resize_err(&e))?;

    let mut resizer = fr::Resizer::new();
    let options =
      fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));
    resizer
      .resize(&src, &mut dst, Some(&options))
      .map_err(|e| resize_err(&e))?;

    fr::MulDiv::default()
      .divide_alpha_inplace(&mut dst)
      .map_err(|e| resize_err(&e))?;

    Ok((new_width, new_height, dst.into_vec()))
  }
}
