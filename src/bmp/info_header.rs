use crate::{util::*, UmbraError, UmbraResult};

/// The 40-byte `BITMAPINFOHEADER`, the only info header this crate accepts.
///
/// BMP grew at least seven info header versions over the years; secrets and
/// carriers here are always the Windows 3.1 one, uncompressed, at 8 bits per
/// pixel. Anything else is reported as unsupported rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpInfoHeader {
  /// Image pixel width.
  pub width: u32,

  /// Image pixel height.
  ///
  /// * A positive height indicates that the origin is the **bottom** left.
  /// * A negative height indicates that the origin is the **top** left.
  pub height: i32,

  /// Always 8 for files this crate reads or writes.
  pub bits_per_pixel: u16,

  /// Bytes in the (row-padded) pixel array. Some writers leave this 0; the
  /// codec then falls back to `total_file_size - pixel_data_offset`.
  pub image_byte_size: u32,

  /// Horizontal pixels per meter.
  pub h_ppm: i32,

  /// Vertical pixels per meter.
  pub v_ppm: i32,

  /// Palette entry count as written; 0 also means the full 256.
  pub palette_len: u32,

  /// The number of "important" colors. Generally ignored.
  pub important_colors: u32,
}

impl TryFrom<[u8; 40]> for BmpInfoHeader {
  type Error = UmbraError;
  #[inline]
  fn try_from(a: [u8; 40]) -> UmbraResult<Self> {
    let size = u32_le(&a[0..4]);
    let width = u32_le(&a[4..8]);
    let height = i32_le(&a[8..12]);
    let _planes = u16_le(&a[12..14]);
    let bits_per_pixel = u16_le(&a[14..16]);
    let compression = u32_le(&a[16..20]);
    let image_byte_size = u32_le(&a[20..24]);
    let h_ppm = i32_le(&a[24..28]);
    let v_ppm = i32_le(&a[28..32]);
    let palette_len = u32_le(&a[32..36]);
    let important_colors = u32_le(&a[36..40]);
    if size != 40 || bits_per_pixel != 8 || compression != 0 {
      return Err(UmbraError::UnsupportedBmp { header_size: size, bits_per_pixel });
    }
    if width == 0 || height == 0 {
      return Err(UmbraError::InvalidBmp);
    }
    Ok(Self {
      width,
      height,
      bits_per_pixel,
      image_byte_size,
      h_ppm,
      v_ppm,
      palette_len,
      important_colors,
    })
  }
}
impl From<BmpInfoHeader> for [u8; 40] {
  #[inline]
  #[must_use]
  fn from(h: BmpInfoHeader) -> Self {
    let mut a = [0; 40];
    a[0..4].copy_from_slice(40_u32.to_le_bytes().as_slice());
    a[4..8].copy_from_slice(h.width.to_le_bytes().as_slice());
    a[8..12].copy_from_slice(h.height.to_le_bytes().as_slice());
    a[12..14].copy_from_slice(1_u16.to_le_bytes().as_slice());
    a[14..16].copy_from_slice(h.bits_per_pixel.to_le_bytes().as_slice());
    a[16..20].copy_from_slice(0_u32.to_le_bytes().as_slice());
    a[20..24].copy_from_slice(h.image_byte_size.to_le_bytes().as_slice());
    a[24..28].copy_from_slice(h.h_ppm.to_le_bytes().as_slice());
    a[28..32].copy_from_slice(h.v_ppm.to_le_bytes().as_slice());
    a[32..36].copy_from_slice(h.palette_len.to_le_bytes().as_slice());
    a[36..40].copy_from_slice(h.important_colors.to_le_bytes().as_slice());
    a
  }
}
impl BmpInfoHeader {
  /// Header for a fresh 8-bpp image of the given dimensions.
  #[inline]
  #[must_use]
  pub fn for_dimensions(width: u32, height: i32) -> Self {
    Self {
      width,
      height,
      bits_per_pixel: 8,
      image_byte_size: pixel_array_size(width, height) as u32,
      h_ppm: 0,
      v_ppm: 0,
      palette_len: 256,
      important_colors: 0,
    }
  }
}
