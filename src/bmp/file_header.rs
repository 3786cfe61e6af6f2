use crate::{util::*, UmbraError, UmbraResult};

/// The tag that opens every bitmap this crate will touch.
pub const BMP_TAG: [u8; 2] = *b"BM";

/// The 14-byte header at the start of a BMP file.
///
/// The format reserves bytes 6..10 for two 16-bit fields that standard
/// writers leave zero. This crate repurposes them: the first carries the
/// pixel-permutation seed and the second a 1-based shadow ordinal, so a
/// doctored carrier is self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BmpFileHeader {
  /// Expected to be `BM`.
  pub tag: [u8; 2],

  /// The total size of the file in bytes.
  pub total_file_size: u32,

  /// Permutation seed applied to the secret before sharing.
  pub seed: u16,

  /// 1-based shadow ordinal; 0 when this bitmap is not carrying a shadow.
  pub shadow_index: u16,

  /// Byte index within the file where the pixel array starts.
  pub pixel_data_offset: u32,
}

impl From<[u8; 14]> for BmpFileHeader {
  #[inline]
  #[must_use]
  fn from(a: [u8; 14]) -> Self {
    Self {
      tag: a[0..2].try_into().unwrap(),
      total_file_size: u32_le(&a[2..6]),
      seed: u16_le(&a[6..8]),
      shadow_index: u16_le(&a[8..10]),
      pixel_data_offset: u32_le(&a[10..14]),
    }
  }
}
impl From<BmpFileHeader> for [u8; 14] {
  #[inline]
  fn from(h: BmpFileHeader) -> Self {
    let mut a = [0; 14];
    a[0..2].copy_from_slice(h.tag.as_slice());
    a[2..6].copy_from_slice(h.total_file_size.to_le_bytes().as_slice());
    a[6..8].copy_from_slice(h.seed.to_le_bytes().as_slice());
    a[8..10].copy_from_slice(h.shadow_index.to_le_bytes().as_slice());
    a[10..14].copy_from_slice(h.pixel_data_offset.to_le_bytes().as_slice());
    a
  }
}
impl BmpFileHeader {
  /// Splits the file header off the front of a BMP byte stream, rejecting
  /// anything that does not open with the `BM` tag.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> UmbraResult<(Self, &[u8])> {
    let (a, rest) = try_pull_byte_array::<14>(bytes)?;
    let header = Self::from(a);
    if header.tag != BMP_TAG {
      return Err(UmbraError::InvalidBmp);
    }
    Ok((header, rest))
  }
}
