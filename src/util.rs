use crate::{UmbraError, UmbraResult};

#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(bytes: &[u8]) -> UmbraResult<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().unwrap();
    Ok((a, tail))
  } else {
    Err(UmbraError::InvalidBmp)
  }
}

#[inline]
#[must_use]
pub(crate) fn u16_le(bytes: &[u8]) -> u16 {
  u16::from_le_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub(crate) fn u32_le(bytes: &[u8]) -> u32 {
  u32::from_le_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub(crate) fn i32_le(bytes: &[u8]) -> i32 {
  i32::from_le_bytes(bytes.try_into().unwrap())
}

/// Bytes per row of an 8-bpp pixel array, padded to a multiple of 4.
#[inline]
#[must_use]
pub(crate) const fn row_stride(width: u32) -> usize {
  ((8 * width as usize + 31) / 32) * 4
}

/// Total byte length of an 8-bpp pixel array, row padding included.
#[inline]
#[must_use]
pub(crate) const fn pixel_array_size(width: u32, height: i32) -> usize {
  row_stride(width) * height.unsigned_abs() as usize
}
