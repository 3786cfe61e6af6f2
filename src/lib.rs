#![forbid(unsafe_code)]

//! Splits an 8-bit grayscale BMP "secret" into `n` shadow images with the
//! Thien-Lin (k, n) threshold construction over GF(251), then rides each
//! shadow inside the low bits of a carrier bitmap. Any `k` doctored carriers
//! rebuild the secret; fewer say nothing about it.
//!
//! * [`bmp`] - the container: 8-bpp indexed BMP, 40-byte info header,
//!   256-entry grayscale palette, byte-exact little-endian layout.
//! * [`gf251`] - the field the sharing polynomials live in.
//! * [`permute`] - the seed-keyed positional scramble of the secret.
//! * [`shadow`] - turning secrets into shadows and back.
//! * [`stego`] - moving shadow bytes through carrier pixel LSBs.
//! * [`pipeline`] - whole distribute / recover runs over a directory.

#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "trace")] {
      ::std::print!("{file}:{line}> ", file = file!(), line = line!());
      ::std::println!($($arg)*);
    }
  }
}

pub mod bmp;
pub mod gf251;
pub mod permute;
pub mod pipeline;
pub mod shadow;
pub mod stego;

mod util;

pub use bmp::Bitmap;

pub type UmbraResult<T> = Result<T, UmbraError>;

/// Any failure the crate reports.
///
/// Nothing is recovered locally; every error propagates to the caller of the
/// pipeline entry points, and partially written output files stay on disk.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UmbraError {
  /// A file could not be opened, read, or written.
  #[error("i/o failure: {0}")]
  Io(#[from] std::io::Error),

  /// The input does not start with the `BM` magic, or is truncated, or its
  /// declared sizes do not fit the bytes present.
  #[error("not a usable BMP file")]
  InvalidBmp,

  /// The file is a BMP, but not the 40-byte-info-header 8-bpp kind.
  #[error("unsupported BMP: {header_size}-byte info header at {bits_per_pixel} bpp (need 40 and 8)")]
  UnsupportedBmp {
    header_size: u32,
    bits_per_pixel: u16,
  },

  /// The secret's pixel count does not split into sections of `k`.
  #[error("secret has {pixels} pixels, which is not divisible by k = {k}")]
  InvalidSecretSize { pixels: usize, k: usize },

  /// The carrier directory ran out of usable bitmaps.
  #[error("found {found} usable carriers, need {needed}")]
  InsufficientCarriers { found: usize, needed: usize },

  /// Fewer than `k` usable shadow files were found, or the shadows present
  /// cannot form a solvable system (missing, zero, or duplicate indices).
  #[error("found {found} usable shadows, need {needed} distinct ones")]
  InsufficientShadows { found: usize, needed: usize },

  /// The carrier is too small to hold the shadow at 8 pixels per byte.
  #[error("carrier holds {capacity} pixels, hiding this shadow needs {needed}")]
  InsufficientCapacity { capacity: usize, needed: usize },

  /// Command-line validation failed.
  #[error("invalid arguments: {0}")]
  InvalidArguments(String),
}
