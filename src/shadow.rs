//! Forming shadows from a secret and revealing the secret from shadows.
//!
//! Every run of `k` consecutive secret pixels becomes the coefficients of one
//! polynomial over GF(251); shadow `x` collects the evaluations of all those
//! polynomials at the point `x`. Recovery inverts the evaluations with
//! Gauss-Jordan elimination on the Vandermonde system each pixel position
//! induces.

use crate::{bmp::Bitmap, gf251, UmbraError, UmbraResult};

/// Picks the most square `(width, height)` factorization of a shadow's pixel
/// count, with the smaller factor as the width.
///
/// Candidate widths walk down from the integer square root to 3; a prime or
/// tiny count falls back to a single row.
#[must_use]
pub fn closest_pair(size: usize) -> (usize, usize) {
  let mut y = (size as f64).sqrt() as usize;
  // f64 square roots can land one off for very large counts
  while y.saturating_mul(y) > size {
    y -= 1;
  }
  while (y + 1).saturating_mul(y + 1) <= size {
    y += 1;
  }
  while y >= 3 {
    if size % y == 0 {
      return (y, size / y);
    }
    y -= 1;
  }
  (size, 1)
}

/// Evaluates the secret into `n` shadow bitmaps for a threshold of `k`.
///
/// The secret's pixel count must be a multiple of `k`. Each returned bitmap
/// carries the canonical palette, the permutation `seed`, and its 1-based
/// `shadow_index` (the evaluation point) in the header.
pub fn form_shadows(secret: &Bitmap, k: usize, n: usize, seed: u16) -> UmbraResult<Vec<Bitmap>> {
  let pixels = secret.pixel_count();
  if k == 0 || pixels % k != 0 {
    return Err(UmbraError::InvalidSecretSize { pixels, k });
  }
  let flat = secret.logical_pixels();
  let shadow_len = pixels / k;
  let (width, height) = closest_pair(shadow_len);
  crate::trace!("{n} shadows of {shadow_len} pixels, shaped {width}x{height}");
  let mut shadows = Vec::with_capacity(n);
  for x in 1..=n {
    let mut shadow = Bitmap::with_canonical_palette(width as u32, height as i32);
    shadow.file_header.seed = seed;
    shadow.file_header.shadow_index = x as u16;
    for (j, section) in flat.chunks_exact(k).enumerate() {
      shadow.set_pixel(j, gf251::eval(section, x as u8));
    }
    shadows.push(shadow);
  }
  Ok(shadows)
}

/// Rebuilds the secret's logical pixel array from any `k` shadows.
///
/// Shadow indices must be distinct, nonzero field elements and all shadows
/// must be the same size; anything else is reported as insufficient shadows,
/// as is a system that turns out unsolvable.
pub fn reveal_secret(shadows: &[Bitmap], k: usize) -> UmbraResult<Vec<u8>> {
  let short = |found: usize| UmbraError::InsufficientShadows { found, needed: k };
  if shadows.len() < k || k == 0 {
    return Err(short(shadows.len()));
  }
  let shadows = &shadows[..k];

  let mut xs = Vec::with_capacity(k);
  for s in shadows {
    let x = s.file_header.shadow_index;
    if x == 0 || x > 250 || xs.contains(&(x as u8)) {
      return Err(short(xs.len()));
    }
    xs.push(x as u8);
  }
  let shadow_len = shadows[0].pixel_count();
  if shadows.iter().any(|s| s.pixel_count() != shadow_len) {
    return Err(short(k));
  }

  let flats: Vec<Vec<u8>> = shadows.iter().map(Bitmap::logical_pixels).collect();
  let mut secret = vec![0_u8; shadow_len * k];
  for p in 0..shadow_len {
    let mut m: Vec<Vec<u8>> = (0..k)
      .map(|j| {
        let mut row: Vec<u8> = (0..k).map(|e| gf251::pow(xs[j], e as u32)).collect();
        row.push(flats[j][p]);
        row
      })
      .collect();
    let coeffs = gauss_jordan(&mut m).ok_or_else(|| short(k))?;
    secret[p * k..(p + 1) * k].copy_from_slice(&coeffs);
  }
  Ok(secret)
}

/// Solves a `k x (k+1)` augmented system over GF(251) in place, returning the
/// coefficient column, or `None` when a pivot vanishes.
///
/// Forward elimination clears each column bottom-up against the row above;
/// back-substitution then normalizes and empties the upper triangle.
fn gauss_jordan(m: &mut [Vec<u8>]) -> Option<Vec<u8>> {
  let k = m.len();
  for j in 0..k.saturating_sub(1) {
    for i in (j + 1..k).rev() {
      if m[i - 1][j] == 0 {
        return None;
      }
      let a = gf251::mul(m[i][j], gf251::inv(m[i - 1][j]));
      for t in j..=k {
        let scaled = gf251::mul(m[i - 1][t], a);
        m[i][t] = gf251::sub(m[i][t], scaled);
      }
    }
  }
  for i in (1..k).rev() {
    if m[i][i] == 0 {
      return None;
    }
    m[i][k] = gf251::mul(m[i][k], gf251::inv(m[i][i]));
    m[i][i] = 1;
    for t in (0..i).rev() {
      let scaled = gf251::mul(m[i][k], m[t][i]);
      m[t][k] = gf251::sub(m[t][k], scaled);
      m[t][i] = 0;
    }
  }
  if m[0][0] == 0 {
    return None;
  }
  m[0][k] = gf251::mul(m[0][k], gf251::inv(m[0][0]));
  Some((0..k).map(|r| m[r][k]).collect())
}
