//! Whole distribute / recover runs over a directory of carrier files.
//!
//! Both directions are strictly sequential: select files, transform bitmaps
//! one at a time, write results. Nothing is rolled back on failure, so a
//! half-finished distribute can leave already-doctored carriers behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{bmp::Bitmap, permute, shadow, stego, UmbraError, UmbraResult};

/// Scans `dir` for at most `limit` regular files whose bitmaps satisfy
/// `keep`, in file-name order so repeated runs pair files the same way.
///
/// Files that fail to parse as supported bitmaps are skipped, not fatal; a
/// carrier directory is allowed to hold other clutter.
pub fn select_bitmaps<F>(dir: &Path, limit: usize, keep: F) -> UmbraResult<Vec<(PathBuf, Bitmap)>>
where
  F: Fn(&Path, &Bitmap) -> bool,
{
  let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|path| path.is_file())
    .collect();
  paths.sort();

  let mut found = Vec::new();
  for path in paths {
    if found.len() == limit {
      break;
    }
    let bmp = match Bitmap::load(&path) {
      Ok(bmp) => bmp,
      Err(_) => continue,
    };
    if keep(&path, &bmp) {
      crate::trace!("selected {}", path.display());
      found.push((path, bmp));
    }
  }
  Ok(found)
}

/// Splits the secret at `secret_path` into `n` shadows and hides them in the
/// first `n` usable carriers under `dir`, overwriting those carriers.
///
/// `scramble` applies the seed-keyed pixel permutation before sharing; the
/// seed is recorded in every doctored carrier either way.
pub fn distribute(
  secret_path: &Path, dir: &Path, k: usize, n: usize, seed: u16, scramble: bool,
) -> UmbraResult<()> {
  let mut secret = Bitmap::load(secret_path)?;
  crate::trace!("secret {} has {} pixels", secret_path.display(), secret.pixel_count());
  secret.truncate_grayscale();
  if scramble {
    permute::permute(&mut secret, seed);
  }
  let shadows = shadow::form_shadows(&secret, k, n, seed)?;

  let secret_abs = fs::canonicalize(secret_path).ok();
  let carriers = select_bitmaps(dir, n, |path, bmp| {
    match (fs::canonicalize(path).ok(), &secret_abs) {
      // never let the secret double as its own carrier
      (Some(p), Some(s)) if p == *s => false,
      _ => bmp.is_valid_carrier(k),
    }
  })?;
  if carriers.len() < n {
    return Err(UmbraError::InsufficientCarriers { found: carriers.len(), needed: n });
  }

  for ((path, mut carrier), shadow) in carriers.into_iter().zip(shadows) {
    stego::hide_shadow(&mut carrier, &shadow)?;
    carrier.store(&path)?;
    crate::trace!("hid shadow {} in {}", carrier.file_header.shadow_index, path.display());
  }
  Ok(())
}

/// Gathers `k` shadow-bearing carriers from `dir` and rebuilds the secret
/// into `secret_path` with the given dimensions.
///
/// The permutation seed recorded in the carriers wins over `seed`; the
/// argument only covers shadows written with an empty seed field.
pub fn recover(
  secret_path: &Path, dir: &Path, k: usize, width: u32, height: u32, seed: u16, scramble: bool,
) -> UmbraResult<()> {
  let secret_len = width as usize * height as usize;
  if k < 2 || secret_len % k != 0 {
    return Err(UmbraError::InvalidSecretSize { pixels: secret_len, k });
  }
  let holders = select_bitmaps(dir, k, |_, bmp| bmp.is_valid_shadow(k, secret_len))?;
  if holders.len() < k {
    return Err(UmbraError::InsufficientShadows { found: holders.len(), needed: k });
  }

  let shadows = holders
    .iter()
    .map(|(_, carrier)| stego::retrieve_shadow(carrier, width, height, k))
    .collect::<UmbraResult<Vec<_>>>()?;
  let pixels = shadow::reveal_secret(&shadows, k)?;

  let mut secret = Bitmap::with_canonical_palette(width, height as i32);
  secret.set_logical_pixels(&pixels);
  if scramble {
    let recorded = shadows[0].file_header.seed;
    let seed = if recorded != 0 && recorded != seed {
      crate::trace!("using seed {recorded} recorded in the shadows");
      recorded
    } else {
      seed
    };
    permute::unpermute(&mut secret, seed);
  }
  secret.store(secret_path)
}
