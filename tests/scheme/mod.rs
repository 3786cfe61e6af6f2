//! End-to-end distribute / recover runs over real files in a scratch
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use umbra::{bmp::Bitmap, pipeline, stego, UmbraError};

/// A fresh per-test directory under the system temp dir.
fn scratch_dir(tag: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("umbra-{tag}-{}", std::process::id()));
  if dir.exists() {
    fs::remove_dir_all(&dir).unwrap();
  }
  fs::create_dir_all(&dir).unwrap();
  dir
}

fn noisy_carrier(width: u32, height: i32) -> Bitmap {
  let mut bmp = Bitmap::with_canonical_palette(width, height);
  let noise = crate::rand_bytes(bmp.pixel_count());
  bmp.set_logical_pixels(&noise);
  bmp
}

fn write_secret(dir: &Path, width: u32, height: i32) -> (PathBuf, Vec<u8>) {
  let mut secret = Bitmap::with_canonical_palette(width, height);
  let values = crate::rand_bytes(secret.pixel_count());
  secret.set_logical_pixels(&values);
  let path = dir.join("secret.bmp");
  secret.store(&path).unwrap();
  // sharing clamps into GF(251) first, so that is what recovery returns
  let expected: Vec<u8> = values.iter().map(|b| (*b).min(250)).collect();
  (path, expected)
}

#[test]
fn distribute_then_recover_from_a_shadow_subset() {
  let root = scratch_dir("subset");
  let carriers = root.join("carriers");
  let chosen = root.join("chosen");
  fs::create_dir_all(&carriers).unwrap();
  fs::create_dir_all(&chosen).unwrap();

  let (secret_path, expected) = write_secret(&root, 24, 4);
  for name in ["a.bmp", "b.bmp", "c.bmp", "d.bmp"] {
    noisy_carrier(32, 9).store(&carriers.join(name)).unwrap();
  }

  pipeline::distribute(&secret_path, &carriers, 3, 4, 691, true).unwrap();

  // recovery only gets three of the four doctored carriers
  for name in ["a.bmp", "c.bmp", "d.bmp"] {
    fs::copy(carriers.join(name), chosen.join(name)).unwrap();
  }
  let out = root.join("recovered.bmp");
  // a wrong CLI seed must not matter: the carriers recorded the real one
  pipeline::recover(&out, &chosen, 3, 24, 4, 123, true).unwrap();

  let recovered = Bitmap::load(&out).unwrap();
  assert_eq!(recovered.logical_pixels(), expected);
  assert_eq!(recovered.palette, umbra::bmp::canonical_palette());
  fs::remove_dir_all(&root).unwrap();
}

#[test]
fn doctored_carriers_carry_in_field_shadows_and_their_metadata() {
  let root = scratch_dir("closure");
  let carriers = root.join("carriers");
  fs::create_dir_all(&carriers).unwrap();

  let (secret_path, _) = write_secret(&root, 16, 4);
  for name in ["x.bmp", "y.bmp"] {
    noisy_carrier(16, 16).store(&carriers.join(name)).unwrap();
  }

  pipeline::distribute(&secret_path, &carriers, 2, 2, 4242, true).unwrap();

  for (ordinal, name) in [(1_u16, "x.bmp"), (2, "y.bmp")] {
    let doctored = Bitmap::load(&carriers.join(name)).unwrap();
    assert_eq!(doctored.file_header.shadow_index, ordinal);
    assert_eq!(doctored.file_header.seed, 4242);
    let shadow = stego::retrieve_shadow(&doctored, 16, 4, 2).unwrap();
    assert!(shadow.logical_pixels().iter().all(|&p| p <= 250));
  }

  // and the wire format is what every other BMP reader expects
  let raw = fs::read(carriers.join("x.bmp")).unwrap();
  assert_eq!(&raw[0..2], b"BM");
  assert_eq!(u16::from_le_bytes(raw[6..8].try_into().unwrap()), 4242);
  assert_eq!(u16::from_le_bytes(raw[8..10].try_into().unwrap()), 1);
  assert_eq!(u32::from_le_bytes(raw[10..14].try_into().unwrap()), 1078);
  fs::remove_dir_all(&root).unwrap();
}

#[test]
fn recovery_without_the_permutation_matches_too() {
  let root = scratch_dir("plain");
  let carriers = root.join("carriers");
  fs::create_dir_all(&carriers).unwrap();

  let (secret_path, expected) = write_secret(&root, 10, 5);
  for name in ["one.bmp", "two.bmp"] {
    noisy_carrier(25, 8).store(&carriers.join(name)).unwrap();
  }

  pipeline::distribute(&secret_path, &carriers, 2, 2, 691, false).unwrap();
  let out = root.join("recovered.bmp");
  pipeline::recover(&out, &carriers, 2, 10, 5, 691, false).unwrap();
  assert_eq!(Bitmap::load(&out).unwrap().logical_pixels(), expected);
  fs::remove_dir_all(&root).unwrap();
}

#[test]
fn non_bitmap_clutter_is_skipped_and_shortfalls_are_reported() {
  let root = scratch_dir("shortfall");
  let carriers = root.join("carriers");
  fs::create_dir_all(&carriers).unwrap();

  let (secret_path, _) = write_secret(&root, 8, 2);
  noisy_carrier(8, 8).store(&carriers.join("only.bmp")).unwrap();
  fs::write(carriers.join("notes.txt"), b"not a bitmap").unwrap();

  let err = pipeline::distribute(&secret_path, &carriers, 2, 3, 691, true).unwrap_err();
  assert!(matches!(err, UmbraError::InsufficientCarriers { found: 1, needed: 3 }));
  fs::remove_dir_all(&root).unwrap();
}

#[test]
fn carriers_below_the_expansion_factor_are_rejected() {
  let root = scratch_dir("capacity");
  let carriers = root.join("carriers");
  fs::create_dir_all(&carriers).unwrap();

  // 32-pixel secret at k = 2 needs 128 carrier pixels; these have 6
  let (secret_path, _) = write_secret(&root, 16, 2);
  for name in ["p.bmp", "q.bmp"] {
    noisy_carrier(6, 1).store(&carriers.join(name)).unwrap();
  }

  let err = pipeline::distribute(&secret_path, &carriers, 2, 2, 691, true).unwrap_err();
  assert!(matches!(err, UmbraError::InsufficientCapacity { capacity: 6, needed: 128 }));
  fs::remove_dir_all(&root).unwrap();
}

#[test]
fn recovery_needs_marked_shadow_files() {
  let root = scratch_dir("unmarked");
  let files = root.join("files");
  fs::create_dir_all(&files).unwrap();

  // pristine carriers: right shape, but no shadow ordinals in their headers
  for name in ["m.bmp", "n.bmp"] {
    noisy_carrier(16, 16).store(&files.join(name)).unwrap();
  }

  let out = root.join("recovered.bmp");
  let err = pipeline::recover(&out, &files, 2, 16, 4, 691, true).unwrap_err();
  assert!(matches!(err, UmbraError::InsufficientShadows { found: 0, needed: 2 }));
  fs::remove_dir_all(&root).unwrap();
}
