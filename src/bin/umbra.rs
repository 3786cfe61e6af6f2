//! Command-line front end: split a secret bitmap into hidden shadows, or
//! rebuild the secret from a directory of doctored carriers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use umbra::{bmp, pipeline, UmbraError, UmbraResult};

/// (k, n) visual secret sharing over 8-bit BMP carriers.
#[derive(Parser)]
#[command(name = "umbra", version, disable_help_flag = true)]
struct Cli {
  /// Split a secret image into shadows hidden inside the carriers.
  #[arg(short = 'd', long = "distribute")]
  distribute: bool,

  /// Rebuild a secret image from hidden shadows.
  #[arg(short = 'r', long = "recover")]
  recover: bool,

  /// The secret image to split, or the destination path when recovering.
  #[arg(long)]
  secret: PathBuf,

  /// Threshold: how many shadows reconstruction needs.
  #[arg(short)]
  k: usize,

  /// Total shadows to produce; defaults to the carrier count in the
  /// directory.
  #[arg(short)]
  n: Option<usize>,

  /// Width of the recovered image.
  #[arg(short)]
  w: Option<u32>,

  /// Height of the recovered image.
  #[arg(short = 'h')]
  h: Option<u32>,

  /// Permutation seed.
  #[arg(short, default_value_t = 691)]
  s: u16,

  /// Directory holding the carriers (distribute) or the shadow-bearing
  /// files (recover).
  #[arg(long, default_value = "./")]
  dir: PathBuf,

  /// Skip the pixel permutation step on either side.
  #[arg(long)]
  no_permute: bool,

  /// Print help.
  #[arg(long, action = ArgAction::HelpLong)]
  help: Option<bool>,
}

fn main() -> ExitCode {
  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("umbra: {e}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> UmbraResult<()> {
  let invalid = |msg: String| UmbraError::InvalidArguments(msg);
  if cli.distribute == cli.recover {
    return Err(invalid("pass exactly one of -d or -r".into()));
  }
  if cli.k < 2 {
    return Err(invalid(format!("k = {} is below the minimum threshold of 2", cli.k)));
  }

  if cli.distribute {
    let n = match cli.n {
      Some(n) => n,
      None => count_bmp_files(&cli.dir)?,
    };
    if n < cli.k {
      return Err(invalid(format!("n = {n} shadows cannot meet a threshold of k = {}", cli.k)));
    }
    if n > 250 {
      return Err(invalid(format!("n = {n} exceeds the 250 distinct shadow indices GF(251) has")));
    }
    pipeline::distribute(&cli.secret, &cli.dir, cli.k, n, cli.s, !cli.no_permute)
  } else {
    let (w, h) = match (cli.w, cli.h) {
      (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
      _ => return Err(invalid("recovering needs the secret's -w and -h".into())),
    };
    pipeline::recover(&cli.secret, &cli.dir, cli.k, w, h, cli.s, !cli.no_permute)
  }
}

/// How many files in `dir` even look like bitmaps; the default shadow count.
fn count_bmp_files(dir: &Path) -> UmbraResult<usize> {
  let mut count = 0;
  for entry in std::fs::read_dir(dir)? {
    let path = entry?.path();
    if path.is_file() && std::fs::read(&path).map(|b| bmp::is_bmp(&b)).unwrap_or(false) {
      count += 1;
    }
  }
  Ok(count)
}
