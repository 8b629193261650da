//! Compare two ways of totaling a FITS image: a single-precision pass
//! over the whole array versus per-row f32 sums accumulated in double
//! precision. On large images the first loses low-order bits the second
//! keeps; the difference printed here is that discrepancy.

use anyhow::{bail, Context, Result};
use clap::Parser;
use fitsio::hdu::HduInfo;
use fitsio::images::ReadImage;
use fitsio::FitsFile;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sum_pixels")]
#[command(about = "Print whole-array and row-wise pixel totals of a FITS image")]
struct Args {
    /// FITS file whose primary HDU holds a 2-D image
    infile: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut fptr = FitsFile::open(&args.infile)
        .with_context(|| format!("Failed to open {}", args.infile.display()))?;
    let hdu = fptr.primary_hdu()?;
    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => bail!("primary HDU of {} is not an image", args.infile.display()),
    };
    if shape.len() != 2 {
        bail!("expected a 2-D image, got {} axes", shape.len());
    }
    let data: Vec<f32> = hdu.read_image(&mut fptr)?;

    // Method 1: one pass over the flattened array.
    let total1: f32 = data.iter().sum();

    // Method 2: sum each row in f32, add the row totals in f64.
    let mut total2 = 0.0f64;
    for row in data.chunks(shape[1]) {
        let row_total: f32 = row.iter().sum();
        total2 += f64::from(row_total);
    }

    println!("{:.2}", total1);
    println!("{:.2}", total2);
    println!("{:.2}", f64::from(total1) - total2);
    Ok(())
}
