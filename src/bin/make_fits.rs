//! Write a small deterministic FITS file, handy for exercising the other
//! tools without real survey data.

use anyhow::{Context, Result};
use clap::Parser;
use fitsio::images::{ImageDescription, ImageType, WriteImage};
use fitsio::FitsFile;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "make_fits")]
#[command(about = "Write a 4x5 ramp image (1..20) to a FITS file")]
struct Args {
    /// Output path
    #[arg(default_value = "a.fits")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let data: Vec<i32> = (1..=20).collect();
    let description = ImageDescription {
        data_type: ImageType::Long,
        dimensions: &[4, 5],
    };

    let mut fptr = FitsFile::create(&args.out)
        .with_custom_primary(&description)
        .overwrite()
        .open()
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let hdu = fptr.primary_hdu()?;
    hdu.write_image(&mut fptr, &data)?;

    for row in data.chunks(5) {
        println!("{:?}", row);
    }
    Ok(())
}
