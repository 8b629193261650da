//! FITS image plane I/O on top of the `fitsio` bindings.
//!
//! GALFIT artifacts are multi-extension files holding one 2-D plane per
//! HDU; planes are addressed by integer index with the primary HDU at 0.

use crate::domain::model::OverwritePolicy;
use crate::utils::error::{GalfitError, Result};
use fitsio::hdu::HduInfo;
use fitsio::images::{ImageDescription, ImageType, ReadImage, WriteImage};
use fitsio::FitsFile;
use ndarray::Array2;
use std::path::Path;

/// A single 2-D image plane, pixels in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub data: Array2<f64>,
}

impl Plane {
    /// (rows, columns), i.e. (NAXIS2, NAXIS1).
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// Read plane `index` from a FITS file.
pub fn read_plane(path: &Path, index: usize) -> Result<Plane> {
    let mut fptr = FitsFile::open(path)?;
    let hdu = fptr.hdu(index)?;

    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        _ => {
            return Err(GalfitError::ProcessingError {
                message: format!("HDU {} of {} is not an image", index, path.display()),
            })
        }
    };
    if shape.len() != 2 {
        return Err(GalfitError::ProcessingError {
            message: format!(
                "expected a 2-D plane in HDU {} of {}, got {} axes",
                index,
                path.display(),
                shape.len()
            ),
        });
    }

    let pixels: Vec<f64> = hdu.read_image(&mut fptr)?;
    // fitsio reports shape in row-major order: [NAXIS2, NAXIS1]
    let data = Array2::from_shape_vec((shape[0], shape[1]), pixels).map_err(|e| {
        GalfitError::ProcessingError {
            message: format!("pixel count mismatch in {}: {}", path.display(), e),
        }
    })?;
    Ok(Plane { data })
}

/// Write `plane` as the primary HDU of a new FITS file.
pub fn write_plane(path: &Path, plane: &Plane, overwrite: OverwritePolicy) -> Result<()> {
    if path.exists() && overwrite == OverwritePolicy::Never {
        return Err(GalfitError::OutputExistsError {
            path: path.to_path_buf(),
        });
    }

    let (rows, cols) = plane.shape();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[rows, cols],
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .overwrite()
        .open()?;
    let hdu = fptr.primary_hdu()?;
    let pixels: Vec<f64> = plane.data.iter().copied().collect();
    hdu.write_image(&mut fptr, &pixels)?;
    Ok(())
}

/// Read a floating point key from the primary header.
pub fn read_header_f64(path: &Path, key: &str) -> Result<f64> {
    let mut fptr = FitsFile::open(path)?;
    let hdu = fptr.primary_hdu()?;
    let value: f64 = hdu.read_key(&mut fptr, key)?;
    Ok(value)
}

/// Element-wise sum of two equally shaped planes.
pub fn composite(a: &Plane, b: &Plane) -> Result<Plane> {
    if a.shape() != b.shape() {
        return Err(GalfitError::ShapeMismatchError {
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(Plane {
        data: &a.data + &b.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::TempDir;

    #[test]
    fn composite_adds_element_wise() {
        let a = Plane {
            data: array![[1.0, 2.0], [3.0, 4.0]],
        };
        let b = Plane {
            data: array![[0.5, 0.5], [0.5, -4.0]],
        };

        let sum = composite(&a, &b).unwrap();
        assert_eq!(sum.data, array![[1.5, 2.5], [3.5, 0.0]]);
    }

    #[test]
    fn composite_rejects_shape_mismatch() {
        let a = Plane {
            data: Array2::zeros((2, 3)),
        };
        let b = Plane {
            data: Array2::zeros((3, 2)),
        };

        let err = composite(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            GalfitError::ShapeMismatchError {
                left: (2, 3),
                right: (3, 2)
            }
        ));
    }

    #[test]
    fn write_then_read_preserves_pixels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plane.fits");
        let plane = Plane {
            data: array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        };

        write_plane(&path, &plane, OverwritePolicy::Never).unwrap();
        let back = read_plane(&path, 0).unwrap();

        assert_eq!(back.shape(), (2, 3));
        assert_eq!(back.data, plane.data);
    }

    #[test]
    fn never_policy_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plane.fits");
        let plane = Plane {
            data: Array2::zeros((2, 2)),
        };

        write_plane(&path, &plane, OverwritePolicy::Never).unwrap();
        let err = write_plane(&path, &plane, OverwritePolicy::Never).unwrap_err();
        assert!(matches!(err, GalfitError::OutputExistsError { .. }));
    }

    #[test]
    fn always_policy_replaces_existing_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plane.fits");

        let first = Plane {
            data: Array2::zeros((2, 2)),
        };
        let second = Plane {
            data: Array2::from_elem((2, 2), 9.0),
        };

        write_plane(&path, &first, OverwritePolicy::Always).unwrap();
        write_plane(&path, &second, OverwritePolicy::Always).unwrap();

        assert_eq!(read_plane(&path, 0).unwrap().data, second.data);
    }

    #[test]
    fn missing_header_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plane.fits");
        let plane = Plane {
            data: Array2::zeros((2, 2)),
        };
        write_plane(&path, &plane, OverwritePolicy::Never).unwrap();

        assert!(read_header_f64(&path, "MAG").is_err());
    }
}
