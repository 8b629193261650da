// Adapters layer: concrete implementations for external systems (the
// GALFIT/ic binaries and the FITS container format).

pub mod fits;
pub mod galfit;
