//! GALFIT parameter file ("feedme") patching.
//!
//! The feedme is line-oriented: `<key>) <value> [<flag>] [# comment]`.
//! Letter keys (A-Z) describe the fit setup and carry no fixed/free flag;
//! numeric keys are per-object parameters whose third column holds the
//! parameter fixed ("0") or lets GALFIT vary it ("1"). The same numeric key
//! appears once per modeled object, so records are addressed by
//! (key, occurrence).

use crate::utils::error::{GalfitError, Result};
use std::fs;
use std::path::Path;

/// Rewrite the value (and flag) of the `occurrence`-th record matching
/// `key`, preserving every other line byte for byte.
///
/// `occurrence` is 1-based, matching GALFIT's object numbering. The whole
/// file is rewritten in place; concurrent patchers on one file are unsafe.
pub fn patch_param(
    path: &Path,
    key: &str,
    value: &str,
    occurrence: usize,
    fixed: bool,
) -> Result<()> {
    if occurrence == 0 {
        return Err(GalfitError::ConfigError {
            message: format!("occurrence is 1-based, got 0 for key {})", key),
        });
    }

    let content = fs::read_to_string(path)?;
    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

    let prefix = format!("{})", key);
    let matches: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim().starts_with(&prefix))
        .map(|(i, _)| i)
        .collect();

    if matches.is_empty() {
        return Err(GalfitError::ConfigError {
            message: format!("no record matching {}) in {}", key, path.display()),
        });
    }
    let loc = *matches.get(occurrence - 1).ok_or_else(|| GalfitError::ConfigError {
        message: format!(
            "record {}) occurs {} time(s) in {}, occurrence {} requested",
            key,
            matches.len(),
            path.display(),
            occurrence
        ),
    })?;

    let (body, terminator) = split_terminator(&lines[loc]);
    let comment = body.find('#').map(|i| &body[i..]).unwrap_or("");
    lines[loc] = format!("{}{}", format_record(key, value, fixed, comment), terminator);

    fs::write(path, lines.concat())?;
    Ok(())
}

/// Split a line into its content and its original terminator so the
/// terminator (or its absence, on the last line) survives the rewrite.
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Setup parameters are single uppercase letters; everything else is a
/// per-object parameter.
fn is_letter_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

fn format_record(key: &str, value: &str, fixed: bool, comment: &str) -> String {
    if is_letter_key(key) {
        format!("{}) {}  {}", key, value, comment)
    } else {
        // 0 holds the parameter fixed, 1 lets it vary. GALFIT contract.
        format!("{}) {} {}  {}", key, value, if fixed { "0" } else { "1" }, comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
===============================================================================
# IMAGE and GALFIT CONTROL PARAMETERS
A) f606w_gal0.fits      # Input data image (FITS file)
B) imgblock.fits        # Output data image block
D) f606w_psf.fits       # Input PSF image
J) 26.563               # Magnitude photometric zeropoint

# Object number: 1
0) devauc               # object type
3) 18.0 0  # mag
4) 5.0 0  # radius

# Object number: 2
0) expdisk              # object type
3) 18.0 0  # mag
4) 5.0 0  # radius
";

    fn write_sample(dir: &TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("sim.feedme");
        fs::write(&path, text).unwrap();
        path
    }

    fn lines_of(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn second_occurrence_is_patched_and_first_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);

        patch_param(&path, "3", "19.5", 2, false).unwrap();

        let mags: Vec<String> = lines_of(&path)
            .into_iter()
            .filter(|l| l.trim().starts_with("3)"))
            .collect();
        assert_eq!(mags, vec!["3) 18.0 0  # mag", "3) 19.5 1  # mag"]);
    }

    #[test]
    fn patch_changes_exactly_one_line_and_keeps_line_count() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);
        let before = lines_of(&path);

        patch_param(&path, "4", "7.25", 1, true).unwrap();

        let after = lines_of(&path);
        assert_eq!(before.len(), after.len());
        let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(after[changed[0]], "4) 7.25 0  # radius");
    }

    #[test]
    fn letter_key_gets_no_flag_token() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);

        patch_param(&path, "A", "f814w_gal3.fits", 1, true).unwrap();

        let line = lines_of(&path)
            .into_iter()
            .find(|l| l.starts_with("A)"))
            .unwrap();
        assert_eq!(line, "A) f814w_gal3.fits  # Input data image (FITS file)");
    }

    #[test]
    fn flag_polarity_is_zero_fixed_one_free() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);

        patch_param(&path, "3", "20.0", 1, true).unwrap();
        assert!(lines_of(&path).contains(&"3) 20.0 0  # mag".to_string()));

        patch_param(&path, "3", "20.0", 1, false).unwrap();
        assert!(lines_of(&path).contains(&"3) 20.0 1  # mag".to_string()));
    }

    #[test]
    fn patching_current_value_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);
        let before = fs::read_to_string(&path).unwrap();

        patch_param(&path, "3", "18.0", 1, true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);

        let err = patch_param(&path, "99", "1.0", 1, true).unwrap_err();
        assert!(matches!(err, GalfitError::ConfigError { .. }));
    }

    #[test]
    fn occurrence_past_the_last_match_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);

        let err = patch_param(&path, "3", "1.0", 3, true).unwrap_err();
        assert!(matches!(err, GalfitError::ConfigError { .. }));
    }

    #[test]
    fn occurrence_zero_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, SAMPLE);

        let err = patch_param(&path, "3", "1.0", 0, true).unwrap_err();
        assert!(matches!(err, GalfitError::ConfigError { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = patch_param(Path::new("no/such/sim.feedme"), "A", "x", 1, true).unwrap_err();
        assert!(matches!(err, GalfitError::IoError(_)));
    }

    #[test]
    fn line_without_comment_still_gets_the_trailing_separator() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, "H) 1 200\nZ) 0\n");

        patch_param(&path, "H", "50 250", 1, true).unwrap();

        assert_eq!(lines_of(&path)[0], "H) 50 250  ");
    }

    #[test]
    fn absent_final_newline_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir, "A) old.fits  # input\nZ) 0  # mode");

        patch_param(&path, "Z", "1", 1, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "A) old.fits  # input\nZ) 1  # mode");
    }
}
