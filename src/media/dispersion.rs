//! Default upload dispersion path.
//!
//! Uploads land in a two-level directory built from the first two
//! characters of the (normalised) file name, so `logo.png` lives under
//! `/l/o/`. Moving a file back out of a brand folder must use the same
//! derivation.

/// Lower-case the name and replace each run of characters outside
/// `[a-z0-9_.-]` with a single `_`.
///
/// A stem made only of underscores becomes `file`, keeping the extension.
pub fn normalize_upload_name(file_name: &str) -> String {
    let mut normalized = String::with_capacity(file_name.len());
    let mut in_invalid_run = false;
    for c in file_name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            normalized.push(c);
            in_invalid_run = false;
        } else if !in_invalid_run {
            normalized.push('_');
            in_invalid_run = true;
        }
    }

    let (stem, extension) = match normalized.rfind('.') {
        Some(dot) => (&normalized[..dot], Some(&normalized[dot + 1..])),
        None => (normalized.as_str(), None),
    };
    if !stem.is_empty() && stem.chars().all(|c| c == '_') {
        return match extension {
            Some(extension) => format!("file.{}", extension),
            None => "file".to_string(),
        };
    }
    normalized
}

/// Two-level dispersion subpath for `file_name`, e.g. `/l/o`.
///
/// A leading dot maps to `_`. Names shorter than two characters yield a
/// single level; an empty name yields the empty path.
pub fn dispersion_path(file_name: &str) -> String {
    normalize_upload_name(file_name)
        .chars()
        .take(2)
        .map(|c| if c == '.' { '_' } else { c })
        .fold(String::new(), |mut path, c| {
            path.push('/');
            path.push(c);
            path
        })
}
