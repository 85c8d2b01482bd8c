use std::path::Path;

use crate::utils::errors::AppError;

/// Normalizes a path handed over by the upload collaborator into the relative
/// location persisted with the record: `public/<kind>/<basename>`.
///
/// Only the file name of the supplied path is kept, so a client cannot smuggle
/// directory components into the stored path. The file contents themselves are
/// never opened here.
pub fn normalize_upload_path(kind: &str, supplied: &str) -> Result<String, AppError> {
    let basename = Path::new(supplied)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("Invalid {} file path", kind)))?;

    Ok(format!("public/{}/{}", kind, basename))
}
