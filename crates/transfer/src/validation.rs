use std::path::{Component, Path};

use crate::TransferError;

/// Checks that an uploaded `filename` names a single file.
///
/// The name must be exactly one normal path component and may not carry a
/// separator of either platform, so joining it onto the upload directory
/// always lands directly inside that directory.
pub fn validate_file_name(name: &str) -> Result<(), TransferError> {
    if name.contains(['/', '\\']) {
        return Err(TransferError::InvalidPath(format!(
            "file name contains a separator: {name:?}"
        )));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(TransferError::InvalidPath(format!(
            "not a plain file name: {name:?}"
        ))),
    }
}
