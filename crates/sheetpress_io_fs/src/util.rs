use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::spec::SpecPersistOptions;

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Directory that will hold the staging file for `path_file_dst`.
///
/// A bare file name stages in the current directory.
pub(crate) fn derive_parent_dir(path_file_dst: &Path) -> PathBuf {
    match path_file_dst.parent() {
        Some(path_parent) if !path_parent.as_os_str().is_empty() => path_parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub(crate) fn validate_destination_file(path_file_dst: &Path) -> Result<(), io::Error> {
    if path_file_dst.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Destination path is empty.",
        ));
    }
    if path_file_dst.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Destination is a directory, expected file: {}",
                path_file_dst.display()
            ),
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Staging

/// Create a staging file in the destination directory so the final rename
/// never crosses a filesystem boundary.
pub(crate) fn create_staging_file(
    path_file_dst: &Path,
    options: &SpecPersistOptions,
) -> Result<NamedTempFile, io::Error> {
    let path_dir_dst = derive_parent_dir(path_file_dst);
    Builder::new()
        .prefix(options.prefix_staging)
        .suffix(".part")
        .tempfile_in(&path_dir_dst)
        .map_err(|err| {
            io::Error::new(
                err.kind(),
                format!(
                    "Failed to create staging file in {} ({err})",
                    path_dir_dst.display()
                ),
            )
        })
}

/// Move a finished staging file onto `path_file_dst`, replacing any
/// existing file.
pub(crate) fn persist_staging_file(
    file_staging: NamedTempFile,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    file_staging
        .persist(path_file_dst)
        .map(|_| ())
        .map_err(|err| {
            io::Error::new(
                err.error.kind(),
                format!(
                    "Failed to move staging file into {} ({})",
                    path_file_dst.display(),
                    err.error
                ),
            )
        })
}

/// Give a freshly written file the permissions a plain `File::create`
/// would have produced, or those of the file it replaces.
///
/// Staging files are created owner-only.
pub(crate) fn apply_output_permissions(
    path_file_staging: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    if let Ok(stat_dst) = fs::metadata(path_file_dst) {
        return fs::set_permissions(path_file_staging, stat_dst.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path_file_staging, fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Metadata

pub(crate) fn copy_metadata(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    #[cfg(target_os = "linux")]
    {
        apply_metadata_linux(path_file_src, path_file_dst, &stat_src)?;
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn apply_metadata_linux(
    path_file_src: &Path,
    path_file_dst: &Path,
    stat_src: &fs::Metadata,
) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let file_time_access = FileTime::from_last_access_time(stat_src);
    let file_time_modify = FileTime::from_last_modification_time(stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(err) => {
            log::debug!(
                "Skipping xattr copy for {}: {err}",
                path_file_src.display()
            );
            return;
        }
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        if let Err(err) = xattr::set(path_file_dst, &name, &raw_value) {
            log::debug!("Failed to copy xattr {name:?}: {err}");
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::derive_parent_dir;

    #[test]
    fn derive_parent_dir_defaults_to_current_dir_for_bare_names() {
        assert_eq!(derive_parent_dir(Path::new("out.xlsx")), PathBuf::from("."));
        assert_eq!(
            derive_parent_dir(Path::new("tmp/out.xlsx")),
            PathBuf::from("tmp")
        );
    }
}
