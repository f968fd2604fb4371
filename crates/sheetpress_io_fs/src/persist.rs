//! Atomic persistence of whole files.
//!
//! Both entry points stage the content in a sibling file of the destination
//! and rename it into place, so readers of the destination path observe
//! either the previous file or the complete new one, never a partial write.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::spec::SpecPersistOptions;
use crate::util::{
    apply_output_permissions, copy_metadata, create_staging_file, persist_staging_file,
    validate_destination_file,
};

/// Write `v_bytes` to `path_file_dst`, replacing an existing file atomically.
///
/// On error the destination is left untouched and the staging file is
/// removed.
pub fn write_file_atomic<P>(
    path_file_dst: P,
    v_bytes: &[u8],
    options: &SpecPersistOptions,
) -> Result<(), io::Error>
where
    P: AsRef<Path>,
{
    let path_file_dst = path_file_dst.as_ref();
    validate_destination_file(path_file_dst)?;

    let mut file_staging = create_staging_file(path_file_dst, options)?;
    file_staging.write_all(v_bytes)?;
    file_staging.flush()?;
    if options.if_sync {
        file_staging.as_file().sync_all()?;
    }
    apply_output_permissions(file_staging.path(), path_file_dst)?;

    persist_staging_file(file_staging, path_file_dst)?;
    log::debug!(
        "Persisted {} bytes to {}",
        v_bytes.len(),
        path_file_dst.display()
    );
    Ok(())
}

/// Copy `path_file_src` byte-for-byte to `path_file_dst`, replacing an
/// existing file atomically. Returns the number of bytes copied.
///
/// `src` and `dst` may name the same file.
pub fn copy_file_atomic<P, Q>(
    path_file_src: P,
    path_file_dst: Q,
    options: &SpecPersistOptions,
) -> Result<u64, io::Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_file_src = path_file_src.as_ref();
    let path_file_dst = path_file_dst.as_ref();
    validate_destination_file(path_file_dst)?;

    let mut file_src = File::open(path_file_src)?;
    let mut file_staging = create_staging_file(path_file_dst, options)?;
    let n_bytes = io::copy(&mut file_src, file_staging.as_file_mut())?;
    drop(file_src);

    if options.if_sync {
        file_staging.as_file().sync_all()?;
    }
    if options.if_preserve_metadata {
        copy_metadata(path_file_src, file_staging.path())?;
    } else {
        apply_output_permissions(file_staging.path(), path_file_dst)?;
    }

    persist_staging_file(file_staging, path_file_dst)?;
    log::debug!(
        "Copied {n_bytes} bytes from {} to {}",
        path_file_src.display(),
        path_file_dst.display()
    );
    Ok(n_bytes)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::{copy_file_atomic, write_file_atomic};
    use crate::spec::SpecPersistOptions;

    fn list_file_names(path_dir: &Path) -> Vec<String> {
        let mut l_names: Vec<String> = fs::read_dir(path_dir)
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        l_names.sort();
        l_names
    }

    #[test]
    fn write_file_atomic_creates_and_overwrites() {
        let tmp = TempDir::new().expect("tempdir");
        let path_out = tmp.path().join("out.bin");

        write_file_atomic(&path_out, b"first", &SpecPersistOptions::default()).expect("write 1");
        assert_eq!(fs::read(&path_out).expect("read"), b"first");

        write_file_atomic(&path_out, b"second!", &SpecPersistOptions::default())
            .expect("write 2");
        assert_eq!(fs::read(&path_out).expect("read"), b"second!");
        assert_eq!(list_file_names(tmp.path()), vec!["out.bin".to_string()]);
    }

    #[test]
    fn write_file_atomic_missing_parent_leaves_nothing_behind() {
        let tmp = TempDir::new().expect("tempdir");
        let path_out = tmp.path().join("missing").join("out.bin");

        let err = write_file_atomic(&path_out, b"x", &SpecPersistOptions::default())
            .expect_err("parent does not exist");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(!path_out.exists());
        assert!(list_file_names(tmp.path()).is_empty());
    }

    #[test]
    fn write_file_atomic_rejects_directory_destination() {
        let tmp = TempDir::new().expect("tempdir");
        let err = write_file_atomic(tmp.path(), b"x", &SpecPersistOptions::default())
            .expect_err("destination is a dir");
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn copy_file_atomic_is_byte_identical() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("src.bin");
        let path_dst = tmp.path().join("dst.bin");
        let v_payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(&path_src, &v_payload).expect("write src");
        fs::write(&path_dst, b"stale").expect("write stale dst");

        let n_bytes = copy_file_atomic(&path_src, &path_dst, &SpecPersistOptions::default())
            .expect("copy");
        assert_eq!(n_bytes, v_payload.len() as u64);
        assert_eq!(fs::read(&path_dst).expect("read dst"), v_payload);
        assert_eq!(
            list_file_names(tmp.path()),
            vec!["dst.bin".to_string(), "src.bin".to_string()]
        );
    }

    #[test]
    fn copy_file_atomic_onto_itself_keeps_content() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("same.bin");
        fs::write(&path_src, b"payload").expect("write src");

        copy_file_atomic(&path_src, &path_src, &SpecPersistOptions::default()).expect("copy");
        assert_eq!(fs::read(&path_src).expect("read"), b"payload");
    }

    #[test]
    fn copy_file_atomic_missing_source_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dst = tmp.path().join("dst.bin");
        let err = copy_file_atomic(
            tmp.path().join("nope.bin"),
            &path_dst,
            &SpecPersistOptions::default(),
        )
        .expect_err("missing source");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(!path_dst.exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn copy_file_atomic_preserves_mtime() {
        use filetime::{FileTime, set_file_mtime};

        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("src.bin");
        let path_dst = tmp.path().join("dst.bin");
        fs::write(&path_src, b"abc").expect("write src");
        let file_time = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(&path_src, file_time).expect("set mtime");

        copy_file_atomic(&path_src, &path_dst, &SpecPersistOptions::default()).expect("copy");
        let stat_dst = fs::metadata(&path_dst).expect("stat dst");
        assert_eq!(FileTime::from_last_modification_time(&stat_dst), file_time);
    }
}
