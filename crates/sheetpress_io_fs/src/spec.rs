//! Persistence option models.

/// Options shared by [`crate::write_file_atomic`] and [`crate::copy_file_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecPersistOptions {
    /// Flush file contents to disk before the rename.
    pub if_sync: bool,
    /// Carry source permissions, timestamps and xattrs over on copy.
    ///
    /// Ignored by `write_file_atomic`, which has no source file.
    pub if_preserve_metadata: bool,
    /// Prefix of the staging file created next to the destination.
    pub prefix_staging: &'static str,
}

impl Default for SpecPersistOptions {
    fn default() -> Self {
        Self {
            if_sync: true,
            if_preserve_metadata: true,
            prefix_staging: ".sheetpress-",
        }
    }
}
