use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::StripError;

pub struct Document {
    path: PathBuf,
    pub content: String,
}

impl Document {
    pub fn at_path(path: PathBuf) -> Result<Self, StripError> {
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Self { path, content }),
            Err(e) => Err(StripError::io(path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines including their terminators, so joining them gives back the file.
    pub fn lines(&self) -> Vec<&str> {
        self.content.split_inclusive('\n').collect()
    }

    /// Atomically write `content` over the file, keeping its permissions.
    /// The temporary file is removed again if any step fails.
    pub fn atomic_overwrite(&self, content: &str) -> Result<(), StripError> {
        if self.path.file_name().is_none() {
            return Err(StripError::io(
                &self.path,
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            ));
        }
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StripError::io(parent, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StripError::io(tmp.path(), e))?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| StripError::io(tmp.path(), e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| StripError::io(&self.path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn lines_round_trip_the_content() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond\n\nno newline").unwrap();

        let document = Document::at_path(file.path().to_path_buf()).unwrap();

        assert_eq!(
            document.lines(),
            vec!["first\r\n", "second\n", "\n", "no newline"]
        );
        assert_eq!(document.lines().concat(), document.content);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge-base.tsx");

        let err = Document::at_path(path.clone()).err().unwrap();

        assert!(matches!(err, StripError::Io { path: ref p, .. } if p == &path));
    }

    #[test]
    fn overwrite_replaces_content_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.tsx");
        fs::write(&path, "old\n").unwrap();

        let document = Document::at_path(path.clone()).unwrap();
        document.atomic_overwrite("new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_rename_leaves_target_and_directory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a rename
        let path = dir.path().join("page.tsx");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner.txt"), "inner\n").unwrap();

        let document = Document {
            path: path.clone(),
            content: "old\n".to_string(),
        };
        let err = document.atomic_overwrite("new\n").unwrap_err();

        assert!(matches!(err, StripError::Io { path: ref p, .. } if p == &path));
        assert_eq!(fs::read_to_string(path.join("inner.txt")).unwrap(), "inner\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn unwritable_parent_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("knowledge-base.tsx");
        fs::write(&not_a_dir, "original\n").unwrap();

        let document = Document {
            path: not_a_dir.join("page.tsx"),
            content: String::new(),
        };
        let err = document.atomic_overwrite("new\n").unwrap_err();

        assert!(matches!(err, StripError::Io { .. }));
        assert_eq!(fs::read_to_string(&not_a_dir).unwrap(), "original\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.tsx");
        fs::write(&path, "old\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        Document::at_path(path.clone())
            .unwrap()
            .atomic_overwrite("new\n")
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
