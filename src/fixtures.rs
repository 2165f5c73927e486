#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    use crate::error::SourceError;
    use crate::raw::RawValue;
    use crate::source::{Source, SourceKind};

    /// Owned argument vector from string literals.
    pub fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Write `content` to `name` inside a fresh temp dir. Keep the dir alive
    /// for as long as the file is needed.
    pub fn write_file(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    /// Calls observed on a [`RecordingSource`].
    #[derive(Debug, Default)]
    pub struct Calls {
        pub opened: usize,
        pub closed: usize,
        pub lookups: Vec<String>,
    }

    /// In-memory source that records its lifecycle and can be told to fail.
    pub struct RecordingSource {
        pub kind: SourceKind,
        pub values: Vec<(String, RawValue)>,
        pub fail_open: bool,
        pub fail_close: bool,
        pub calls: Rc<RefCell<Calls>>,
    }

    impl RecordingSource {
        pub fn new(kind: SourceKind, values: &[(&str, RawValue)]) -> Self {
            Self {
                kind,
                values: values
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                fail_open: false,
                fail_close: false,
                calls: Rc::default(),
            }
        }
    }

    impl Source for RecordingSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn origin(&self) -> String {
            format!("recording {}", self.kind)
        }

        fn open(&mut self) -> Result<(), SourceError> {
            self.calls.borrow_mut().opened += 1;
            if self.fail_open {
                return Err(SourceError::NotAMapping {
                    path: PathBuf::from("recording"),
                });
            }
            Ok(())
        }

        fn get(&self, key: &str) -> Result<Option<RawValue>, SourceError> {
            self.calls.borrow_mut().lookups.push(key.to_string());
            Ok(self
                .values
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()))
        }

        fn close(&mut self) -> Result<(), SourceError> {
            self.calls.borrow_mut().closed += 1;
            if self.fail_close {
                return Err(SourceError::NotAMapping {
                    path: PathBuf::from("recording"),
                });
            }
            Ok(())
        }
    }
}
