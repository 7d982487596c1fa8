use super::Error;
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// Largest length hint trusted when pre-sizing a buffer (256 MiB)
const MAX_TRUSTED_LEN: u64 = 1 << 28;

/// What kind of archive entry a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Everything collected from the input file set, in submission order
///
/// Collection is strictly single-pass and single-threaded: once [`finish`]
/// has been called, any further submission signals a synchronization bug in
/// the caller and fails the run. Nothing in here mutates after `finish`.
///
/// [`finish`]: ArchiveContents::finish
pub struct ArchiveContents {
    entries: Vec<(String, EntryKind)>,
    seen: HashSet<String>,
    raw_data: HashMap<String, Vec<u8>>,
    directories: HashSet<String>,
    finished: bool,
}

impl ArchiveContents {
    pub fn new() -> ArchiveContents {
        ArchiveContents {
            entries: Vec::new(),
            seen: HashSet::new(),
            raw_data: HashMap::new(),
            directories: HashSet::new(),
            finished: false,
        }
    }

    fn record(&mut self, path: &str, kind: EntryKind) -> Result<(), Error> {
        if self.finished {
            return Err(Error::CollectionFinished);
        }
        if !self.seen.insert(path.to_owned()) {
            return Err(Error::DuplicateEntry(path.to_owned()));
        }
        self.entries.push((path.to_owned(), kind));

        // Record every ancestor so implicit directories can be materialized
        let mut ancestor = parent_path(path);
        while let Some(dir) = ancestor {
            if !self.directories.insert(dir.to_owned()) {
                break;
            }
            ancestor = parent_path(dir);
        }
        Ok(())
    }

    /// Record a directory entry
    pub fn add_directory(&mut self, path: &str) -> Result<(), Error> {
        self.record(path, EntryKind::Directory)
    }

    /// Record a regular file, buffering its full contents
    ///
    /// The length hint is only used to pre-size the buffer, and only when it
    /// is plausible; a reported length outside `(0, 256 MiB]` cannot be
    /// trusted and the buffer grows dynamically instead.
    pub fn add_file(
        &mut self,
        path: &str,
        len_hint: Option<u64>,
        contents: &mut dyn Read,
    ) -> Result<(), Error> {
        self.record(path, EntryKind::File)?;

        let mut buf = match len_hint {
            Some(len) if len > 0 && len <= MAX_TRUSTED_LEN => Vec::with_capacity(len as usize),
            _ => Vec::new(),
        };
        contents.read_to_end(&mut buf)?;
        self.raw_data.insert(path.to_owned(), buf);
        Ok(())
    }

    /// End the collection phase; all later submissions fail
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Recorded entries in submission order
    pub fn entries(&self) -> impl Iterator<Item = (&str, EntryKind)> {
        self.entries.iter().map(|(path, kind)| (path.as_str(), *kind))
    }

    /// Raw bytes of every regular file, keyed by relative path
    pub fn raw_data(&self) -> &HashMap<String, Vec<u8>> {
        &self.raw_data
    }

    /// Every directory that has something under it
    pub fn directories(&self) -> &HashSet<String> {
        &self.directories
    }
}

impl Default for ArchiveContents {
    fn default() -> ArchiveContents {
        ArchiveContents::new()
    }
}

pub(crate) fn parent_path(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}

#[cfg(test)]
mod test {
    use super::{ArchiveContents, EntryKind, Error};

    #[test]
    fn duplicate_path_is_fatal() {
        let mut contents = ArchiveContents::new();
        contents.add_file("a.txt", None, &mut &b"one"[..]).unwrap();
        assert!(matches!(
            contents.add_file("a.txt", None, &mut &b"two"[..]),
            Err(Error::DuplicateEntry(_))
        ));
    }

    #[test]
    fn submission_after_finish_is_fatal() {
        let mut contents = ArchiveContents::new();
        contents.add_directory("dir").unwrap();
        contents.finish();
        assert!(matches!(
            contents.add_directory("other"),
            Err(Error::CollectionFinished)
        ));
        assert!(matches!(
            contents.add_file("late.txt", None, &mut &b""[..]),
            Err(Error::CollectionFinished)
        ));
    }

    #[test]
    fn ancestors_are_recorded() {
        let mut contents = ArchiveContents::new();
        contents
            .add_file("a/b/c/D.class", Some(4), &mut &b"\0\0\0\0"[..])
            .unwrap();
        assert!(contents.directories().contains("a"));
        assert!(contents.directories().contains("a/b"));
        assert!(contents.directories().contains("a/b/c"));
        assert!(!contents.directories().contains("a/b/c/D.class"));
    }

    #[test]
    fn entries_keep_submission_order() {
        let mut contents = ArchiveContents::new();
        contents.add_file("z.txt", None, &mut &b"z"[..]).unwrap();
        contents.add_directory("a").unwrap();
        contents.add_file("a/y.txt", None, &mut &b"y"[..]).unwrap();

        let order: Vec<_> = contents.entries().collect();
        assert_eq!(
            order,
            vec![
                ("z.txt", EntryKind::File),
                ("a", EntryKind::Directory),
                ("a/y.txt", EntryKind::File),
            ]
        );
    }

    #[test]
    fn implausible_length_hints_are_ignored() {
        let mut contents = ArchiveContents::new();
        // A hint way past 256 MiB must not pre-allocate; contents still land
        contents
            .add_file("big.bin", Some(u64::MAX), &mut &b"tiny"[..])
            .unwrap();
        assert_eq!(contents.raw_data()["big.bin"], b"tiny");
    }
}
