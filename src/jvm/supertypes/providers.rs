use crate::jvm::class_file::ClassNode;
use crate::jvm::node_cache::ClassNodeCache;
use crate::jvm::supertypes::{ClassWrapper, WrapperPool, WrapperProvider};
use crate::jvm::{BinaryName, Error};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Resolves descriptors out of the archive being rebuilt
///
/// Highest-priority source: a class should be judged by the bytes that will
/// actually ship, not by whatever else happens to be on the classpath.
pub struct ArchiveWrapperProvider<'a> {
    nodes: &'a ClassNodeCache<'a>,
}

impl<'a> ArchiveWrapperProvider<'a> {
    pub fn new(nodes: &'a ClassNodeCache<'a>) -> ArchiveWrapperProvider<'a> {
        ArchiveWrapperProvider { nodes }
    }
}

impl<'a> WrapperProvider for ArchiveWrapperProvider<'a> {
    fn provide(&self, name: &str, _pool: &WrapperPool) -> Result<Option<ClassWrapper>, Error> {
        Ok(self.nodes.lookup(name)?.map(|node| ClassWrapper::of_node(&node)))
    }
}

/// Descriptors indexed up front from the compile-time classpath
pub struct ClasspathWrapperProvider {
    wrappers: HashMap<String, ClassWrapper>,
}

impl ClasspathWrapperProvider {
    /// Index the given classpath entries, reading only class-file headers
    ///
    /// Directories, non-class entries, `module-info.class`, and anything
    /// under a multi-release `META-INF/versions/` path are skipped. Indexing
    /// is best-effort: an unreadable entry is logged and dropped rather than
    /// failing the run.
    pub fn scan<P: AsRef<Path>>(entries: &[P]) -> ClasspathWrapperProvider {
        let mut wrappers: HashMap<String, ClassWrapper> = HashMap::new();

        for entry in entries {
            let path = entry.as_ref();
            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy(),
                None => continue,
            };
            if path.is_dir()
                || !file_name.ends_with(".class")
                || file_name == "module-info.class"
                || path.to_string_lossy().contains("META-INF/versions/")
            {
                continue;
            }

            let node = match fs::read(path)
                .map_err(Error::IoError)
                .and_then(ClassNode::parse)
            {
                Ok(node) => node,
                Err(err) => {
                    log::warn!(
                        "Unexpected error while analyzing compile classpath entry '{}': {:?}",
                        path.display(),
                        err
                    );
                    continue;
                }
            };

            match wrappers.entry(node.name.as_str().to_owned()) {
                Entry::Occupied(_) => log::warn!(
                    "Duplicate class '{}' on the provided compile-time classpath \
                     (one of them is provided by '{}')",
                    node.name,
                    path.display()
                ),
                Entry::Vacant(vacant) => {
                    vacant.insert(ClassWrapper::of_node(&node));
                }
            }
        }

        ClasspathWrapperProvider { wrappers }
    }

    /// Number of classes indexed
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }
}

impl WrapperProvider for ClasspathWrapperProvider {
    fn provide(&self, name: &str, _pool: &WrapperPool) -> Result<Option<ClassWrapper>, Error> {
        Ok(self.wrappers.get(name).cloned())
    }
}

/// Built-in descriptors for the platform's bootstrap classes
///
/// A standalone repackager has no running platform to reflect on, so the
/// last-resort provider carries the standard-library hierarchy that
/// downgraded bytecode actually leans on. Lookups that miss here are
/// genuinely unknown.
pub struct PlatformWrapperProvider {
    wrappers: HashMap<String, ClassWrapper>,
}

impl PlatformWrapperProvider {
    pub fn new() -> PlatformWrapperProvider {
        fn class(name: BinaryName, super_name: BinaryName, interfaces: &[BinaryName]) -> ClassWrapper {
            ClassWrapper::new(name, Some(super_name), interfaces.to_vec(), false)
        }
        fn interface(name: BinaryName) -> ClassWrapper {
            ClassWrapper::new(name, Some(BinaryName::OBJECT), vec![], true)
        }

        let classes = vec![
            ClassWrapper::new(BinaryName::OBJECT, None, vec![], false),
            interface(BinaryName::SERIALIZABLE),
            interface(BinaryName::CLONEABLE),
            interface(BinaryName::COMPARABLE),
            interface(BinaryName::CHARSEQUENCE),
            class(
                BinaryName::STRING,
                BinaryName::OBJECT,
                &[
                    BinaryName::SERIALIZABLE,
                    BinaryName::COMPARABLE,
                    BinaryName::CHARSEQUENCE,
                ],
            ),
            class(
                BinaryName::STRINGBUILDER,
                BinaryName::OBJECT,
                &[BinaryName::SERIALIZABLE, BinaryName::CHARSEQUENCE],
            ),
            class(BinaryName::CLASS, BinaryName::OBJECT, &[BinaryName::SERIALIZABLE]),
            class(BinaryName::NUMBER, BinaryName::OBJECT, &[BinaryName::SERIALIZABLE]),
            class(BinaryName::INTEGER, BinaryName::NUMBER, &[BinaryName::COMPARABLE]),
            class(BinaryName::LONG, BinaryName::NUMBER, &[BinaryName::COMPARABLE]),
            class(BinaryName::FLOAT, BinaryName::NUMBER, &[BinaryName::COMPARABLE]),
            class(BinaryName::DOUBLE, BinaryName::NUMBER, &[BinaryName::COMPARABLE]),
            class(
                BinaryName::BOOLEAN,
                BinaryName::OBJECT,
                &[BinaryName::SERIALIZABLE, BinaryName::COMPARABLE],
            ),
            class(
                BinaryName::CHARACTER,
                BinaryName::OBJECT,
                &[BinaryName::SERIALIZABLE, BinaryName::COMPARABLE],
            ),
            class(BinaryName::MATH, BinaryName::OBJECT, &[]),
            class(BinaryName::SYSTEM, BinaryName::OBJECT, &[]),
            class(BinaryName::RECORD, BinaryName::OBJECT, &[]),
            class(BinaryName::THROWABLE, BinaryName::OBJECT, &[BinaryName::SERIALIZABLE]),
            class(BinaryName::ERROR, BinaryName::THROWABLE, &[]),
            class(BinaryName::ASSERTIONERROR, BinaryName::ERROR, &[]),
            class(BinaryName::EXCEPTION, BinaryName::THROWABLE, &[]),
            class(BinaryName::RUNTIMEEXCEPTION, BinaryName::EXCEPTION, &[]),
            class(
                BinaryName::ILLEGALARGUMENTEXCEPTION,
                BinaryName::RUNTIMEEXCEPTION,
                &[],
            ),
            class(
                BinaryName::ILLEGALSTATEEXCEPTION,
                BinaryName::RUNTIMEEXCEPTION,
                &[],
            ),
            class(
                BinaryName::ARITHMETICEXCEPTION,
                BinaryName::RUNTIMEEXCEPTION,
                &[],
            ),
            class(
                BinaryName::NULLPOINTEREXCEPTION,
                BinaryName::RUNTIMEEXCEPTION,
                &[],
            ),
        ];

        PlatformWrapperProvider {
            wrappers: classes
                .into_iter()
                .map(|wrapper| (wrapper.name.as_str().to_owned(), wrapper))
                .collect(),
        }
    }
}

impl Default for PlatformWrapperProvider {
    fn default() -> PlatformWrapperProvider {
        PlatformWrapperProvider::new()
    }
}

impl WrapperProvider for PlatformWrapperProvider {
    fn provide(&self, name: &str, _pool: &WrapperPool) -> Result<Option<ClassWrapper>, Error> {
        Ok(self.wrappers.get(name).cloned())
    }
}

#[cfg(test)]
mod test {
    use super::{ClasspathWrapperProvider, PlatformWrapperProvider};
    use crate::jvm::class_file::ClassNode;
    use crate::jvm::supertypes::{WrapperPool, WrapperProvider};
    use crate::jvm::{BinaryName, ClassAccessFlags};
    use std::fs;
    use std::path::PathBuf;
    use typed_arena::Arena;

    fn write_class(dir: &std::path::Path, file: &str, name: &str, super_name: BinaryName) -> PathBuf {
        let node = ClassNode::synthesize(
            BinaryName::from_string(name.to_owned()).unwrap(),
            Some(super_name),
            vec![],
            ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            52,
        );
        let path = dir.join(file);
        fs::write(&path, node.bytes()).unwrap();
        path
    }

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("retrojar-tests")
            .join(format!("{}-{}", test, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn platform_provider_knows_the_bootstrap_hierarchy() {
        let arena = Arena::new();
        let mut pool = WrapperPool::new(&arena);
        pool.add_provider(Box::new(PlatformWrapperProvider::new()));

        let integer = pool.get("java/lang/Integer").unwrap();
        assert_eq!(integer.super_name, Some(BinaryName::NUMBER));

        let string = pool.get("java/lang/String").unwrap();
        let npe = pool.get("java/lang/NullPointerException").unwrap();
        assert_eq!(
            pool.common_superclass(string, npe).unwrap().name,
            BinaryName::OBJECT
        );
    }

    #[test]
    fn classpath_scan_first_entry_wins() {
        let dir = scratch_dir("first-wins");
        let first = write_class(&dir, "First.class", "dup/Same", BinaryName::THROWABLE);
        let second = write_class(&dir, "Second.class", "dup/Same", BinaryName::OBJECT);

        let provider = ClasspathWrapperProvider::scan(&[first, second]);
        assert_eq!(provider.len(), 1);

        let arena = Arena::new();
        let pool = WrapperPool::new(&arena);
        let wrapper = provider.provide("dup/Same", &pool).unwrap().unwrap();
        assert_eq!(wrapper.super_name, Some(BinaryName::THROWABLE));
    }

    #[test]
    fn classpath_scan_skips_irrelevant_entries() {
        let dir = scratch_dir("skips");
        fs::create_dir_all(dir.join("META-INF/versions/9")).unwrap();
        let versioned = write_class(
            &dir.join("META-INF/versions/9"),
            "Hidden.class",
            "pkg/Hidden",
            BinaryName::OBJECT,
        );
        let module_info = write_class(&dir, "module-info.class", "module-info", BinaryName::OBJECT);
        let text = dir.join("notes.txt");
        fs::write(&text, b"not a class").unwrap();
        let plain = write_class(&dir, "Plain.class", "pkg/Plain", BinaryName::OBJECT);

        let provider =
            ClasspathWrapperProvider::scan(&[versioned, module_info, text, plain, dir.clone()]);
        assert_eq!(provider.len(), 1);

        let arena = Arena::new();
        let pool = WrapperPool::new(&arena);
        assert!(provider.provide("pkg/Plain", &pool).unwrap().is_some());
        assert!(provider.provide("pkg/Hidden", &pool).unwrap().is_none());
    }

    #[test]
    fn classpath_scan_tolerates_garbage() {
        let dir = scratch_dir("garbage");
        let broken = dir.join("Broken.class");
        fs::write(&broken, b"\xCA\xFE\x00\x00truncated").unwrap();

        let provider = ClasspathWrapperProvider::scan(&[broken]);
        assert!(provider.is_empty());
    }
}
