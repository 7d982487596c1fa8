use crate::jvm::class_file::ClassNode;
use crate::jvm::Error;
use crate::util::LruCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// How many parsed summaries are kept live at once
const CACHE_CAPACITY: usize = 64;

/// Lazily parses classes out of the raw contents of the archive under rebuild
///
/// Parsing the same class twice is wasted work during transformation, so
/// summaries are memoized behind an LRU bound. Summaries are shared through
/// `Rc`, which keeps a handle valid even after its cache slot is evicted.
/// Single-threaded by design; the interior mutability is not synchronized.
pub struct ClassNodeCache<'a> {
    raw_data: &'a HashMap<String, Vec<u8>>,
    cache: RefCell<LruCache<String, Rc<ClassNode>>>,
}

impl<'a> ClassNodeCache<'a> {
    pub fn new(raw_data: &'a HashMap<String, Vec<u8>>) -> ClassNodeCache<'a> {
        ClassNodeCache {
            raw_data,
            cache: RefCell::new(LruCache::new(CACHE_CAPACITY)),
        }
    }

    /// Look up a class by its internal name
    ///
    /// `Ok(None)` is the designed "not found" outcome, since the archive may
    /// legitimately reference classes outside itself. Array types are also
    /// reported absent (with a diagnostic) since they never need structural
    /// resolution; a dotted name, on the other hand, is a bug in the caller
    /// and fails the run.
    pub fn lookup(&self, name: &str) -> Result<Option<Rc<ClassNode>>, Error> {
        if name.starts_with('[') {
            log::warn!(
                "Attempted to query the class node of array type '{}'; consider it a bug",
                name
            );
            return Ok(None);
        }
        if name.contains('.') {
            return Err(Error::DottedClassName(name.to_owned()));
        }

        if let Some(node) = self.cache.borrow_mut().get(name) {
            return Ok(Some(Rc::clone(node)));
        }

        let bytes = match self.raw_data.get(&format!("{}.class", name)) {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let node = Rc::new(ClassNode::parse(bytes.clone())?);
        self.cache
            .borrow_mut()
            .insert(name.to_owned(), Rc::clone(&node));
        Ok(Some(node))
    }

    /// Number of summaries currently held live
    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }
}
