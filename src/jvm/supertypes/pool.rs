use crate::jvm::class_file::SupertypeOracle;
use crate::jvm::supertypes::ClassWrapper;
use crate::jvm::{BinaryName, Error};
use elsa::FrozenMap;
use std::collections::HashSet;
use typed_arena::Arena;

/// One source of class descriptors
///
/// Providers are consulted in registration order until one produces a value.
/// The pool is passed back in so a provider may recursively resolve other
/// names through the full chain.
pub trait WrapperProvider {
    fn provide(&self, name: &str, pool: &WrapperPool) -> Result<Option<ClassWrapper>, Error>;
}

/// Memoizing, multi-source resolver over the lazily discovered hierarchy
///
/// Descriptors are arena-allocated: once a name resolves, the same
/// `&ClassWrapper` is handed out for every later query, and nothing is ever
/// invalidated for the lifetime of the pool. Single-threaded by design; the
/// memo table is not synchronized.
pub struct WrapperPool<'p> {
    arena: &'p Arena<ClassWrapper>,
    wrappers: FrozenMap<String, &'p ClassWrapper>,
    providers: Vec<Box<dyn WrapperProvider + 'p>>,
}

impl<'p> WrapperPool<'p> {
    pub fn new(arena: &'p Arena<ClassWrapper>) -> WrapperPool<'p> {
        WrapperPool {
            arena,
            wrappers: FrozenMap::new(),
            providers: Vec::new(),
        }
    }

    /// Append a provider to the chain (lowest priority so far)
    pub fn add_provider(&mut self, provider: Box<dyn WrapperProvider + 'p>) {
        self.providers.push(provider);
    }

    /// Resolve a name, reporting expected absence as `None`
    pub fn try_get(&self, name: &str) -> Result<Option<&ClassWrapper>, Error> {
        if let Some(wrapper) = self.wrappers.get(name) {
            return Ok(Some(wrapper));
        }

        for provider in &self.providers {
            if let Some(wrapper) = provider.provide(name, self)? {
                // A recursive resolution may have beaten us to the table;
                // the first descriptor in wins
                if let Some(existing) = self.wrappers.get(name) {
                    return Ok(Some(existing));
                }
                let wrapper: &'p ClassWrapper = self.arena.alloc(wrapper);
                return Ok(Some(self.wrappers.insert(name.to_owned(), wrapper)));
            }
        }

        Ok(None)
    }

    /// Resolve a name; exhausting the provider chain is fatal
    pub fn get(&self, name: &str) -> Result<&ClassWrapper, Error> {
        self.try_get(name)?
            .ok_or_else(|| Error::UnknownClass(name.to_owned()))
    }

    /// Is `sub` the named class, or a transitive subclass of it?
    ///
    /// Only the single-superclass chain is walked; interface edges do not
    /// participate in the verifier's merge lattice.
    fn descends_from<'a>(&'a self, sub: &'a ClassWrapper, ancestor: &str) -> Result<bool, Error> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = sub;
        loop {
            if current.name.as_str() == ancestor {
                return Ok(true);
            }
            if !visited.insert(current.name.as_str()) {
                return Err(Error::HierarchyCycle(sub.name.as_str().to_owned()));
            }
            match &current.super_name {
                Some(super_name) => current = self.get(super_name.as_str())?,
                None => return Ok(false),
            }
        }
    }

    /// Least upper bound of two classes, per the verifier's merge rule
    ///
    /// Interfaces participate in the merge lattice only as subtypes of
    /// `java/lang/Object`, so any interface operand short-circuits there.
    /// Identical inputs always produce the identical result regardless of
    /// call order: the memoized hierarchy never changes under us.
    pub fn common_superclass<'a>(
        &'a self,
        a: &'a ClassWrapper,
        b: &'a ClassWrapper,
    ) -> Result<&'a ClassWrapper, Error> {
        if a == b {
            return Ok(a);
        }
        if a.is_interface || b.is_interface {
            return self.get(BinaryName::OBJECT.as_str());
        }

        // Climb `a`'s superclass chain until `b` descends from the candidate;
        // the walk terminates at the root, whose chain ends in `None`
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = a;
        loop {
            if self.descends_from(b, current.name.as_str())? {
                return Ok(current);
            }
            if !visited.insert(current.name.as_str()) {
                return Err(Error::HierarchyCycle(a.name.as_str().to_owned()));
            }
            match &current.super_name {
                Some(super_name) => current = self.get(super_name.as_str())?,
                None => return Ok(current),
            }
        }
    }
}

/// The encoder-facing face of the pool
///
/// Operands come straight out of rewritten bytecode, so array descriptors
/// are possible; they merge through the root type here, since element
/// covariance is handled before the query is ever made.
impl<'p> SupertypeOracle for WrapperPool<'p> {
    fn common_superclass(&self, a: &str, b: &str) -> Result<BinaryName, Error> {
        if a.starts_with('[') || b.starts_with('[') {
            return Ok(BinaryName::OBJECT);
        }
        let a = self.get(a)?;
        let b = self.get(b)?;
        Ok(WrapperPool::common_superclass(self, a, b)?.name.clone())
    }
}
