use super::Error;
use crate::jvm;
use crate::jvm::class_file::ClassNode;
use std::rc::Rc;

/// Resolver handed to downgrade providers for mid-transformation lookups
///
/// Same contract as [`crate::jvm::node_cache::ClassNodeCache::lookup`]:
/// absence is `None`, dotted names are fatal.
pub type NodeLookup<'a> = dyn Fn(&str) -> Result<Option<Rc<ClassNode>>, jvm::Error> + 'a;

/// One step of the per-class bytecode downgrade transformation
///
/// Real providers rewrite instructions and may synthesize auxiliary classes;
/// this crate fixes only the contract. Implementations mutate the summary in
/// place, push synthesized classes into `extra`, resolve any class they need
/// to inspect through `lookup`, and record the control-flow merges they
/// disturb in [`ClassNode::frame_merges`].
pub trait DowngradeProvider {
    fn downgrade(
        &self,
        node: &mut ClassNode,
        extra: &mut Vec<ClassNode>,
        lookup: &NodeLookup,
    ) -> Result<(), Error>;
}

/// Downgrade provider that only lowers the class-file version number
///
/// Sufficient whenever the input bytecode uses no features newer than the
/// target version understands.
pub struct VersionCapDowngrader {
    target_version: u16,
}

impl VersionCapDowngrader {
    pub fn new(target_version: u16) -> VersionCapDowngrader {
        VersionCapDowngrader { target_version }
    }
}

impl DowngradeProvider for VersionCapDowngrader {
    fn downgrade(
        &self,
        node: &mut ClassNode,
        _extra: &mut Vec<ClassNode>,
        _lookup: &NodeLookup,
    ) -> Result<(), Error> {
        if node.version > self.target_version {
            log::debug!(
                "Lowering '{}' from version {} to {}",
                node.name,
                node.version,
                self.target_version
            );
            node.version = self.target_version;
        }
        Ok(())
    }
}
