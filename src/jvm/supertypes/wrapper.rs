use crate::jvm::class_file::ClassNode;
use crate::jvm::BinaryName;
use std::fmt;
use std::fmt::Debug;

/// Minimal projection of a class needed for hierarchy resolution
#[derive(Clone)]
pub struct ClassWrapper {
    pub name: BinaryName,

    /// Missing only for the root of the hierarchy
    pub super_name: Option<BinaryName>,
    pub interfaces: Vec<BinaryName>,
    pub is_interface: bool,
}

impl ClassWrapper {
    pub fn new(
        name: BinaryName,
        super_name: Option<BinaryName>,
        interfaces: Vec<BinaryName>,
        is_interface: bool,
    ) -> ClassWrapper {
        ClassWrapper {
            name,
            super_name,
            interfaces,
            is_interface,
        }
    }

    /// Project the hierarchy-relevant header fields out of a full summary
    pub fn of_node(node: &ClassNode) -> ClassWrapper {
        ClassWrapper {
            name: node.name.clone(),
            super_name: node.super_name.clone(),
            interfaces: node.interfaces.clone(),
            is_interface: node.is_interface(),
        }
    }
}

impl PartialEq for ClassWrapper {
    fn eq(&self, other: &ClassWrapper) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassWrapper {}

impl Debug for ClassWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}
