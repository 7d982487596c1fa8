use crate::jvm::class_file::ClassNode;
use crate::jvm::{BinaryName, Error};

/// Major version at which `java/lang/Record` enters the hierarchy
const RECORD_INTRODUCED: u16 = 60;

/// Answers the verifier's least-upper-bound queries during encoding
///
/// Both operands are internal names as they appear in the bytecode, so array
/// descriptors can show up here. Implementations must never be asked to
/// produce anything but the root type for interface-vs-interface pairs.
pub trait SupertypeOracle {
    fn common_superclass(&self, a: &str, b: &str) -> Result<BinaryName, Error>;
}

/// Re-encodes a structural summary against a target bytecode version
///
/// Reconstructing stack-map frames needs a common-superclass judgment at
/// every control-flow merge point, so the oracle is an explicit constructor
/// dependency of the writer.
pub struct ClassWriter<'w> {
    target_version: u16,
    oracle: &'w dyn SupertypeOracle,
}

impl<'w> ClassWriter<'w> {
    pub fn new(target_version: u16, oracle: &'w dyn SupertypeOracle) -> ClassWriter<'w> {
        ClassWriter {
            target_version,
            oracle,
        }
    }

    /// Serialize the summary, recomputing the type at every recorded merge
    ///
    /// A merge operand that no source can classify is fatal: the verifier
    /// cannot assign a type to that merge point. An empty operand is a
    /// contract violation by whoever recorded the merge.
    pub fn encode(&self, node: &ClassNode) -> Result<Vec<u8>, Error> {
        for (a, b) in &node.frame_merges {
            if a.is_empty() || b.is_empty() {
                return Err(Error::InvalidClassName(format!(
                    "empty merge operand for '{}' and '{}'",
                    a, b
                )));
            }

            let mut lub = self.oracle.common_superclass(a, b)?;
            if lub == BinaryName::RECORD && self.target_version < RECORD_INTRODUCED {
                log::warn!(
                    "Filtering out incompatible superclass '{}' for child types '{}' and '{}'; \
                     substituting the closest equivalent",
                    lub,
                    a,
                    b
                );
                lub = BinaryName::OBJECT;
            }
            log::debug!("Merge of '{}' and '{}' resolves to '{}'", a, b, lub);
        }

        let mut bytes = node.bytes().to_vec();
        let version = node.version.min(self.target_version);
        let offset = ClassNode::MAJOR_VERSION_OFFSET;
        bytes[offset..offset + 2].copy_from_slice(&version.to_be_bytes());
        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::{ClassWriter, SupertypeOracle};
    use crate::jvm::class_file::ClassNode;
    use crate::jvm::{BinaryName, ClassAccessFlags, Error};
    use std::cell::Cell;

    struct FixedOracle {
        result: BinaryName,
        queries: Cell<usize>,
    }

    impl SupertypeOracle for FixedOracle {
        fn common_superclass(&self, _a: &str, _b: &str) -> Result<BinaryName, Error> {
            self.queries.set(self.queries.get() + 1);
            Ok(self.result.clone())
        }
    }

    fn sample_node(version: u16) -> ClassNode {
        ClassNode::synthesize(
            BinaryName::from_string(String::from("foo/Bar")).unwrap(),
            Some(BinaryName::OBJECT),
            vec![],
            ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            version,
        )
    }

    #[test]
    fn version_is_capped() {
        let oracle = FixedOracle {
            result: BinaryName::OBJECT,
            queries: Cell::new(0),
        };
        let node = sample_node(61);
        let bytes = ClassWriter::new(51, &oracle).encode(&node).unwrap();
        assert_eq!(&bytes[6..8], &51u16.to_be_bytes());

        // An already-old class is left at its own version
        let node = sample_node(49);
        let bytes = ClassWriter::new(51, &oracle).encode(&node).unwrap();
        assert_eq!(&bytes[6..8], &49u16.to_be_bytes());
    }

    #[test]
    fn every_merge_is_resolved() {
        let oracle = FixedOracle {
            result: BinaryName::OBJECT,
            queries: Cell::new(0),
        };
        let mut node = sample_node(61);
        node.frame_merges = vec![
            (String::from("a/A"), String::from("b/B")),
            (String::from("a/A"), String::from("c/C")),
        ];
        ClassWriter::new(51, &oracle).encode(&node).unwrap();
        assert_eq!(oracle.queries.get(), 2);
    }

    #[test]
    fn empty_merge_operand_is_fatal() {
        let oracle = FixedOracle {
            result: BinaryName::OBJECT,
            queries: Cell::new(0),
        };
        let mut node = sample_node(61);
        node.frame_merges = vec![(String::new(), String::from("a/A"))];
        assert!(matches!(
            ClassWriter::new(51, &oracle).encode(&node),
            Err(Error::InvalidClassName(_))
        ));
        assert_eq!(oracle.queries.get(), 0);
    }

    #[test]
    fn record_superclass_is_filtered_before_records_exist() {
        let oracle = FixedOracle {
            result: BinaryName::RECORD,
            queries: Cell::new(0),
        };
        let mut node = sample_node(61);
        node.frame_merges = vec![(String::from("a/A"), String::from("b/B"))];
        // Must not fail even though `java/lang/Record` predates the target
        ClassWriter::new(51, &oracle).encode(&node).unwrap();
        assert_eq!(oracle.queries.get(), 1);
    }
}
