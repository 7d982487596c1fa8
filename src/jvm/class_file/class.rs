use crate::jvm::class_file::ConstantPool;
use crate::jvm::{BinaryName, ClassAccessFlags, Error};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;

/// Parsed structural summary of one class file
///
/// The header (version, access flags, and the supertype information that
/// hierarchy resolution needs) is fully decoded. The serialized form is
/// retained so the class can be re-emitted; everything after the interface
/// table (members, instructions, attributes) rides along inside it
/// untouched.
#[derive(Debug, Clone)]
pub struct ClassNode {
    /// Major class-file version; rewriting this is the point of the exercise
    pub version: u16,
    pub access_flags: ClassAccessFlags,
    pub name: BinaryName,

    /// Missing only for `java/lang/Object` itself
    pub super_name: Option<BinaryName>,
    pub interfaces: Vec<BinaryName>,

    /// Class-name pairs at control-flow merge points whose verification type
    /// must be recomputed when the class is re-encoded
    ///
    /// Downgrade providers record a pair for every merge their rewriting
    /// disturbs; [`super::ClassWriter::encode`] resolves them all.
    pub frame_merges: Vec<(String, String)>,

    bytes: Vec<u8>,
}

impl ClassNode {
    /// Magic header bytes at the front of every serialized class file
    pub const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

    /// Byte offset of the big-endian `major_version` field
    pub(crate) const MAJOR_VERSION_OFFSET: usize = 6;

    /// Parse the header of a serialized class, keeping the bytes
    pub fn parse(bytes: Vec<u8>) -> Result<ClassNode, Error> {
        let mut reader: &[u8] = &bytes;

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != ClassNode::MAGIC {
            return Err(Error::MalformedClassFile(String::from(
                "missing class file magic",
            )));
        }

        let _minor_version = reader.read_u16::<BigEndian>()?;
        let version = reader.read_u16::<BigEndian>()?;
        let constants = ConstantPool::read(&mut reader)?;

        let access_flags = ClassAccessFlags::from_bits_truncate(reader.read_u16::<BigEndian>()?);
        let this_class = reader.read_u16::<BigEndian>()?;
        let super_class = reader.read_u16::<BigEndian>()?;

        let name = BinaryName::from_string(constants.class_name(this_class)?.to_owned())
            .map_err(Error::InvalidClassName)?;
        let super_name = if super_class == 0 {
            None
        } else {
            let super_name = constants.class_name(super_class)?.to_owned();
            Some(BinaryName::from_string(super_name).map_err(Error::InvalidClassName)?)
        };

        let interface_count = reader.read_u16::<BigEndian>()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            let index = reader.read_u16::<BigEndian>()?;
            let interface = constants.class_name(index)?.to_owned();
            interfaces.push(BinaryName::from_string(interface).map_err(Error::InvalidClassName)?);
        }

        Ok(ClassNode {
            version,
            access_flags,
            name,
            super_name,
            interfaces,
            frame_merges: Vec::new(),
            bytes,
        })
    }

    /// Fabricate a class with no fields, methods, or attributes
    ///
    /// This is how downgrade providers synthesize the auxiliary classes that
    /// end up as extra archive entries.
    pub fn synthesize(
        name: BinaryName,
        super_name: Option<BinaryName>,
        interfaces: Vec<BinaryName>,
        access_flags: ClassAccessFlags,
        version: u16,
    ) -> ClassNode {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ClassNode::MAGIC);
        bytes.extend_from_slice(&0u16.to_be_bytes()); // minor_version
        bytes.extend_from_slice(&version.to_be_bytes());

        // One Utf8 + Class entry pair per referenced class, this class first
        let class_refs: Vec<&BinaryName> = std::iter::once(&name)
            .chain(super_name.iter())
            .chain(interfaces.iter())
            .collect();
        let pool_count = 1 + 2 * class_refs.len() as u16;
        bytes.extend_from_slice(&pool_count.to_be_bytes());
        for (position, class_ref) in class_refs.iter().enumerate() {
            let utf8_index = (2 * position + 1) as u16;
            bytes.push(1); // CONSTANT_Utf8
            bytes.extend_from_slice(&(class_ref.as_str().len() as u16).to_be_bytes());
            bytes.extend_from_slice(class_ref.as_str().as_bytes());
            bytes.push(7); // CONSTANT_Class
            bytes.extend_from_slice(&utf8_index.to_be_bytes());
        }

        let class_index = |position: usize| (2 * position + 2) as u16;
        bytes.extend_from_slice(&access_flags.bits().to_be_bytes());
        bytes.extend_from_slice(&class_index(0).to_be_bytes()); // this_class
        let super_index = if super_name.is_some() { class_index(1) } else { 0 };
        bytes.extend_from_slice(&super_index.to_be_bytes());

        bytes.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
        let interfaces_start = if super_name.is_some() { 2 } else { 1 };
        for position in 0..interfaces.len() {
            bytes.extend_from_slice(&class_index(interfaces_start + position).to_be_bytes());
        }

        bytes.extend_from_slice(&0u16.to_be_bytes()); // fields_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // methods_count
        bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes_count

        ClassNode {
            version,
            access_flags,
            name,
            super_name,
            interfaces,
            frame_merges: Vec::new(),
            bytes,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.is_interface()
    }

    /// The serialized form this summary was parsed from (or synthesized as)
    ///
    /// Note that the `version` field may have diverged from the version
    /// recorded in here; [`super::ClassWriter::encode`] reconciles the two.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
