use crate::jvm::Error;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;

/// Constant pool entry, decoded only as far as header projection requires
///
/// Entries the header never references are parsed for their width and kept
/// as [`Constant::Other`].
#[derive(Debug)]
pub enum Constant {
    Utf8(String),
    /// Index of the `Utf8` entry holding the class name
    Class(u16),
    Other,
    /// `Long`/`Double` entries take two slots; the second slot is [`Constant::Unusable`]
    Wide,
    Unusable,
}

/// The constant pool of a single class file
///
/// Indexing starts at 1, as in the serialized format.
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    /// Read the constant pool, starting from its entry count
    pub fn read<R: Read>(reader: &mut R) -> Result<ConstantPool, Error> {
        let count = reader.read_u16::<BigEndian>()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        while entries.len() < count as usize {
            let tag = reader.read_u8()?;
            let entry = match tag {
                // CONSTANT_Utf8
                1 => {
                    let length = reader.read_u16::<BigEndian>()?;
                    let mut bytes = vec![0u8; length as usize];
                    reader.read_exact(&mut bytes)?;
                    // Class names never exercise the corners where the JVM's
                    // modified UTF-8 differs from real UTF-8
                    let string = String::from_utf8(bytes).map_err(|_| {
                        Error::MalformedClassFile(String::from("invalid UTF-8 constant"))
                    })?;
                    Constant::Utf8(string)
                }
                // CONSTANT_Class
                7 => Constant::Class(reader.read_u16::<BigEndian>()?),
                // CONSTANT_Integer, CONSTANT_Float
                3 | 4 => {
                    skip(reader, 4)?;
                    Constant::Other
                }
                // CONSTANT_Long, CONSTANT_Double
                5 | 6 => {
                    skip(reader, 8)?;
                    entries.push(Constant::Wide);
                    Constant::Unusable
                }
                // CONSTANT_String, CONSTANT_MethodType, CONSTANT_Module, CONSTANT_Package
                8 | 16 | 19 | 20 => {
                    skip(reader, 2)?;
                    Constant::Other
                }
                // Member refs, CONSTANT_NameAndType, CONSTANT_Dynamic, CONSTANT_InvokeDynamic
                9 | 10 | 11 | 12 | 17 | 18 => {
                    skip(reader, 4)?;
                    Constant::Other
                }
                // CONSTANT_MethodHandle
                15 => {
                    skip(reader, 3)?;
                    Constant::Other
                }
                other => {
                    return Err(Error::MalformedClassFile(format!(
                        "unknown constant pool tag {}",
                        other
                    )))
                }
            };
            entries.push(entry);
        }

        Ok(ConstantPool { entries })
    }

    /// Resolve an index to the `Utf8` entry at it
    pub fn utf8(&self, index: u16) -> Result<&str, Error> {
        match self.entries.get(index as usize) {
            Some(Constant::Utf8(string)) => Ok(string),
            _ => Err(Error::MalformedClassFile(format!(
                "constant {} is not a Utf8 entry",
                index
            ))),
        }
    }

    /// Resolve an index to a `Class` entry down to the class name
    pub fn class_name(&self, index: u16) -> Result<&str, Error> {
        match self.entries.get(index as usize) {
            Some(Constant::Class(utf8_index)) => self.utf8(*utf8_index),
            _ => Err(Error::MalformedClassFile(format!(
                "constant {} is not a Class entry",
                index
            ))),
        }
    }
}

fn skip<R: Read>(reader: &mut R, count: usize) -> Result<(), Error> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf[..count])?;
    Ok(())
}
