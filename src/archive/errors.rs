use crate::jvm;

#[derive(Debug)]
pub enum Error {
    Jvm(jvm::Error),
    IoError(std::io::Error),
    Zip(zip::result::ZipError),

    /// The same relative path was submitted twice during collection; no
    /// duplicate-handling strategy exists
    DuplicateEntry(String),

    /// A collection call arrived after collection completed, which hints at
    /// a synchronization problem in the caller
    CollectionFinished,

    /// A single class failed to transform; carries the offending path
    Transform { path: String, cause: Box<Error> },

    /// Java releases below 1 have no bytecode version
    UnsupportedRelease(i32),
}

impl From<jvm::Error> for Error {
    fn from(err: jvm::Error) -> Error {
        Error::Jvm(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Error {
        Error::Zip(err)
    }
}
