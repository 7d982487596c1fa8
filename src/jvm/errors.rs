#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),

    /// Caller handed over a dotted name where a slash-separated internal
    /// name is required (indicates a bug in the caller)
    DottedClassName(String),

    /// A name that is not a well-formed internal class name
    InvalidClassName(String),

    /// Class file bytes that do not follow the class file format
    MalformedClassFile(String),

    /// No resolution source could produce a descriptor for the name
    ///
    /// Fatal whenever frame recomputation needed the class; speculative
    /// lookups report absence as `None` instead.
    UnknownClass(String),

    /// A superclass chain that loops back on itself
    HierarchyCycle(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}
