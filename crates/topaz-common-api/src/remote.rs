use std::io;

/// A file or directory that may live on another machine.
///
/// The CLI is installed on the machine that runs it, so version checks go
/// through this trait rather than `std::fs`.
pub trait RemotePath {
    fn exists(&self) -> io::Result<bool>;

    fn child(&self, name: &str) -> Box<dyn RemotePath>;

    fn read_to_string(&self) -> io::Result<String>;

    /// Location for diagnostics.
    fn remote(&self) -> String;
}
