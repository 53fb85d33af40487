// Thu Oct 15 2026 - Alex

pub mod demangle;
pub mod error;
pub mod library;
pub mod pairs;
pub mod reader;

pub use demangle::{BuiltinDecoder, NameDecoder, UndnameDecoder};
pub use error::SymbolError;
pub use library::{ArchiveReader, DumpbinReader, LibrarySymbolReader};
pub use pairs::{SymbolPairs, SymbolRecord};
pub use reader::RawSymbolReader;
