//! Archive assembly: collecting entries, encoding the zip and handing it off.

pub mod assembler;
pub mod audit;
pub mod session;
pub mod sink;

pub use assembler::{ArchiveAssembler, AssembledArchive, EntryDigest};
pub use audit::dangling_references;
pub use session::{ArchiveEntry, ExportSession};
pub use sink::{ArchiveSink, DirectorySink, MemorySink};
