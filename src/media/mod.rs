//! Media tree access: layout, filesystem port, naming and file moves.

pub mod dispersion;
pub mod filesystem;
pub mod layout;
pub mod relocator;
pub mod unique_name;

pub use dispersion::dispersion_path;
pub use filesystem::{LocalMediaFilesystem, MediaFilesystem};
pub use layout::{DirectoryRole, MediaLayout};
pub use relocator::FileRelocator;
pub use unique_name::UniqueNameAllocator;
