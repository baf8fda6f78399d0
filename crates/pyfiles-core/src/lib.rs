pub mod classify;
pub mod error;
pub mod generate;
pub mod layout;
pub mod paths;
pub mod record;

pub use classify::{classify_paths, ClassifiedPaths, Module, ModuleKind};
pub use error::{PyfilesError, Result};
pub use generate::{generate_file_list, parse_varargs, SaveArgs, BINDIR_FLAG};
pub use layout::{InstallLayout, PythonVersion};
pub use record::{locate_record, parse_record, read_record, RecordRow};
