// jackson-fixup - literal fixups for the C# output of the Jackson Java-to-C# translation
// Every edit is a plain substring swap on a single line of a known file

pub mod config;
pub mod error;
pub mod logging;
pub mod patches;
pub mod preview;
pub mod replace;
pub mod runner;

pub use config::FixupConfig;
pub use error::{FixupError, FixupResult};
pub use patches::{Patch, JACKSON_PATCHES};
pub use replace::{replace, replace_with, ReplaceOptions, ReplaceOutcome, ReplaceStrategy};
pub use runner::{apply_all, preview_all, PatchPreview, PatchReport};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
