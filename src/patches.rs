use std::fmt;
use std::path::{Path, PathBuf};

/// A single literal edit: replace `pattern` with `replacement` on every line of `path`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Path relative to the translation output root
    pub path: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

impl Patch {
    pub const fn new(path: &'static str, pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            path,
            pattern,
            replacement,
        }
    }

    /// Resolve the patch's file against `root`
    pub fn target(&self, root: &Path) -> PathBuf {
        root.join(self.path)
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} -> {:?}", self.path, self.pattern, self.replacement)
    }
}

/// Fixups for the C# output of the Jackson core translation, applied in order.
///
/// Patterns are literal and line-scoped. Note the first two are not idempotent: their
/// replacement contains the pattern, so a second run appends another `;` / `//`.
pub static JACKSON_PATCHES: &[Patch] = &[
    // Abstract generic method left without a terminating semicolon
    Patch::new(
        "./com/fasterxml/jackson/core/ObjectCodec.cs",
        "public abstract override T readTree<T>(com.fasterxml.jackson.core.JsonParser jp)",
        "public abstract override T readTree<T>(com.fasterxml.jackson.core.JsonParser jp);",
    ),
    // Constraint is not allowed on an override
    Patch::new(
        "./com/fasterxml/jackson/core/ObjectCodec.cs",
        "where T : com.fasterxml.jackson.core.TreeNode;",
        "//where T : com.fasterxml.jackson.core.TreeNode;",
    ),
    Patch::new(
        "./com/fasterxml/jackson/core/format/InputAccessor.cs",
        "public interface InputAccessor",
        "public class InputAccessor",
    ),
    // java.io.Flushable has no .NET counterpart
    Patch::new(
        "./com/fasterxml/jackson/core/JsonGenerator.cs",
        "public abstract class JsonGenerator : System.IDisposable, java.io.Flushable, com.fasterxml.jackson.core.Versioned",
        "public abstract class JsonGenerator : System.IDisposable, com.fasterxml.jackson.core.Versioned",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(JACKSON_PATCHES.len(), 4);
        assert_eq!(JACKSON_PATCHES[0].path, JACKSON_PATCHES[1].path);
        for patch in JACKSON_PATCHES {
            assert!(!patch.pattern.is_empty());
            assert!(!patch.pattern.contains('\n'));
            assert_ne!(patch.pattern, patch.replacement);
        }
    }

    #[test]
    fn test_target_resolves_against_root() {
        let patch = &JACKSON_PATCHES[2];
        let target = patch.target(Path::new("/out"));
        assert!(target.ends_with("com/fasterxml/jackson/core/format/InputAccessor.cs"));
        assert!(target.starts_with("/out"));
    }
}
