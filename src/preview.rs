// Dry-run support: compute a patch's effect in memory and render it as a unified diff

use similar::TextDiff;
use std::path::Path;

use crate::replace::{replace_in_line, ReplaceOutcome};

/// Apply the line-granular substitution to in-memory text
pub fn transform(content: &str, pattern: &str, replacement: &str) -> (String, ReplaceOutcome) {
    let mut output = String::with_capacity(content.len());
    let mut outcome = ReplaceOutcome::default();

    for line in content.split_inclusive('\n') {
        let (rewritten, count) = replace_in_line(line, pattern, replacement);
        output.push_str(&rewritten);
        outcome.lines += 1;
        outcome.replacements += count;
    }

    (output, outcome)
}

/// Render the change from `old` to `new` as a unified diff labelled with `path`
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    let label = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(2)
        .header(&format!("a/{}", label), &format!("b/{}", label))
        .to_string()
}
