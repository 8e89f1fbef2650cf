use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{map_io_err, FixupResult};
use crate::patches::Patch;
use crate::preview::{transform, unified_diff};
use crate::replace::{replace_with, ReplaceOptions, ReplaceOutcome};

/// Result of applying one patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub patch: Patch,
    pub target: PathBuf,
    pub outcome: ReplaceOutcome,
}

/// Result of previewing one patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPreview {
    pub patch: Patch,
    pub target: PathBuf,
    pub outcome: ReplaceOutcome,
    /// Unified diff, empty when the patch matches nothing
    pub diff: String,
}

/// Apply `patches` in order against `root`, stopping at the first failure
pub fn apply_all(
    root: &Path,
    patches: &[Patch],
    options: &ReplaceOptions,
) -> FixupResult<Vec<PatchReport>> {
    let mut reports = Vec::with_capacity(patches.len());

    for (index, patch) in patches.iter().enumerate() {
        let target = patch.target(root);
        debug!("Patch {}/{}: {}", index + 1, patches.len(), patch);

        let outcome = replace_with(&target, patch.pattern, patch.replacement, options)?;
        if outcome.changed() {
            info!(
                "Patched {} ({} replacement{})",
                target.display(),
                outcome.replacements,
                if outcome.replacements == 1 { "" } else { "s" }
            );
        } else {
            warn!(
                "Pattern {:?} not found in {}; file may already be patched",
                patch.pattern,
                target.display()
            );
        }

        reports.push(PatchReport {
            patch: *patch,
            target,
            outcome,
        });
    }

    Ok(reports)
}

/// Compute what `apply_all` would do without writing anything.
///
/// Patches on the same file are chained, so each preview sees the previous patch's output.
pub fn preview_all(root: &Path, patches: &[Patch]) -> FixupResult<Vec<PatchPreview>> {
    let mut contents: HashMap<PathBuf, String> = HashMap::new();
    let mut previews = Vec::with_capacity(patches.len());

    for patch in patches {
        let target = patch.target(root);
        let before = match contents.get(&target) {
            Some(content) => content.clone(),
            None => fs::read_to_string(&target).map_err(map_io_err(&target))?,
        };

        let (after, outcome) = transform(&before, patch.pattern, patch.replacement);
        let diff = unified_diff(Path::new(patch.path), &before, &after);
        contents.insert(target.clone(), after);

        previews.push(PatchPreview {
            patch: *patch,
            target,
            outcome,
            diff,
        });
    }

    Ok(previews)
}
