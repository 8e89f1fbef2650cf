// Line-granular literal substring replacement for files on disk.
// Content is streamed through a staging file, then put back at the original path.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

use crate::error::{map_io_err, FixupError, FixupResult};

/// How the staged content replaces the original file
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ReplaceStrategy {
    /// Stage next to the target and rename over it in one step
    #[default]
    Atomic,
    /// Stage in the system temp dir, delete the original, then move the staged file in
    DeleteThenMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub strategy: ReplaceStrategy,
    /// Copy the original's permission bits onto the replacement file
    pub preserve_permissions: bool,
}

impl Default for ReplaceOptions {
    fn default() -> Self {
        Self {
            strategy: ReplaceStrategy::Atomic,
            preserve_permissions: true,
        }
    }
}

/// What a single replace pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Lines streamed through
    pub lines: usize,
    /// Occurrences of the pattern that were substituted
    pub replacements: usize,
}

impl ReplaceOutcome {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Replace every non-overlapping occurrence of `pattern` in a single line.
///
/// The line is returned borrowed when nothing matched. An empty pattern never matches.
pub fn replace_in_line<'a>(
    line: &'a str,
    pattern: &str,
    replacement: &str,
) -> (Cow<'a, str>, usize) {
    if pattern.is_empty() {
        return (Cow::Borrowed(line), 0);
    }

    let count = line.matches(pattern).count();
    if count == 0 {
        (Cow::Borrowed(line), 0)
    } else {
        (Cow::Owned(line.replace(pattern, replacement)), count)
    }
}

/// Stream `reader` into `writer` line by line, substituting `pattern` on each line.
///
/// Lines keep their terminator exactly as read, so `\r\n` and a missing final newline survive.
pub fn rewrite_lines<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    pattern: &str,
    replacement: &str,
) -> io::Result<ReplaceOutcome> {
    let mut outcome = ReplaceOutcome::default();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        let (rewritten, count) = replace_in_line(&line, pattern, replacement);
        writer.write_all(rewritten.as_bytes())?;

        outcome.lines += 1;
        outcome.replacements += count;
    }

    writer.flush()?;
    Ok(outcome)
}

/// Replace `pattern` with `replacement` on every line of the file at `path`, using default options
pub fn replace(
    path: impl AsRef<Path>,
    pattern: &str,
    replacement: &str,
) -> FixupResult<ReplaceOutcome> {
    replace_with(path, pattern, replacement, &ReplaceOptions::default())
}

/// Replace `pattern` with `replacement` on every line of the file at `path`
pub fn replace_with(
    path: impl AsRef<Path>,
    pattern: &str,
    replacement: &str,
    options: &ReplaceOptions,
) -> FixupResult<ReplaceOutcome> {
    let path = path.as_ref();
    debug!(
        "Replacing {:?} with {:?} in {} ({:?})",
        pattern,
        replacement,
        path.display(),
        options.strategy
    );

    // Open the source before anything is created, so a missing file leaves no trace
    let source = File::open(path).map_err(map_io_err(path))?;
    let metadata = source.metadata().map_err(map_io_err(path))?;
    if !metadata.is_file() {
        return Err(FixupError::io_error(
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            path,
        ));
    }

    if pattern.is_empty() {
        warn!("Empty pattern for {}, leaving file untouched", path.display());
        let lines = BufReader::new(source)
            .split(b'\n')
            .try_fold(0usize, |n, chunk| chunk.map(|_| n + 1))
            .map_err(map_io_err(path))?;
        return Ok(ReplaceOutcome {
            lines,
            replacements: 0,
        });
    }

    let mut staged = match options.strategy {
        ReplaceStrategy::Atomic => NamedTempFile::new_in(staging_dir(path)),
        ReplaceStrategy::DeleteThenMove => NamedTempFile::new(),
    }
    .map_err(map_io_err(path))?;

    let outcome = {
        let reader = BufReader::new(source);
        let writer = BufWriter::new(staged.as_file_mut());
        rewrite_lines(reader, writer, pattern, replacement).map_err(map_io_err(path))?
    };

    if options.strategy == ReplaceStrategy::Atomic {
        staged.as_file().sync_all().map_err(map_io_err(path))?;
    }

    // Closes the staging handle; the path is still removed on drop until persisted
    let staged = staged.into_temp_path();

    if options.preserve_permissions {
        fs::set_permissions(&staged, metadata.permissions()).map_err(map_io_err(path))?;
    }

    match options.strategy {
        ReplaceStrategy::Atomic => persist_atomic(staged, path)?,
        ReplaceStrategy::DeleteThenMove => delete_then_move(staged, path)?,
    }

    debug!(
        "Rewrote {} ({} lines, {} replacements)",
        path.display(),
        outcome.lines,
        outcome.replacements
    );
    Ok(outcome)
}

/// Directory the atomic strategy stages in. Must be on the same filesystem as the target.
fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn persist_atomic(staged: TempPath, path: &Path) -> FixupResult<()> {
    staged.persist(path).map_err(|err| FixupError::Persist {
        source: err.error,
        path: path.to_path_buf(),
    })
}

/// Remove the original, then move the staged file into its place
fn delete_then_move(staged: TempPath, path: &Path) -> FixupResult<()> {
    fs::remove_file(path).map_err(map_io_err(path))?;
    move_staged(staged, path)
}

/// Move `staged` to `path`, copying when the rename fails (e.g. the temp dir is on another device).
///
/// If the copy fails too, the staged file is kept on disk and reported as stranded.
fn move_staged(staged: TempPath, path: &Path) -> FixupResult<()> {
    let err = match staged.persist(path) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };

    debug!(
        "Rename into {} failed ({}), copying instead",
        path.display(),
        err.error
    );
    let staged = err.path;
    match fs::copy(&staged, path) {
        Ok(_) => Ok(()),
        Err(copy_err) => {
            let kept = staged
                .keep()
                .map_err(|keep_err| FixupError::io_error(keep_err.error, path))?;
            warn!(
                "{} was removed but its new content could only be kept at {}",
                path.display(),
                kept.display()
            );
            Err(FixupError::Stranded {
                source: copy_err,
                path: path.to_path_buf(),
                staged: kept,
            })
        }
    }
}
