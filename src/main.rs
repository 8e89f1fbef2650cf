use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use jackson_fixup::{
    apply_all, preview_all, FixupConfig, FixupError, ReplaceStrategy, JACKSON_PATCHES,
};

/// Apply the fixed set of fixups to the translated Jackson C# sources
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the translated `com/` tree (default: current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How rewritten files replace the originals
    #[arg(short, long, value_enum)]
    strategy: Option<ReplaceStrategy>,

    /// Leave rewritten files with the staging file's permissions
    #[arg(long)]
    no_preserve_permissions: bool,

    /// Print the diffs instead of writing them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer command-line flags over the settings file
    fn resolve_config(&self) -> Result<FixupConfig> {
        let mut config = FixupConfig::load_or_default(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if self.no_preserve_permissions {
            config.preserve_permissions = false;
        }

        Ok(config)
    }
}

/// Extra message for failures that left a target without its content
fn data_loss_hint(err: &FixupError) -> Option<String> {
    match err {
        FixupError::Stranded { path, staged, .. } if err.is_data_loss() => Some(format!(
            "{} no longer exists; restore it by moving {} back into place",
            path.display(),
            staged.display()
        )),
        _ => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    jackson_fixup::logging::init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    info!(
        "jackson-fixup v{}: {} patches under {}",
        jackson_fixup::version(),
        JACKSON_PATCHES.len(),
        config.root.display()
    );

    if cli.dry_run {
        let previews = preview_all(&config.root, JACKSON_PATCHES).context("Dry run failed")?;
        for preview in &previews {
            if !preview.outcome.changed() {
                warn!("Would not change anything: {}", preview.patch);
            }
            print!("{}", preview.diff);
        }
        let changed = previews.iter().filter(|p| p.outcome.changed()).count();
        info!("Dry run: {} of {} patches would change files", changed, previews.len());
        return Ok(());
    }

    let reports = match apply_all(&config.root, JACKSON_PATCHES, &config.replace_options()) {
        Ok(reports) => reports,
        Err(err) => {
            if let Some(hint) = data_loss_hint(&err) {
                error!("{}", hint);
            }
            return Err(anyhow::Error::new(err).context("Failed to apply fixups"));
        }
    };

    for report in &reports {
        debug!(
            "{} -> {} ({} replacements)",
            report.patch,
            report.target.display(),
            report.outcome.replacements
        );
    }

    let replacements: usize = reports.iter().map(|r| r.outcome.replacements).sum();
    info!(
        "Applied {} patches ({} replacements)",
        reports.len(),
        replacements
    );

    Ok(())
}
