use std::io::Write;
use std::path::Path;

use eyre::{Result, WrapErr};
use implreg_registry::Loader;
use tokio::fs;
use tracing::warn;

use crate::render::Renderer;

/// Describes the single data file at `file` without going through a registry.
pub async fn handle_show_command(file: &Path, renderer: &Renderer, out: &mut impl Write) -> Result<()> {
    let source = fs::read_to_string(file)
        .await
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let loader = Loader::from_source_at(file, &source)
        .wrap_err_with(|| format!("Failed to parse {}", file.display()))?;

    if loader.table().is_empty() {
        warn!(file = %file.display(), "No implementor entries found");
    }

    renderer.write_table(out, loader.table())
}
