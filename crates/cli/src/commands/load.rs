use std::io::Write;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use implreg_registry::source::is_data_file;
use implreg_registry::{Loader, PendingPolicy, Registry};
use implreg_types::ImplementorTable;
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::render::Renderer;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Bind the consumer after every file was delivered instead of before.
    pub late_bind: bool,
    pub policy: PendingPolicy,
    pub renderer: Renderer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub files: usize,
    pub rendered: usize,
    /// Tables still waiting for a consumer when loading finished.
    pub pending: usize,
}

/// Finds every `trait.<Name>.js` file under `root`, in a stable order.
pub fn discover_data_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.wrap_err_with(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && is_data_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Delivers each data file under `dir` through a registry whose consumer
/// renders tables into `out`.
pub async fn load_directory(
    dir: &Path,
    options: &LoadOptions,
    out: &mut impl Write,
) -> Result<LoadSummary> {
    let files = discover_data_files(dir)?;
    info!(
        dir = %dir.display(),
        files = files.len(),
        policy = %options.policy,
        late_bind = options.late_bind,
        "Loading implementor data files"
    );

    let mut rendered = 0usize;
    let renderer = &options.renderer;
    let mut consumer = Some(|table: ImplementorTable| -> Result<()> {
        renderer.write_table(&mut *out, &table)?;
        rendered += 1;
        Ok(())
    });

    let mut registry = Registry::with_policy(options.policy);
    if !options.late_bind {
        if let Some(consumer) = consumer.take() {
            registry.bind_consumer(consumer)?;
        }
    }

    for path in &files {
        let source = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let loader = Loader::from_source_at(path, &source)
            .wrap_err_with(|| format!("Failed to parse {}", path.display()))?;
        loader.deliver(&mut registry)?;
    }

    if let Some(consumer) = consumer.take() {
        registry.bind_consumer(consumer)?;
    }

    let pending = registry.pending_len();
    drop(registry);

    if pending > 0 {
        warn!(pending, "Implementor tables left undelivered");
    }

    Ok(LoadSummary {
        files: files.len(),
        rendered,
        pending,
    })
}
