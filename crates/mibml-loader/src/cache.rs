//! Process-wide template cache.
//!
//! Rendered templates are cached keyed by normalized file path. The map
//! lock is held only long enough to fetch or insert a per-path slot;
//! each slot carries its own mutex so concurrent loads of *different*
//! paths never block one another, while loads of the *same* path
//! coalesce on one slot instead of racing duplicate disk reads.
//!
//! Parsing with override variables always bypasses the cache: overrides
//! change the rendered text, and the cache only ever stores the
//! variable-free rendition.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mibml::{CompilerConfig, RenderSettings};
use once_cell::sync::Lazy;

use crate::error::{LoaderError, Result};

/// Hard cap on the rendered DSL delivered to the client.
pub const MAX_OUTPUT_BYTES: usize = 4 * 1024 * 1024;

#[derive(Default)]
struct Slot {
    rendered: Option<String>,
}

static TEMPLATE_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<Slot>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Relative paths resolve against the config's root directory.
fn resolve(path: &Path, config: &CompilerConfig) -> PathBuf {
    match &config.root_dir {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}

fn slot_for(key: PathBuf) -> Arc<Mutex<Slot>> {
    let mut map = TEMPLATE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    map.entry(key).or_default().clone()
}

/// Reads, compiles, and renders a template file.
///
/// A relative `path` resolves against the config's `root_dir`. With no
/// overrides this consults and populates the template cache; with
/// overrides it always reads and compiles fresh, overwriting the named
/// template variables (string-typed) before the first render.
pub fn render_file(
    path: &Path,
    overrides: &BTreeMap<String, String>,
    config: &CompilerConfig,
    settings: &RenderSettings,
) -> Result<String> {
    let path = resolve(path, config);
    if !overrides.is_empty() {
        log::debug!("override variables present, bypassing cache for {}", path.display());
        return compile_from_disk(&path, overrides, config, settings);
    }

    let key = normalize(&path);
    let slot = slot_for(key.clone());
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(rendered) = &slot.rendered {
        log::debug!("template cache hit for {}", key.display());
        return Ok(rendered.clone());
    }

    let rendered = compile_from_disk(&path, overrides, config, settings)?;
    slot.rendered = Some(rendered.clone());
    Ok(rendered)
}

fn compile_from_disk(
    path: &Path,
    overrides: &BTreeMap<String, String>,
    config: &CompilerConfig,
    settings: &RenderSettings,
) -> Result<String> {
    let source = fs::read_to_string(path)?;
    let mut template = mibml::parse_with_config(&source, config)?;
    for (name, value) in overrides {
        template.set_variable(name.clone(), value.clone());
    }

    let rendered = template.render(settings);
    if rendered.len() > MAX_OUTPUT_BYTES {
        return Err(LoaderError::OutputTooLarge {
            size: rendered.len(),
            limit: MAX_OUTPUT_BYTES,
        });
    }
    Ok(rendered)
}

/// Drops the cache entry for a path.
///
/// Called by file-watch facilities when the file changes on disk. The
/// path resolves against the config's `root_dir` exactly like
/// [`render_file`], so the same relative path hits the same entry.
pub fn evict(path: &Path, config: &CompilerConfig) {
    let key = normalize(&resolve(path, config));
    let mut map = TEMPLATE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if map.remove(&key).is_some() {
        log::debug!("evicted template cache entry for {}", key.display());
    }
}

/// Drops every cached template.
pub fn clear() {
    let mut map = TEMPLATE_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    map.clear();
}
