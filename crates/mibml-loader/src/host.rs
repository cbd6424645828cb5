//! Optional host-runtime integration.
//!
//! The game client, when present, can resolve template names through its
//! asset-pack machinery. The compiler never talks to the host directly;
//! loaders accept an `Option<&dyn HostAdapter>` and a missing host simply
//! degrades to the file-system fallback.

use std::path::{Path, PathBuf};

/// Capabilities the host runtime may provide.
///
/// Both lookups return `None` when the host cannot resolve the name;
/// there is no error channel here on purpose — host absence is a normal
/// state, not a failure.
pub trait HostAdapter {
    /// Resolves a template or asset name to an on-disk path.
    fn resolve_asset_path(&self, name: &str) -> Option<PathBuf>;

    /// Locates the asset pack that ships a given template.
    fn find_asset_pack(&self, name: &str) -> Option<PathBuf>;
}

/// Finds the default-asset copy of `file_name`.
///
/// Asks the host first; without a host (or when it cannot resolve the
/// name) falls back to `fallback_dir`.
pub fn default_asset_path(
    host: Option<&dyn HostAdapter>,
    file_name: &str,
    fallback_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(host) = host {
        if let Some(path) = host.resolve_asset_path(file_name) {
            return Some(path);
        }
        if let Some(pack) = host.find_asset_pack(file_name) {
            return Some(pack.join(file_name));
        }
    }
    let candidate = fallback_dir?.join(file_name);
    candidate.exists().then_some(candidate)
}
