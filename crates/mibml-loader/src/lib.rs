//! # mibml-loader — file-backed template loading
//!
//! The compiler core ([`mibml`]) is a pure text transform. This crate
//! adds the disk-facing collaborators around it:
//!
//! - a process-wide **template cache** keyed by normalized path, with
//!   per-path coalescing and eviction hooks for file watchers
//! - the **output/input resolution** contract: prefer the editable
//!   output copy, fall back to copying the shipped default asset once
//! - an optional **host adapter** for asset-pack resolution; a missing
//!   host degrades to plain file-system lookups
//! - the 4 MiB **output cap** enforced before delivery
//!
//! ## Example
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use mibml::{CompilerConfig, RenderSettings};
//! use mibml_loader::{render_file, resolve_template_file};
//!
//! let path = resolve_template_file("Login.html", None, Some("assets".as_ref()))?;
//! let dsl = render_file(
//!     &path,
//!     &BTreeMap::new(),
//!     &CompilerConfig::default(),
//!     &RenderSettings::default(),
//! )?;
//! # Ok::<(), mibml_loader::LoaderError>(())
//! ```

pub mod cache;
pub mod error;
pub mod host;
pub mod loader;

pub use cache::{MAX_OUTPUT_BYTES, clear, evict, render_file};
pub use error::{LoaderError, Result};
pub use host::{HostAdapter, default_asset_path};
pub use loader::resolve_template_file;
