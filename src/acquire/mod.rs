//! Template acquisition.
//!
//! Materializes a classified template on disk:
//! - [`vcs`] clones repositories and SSH remotes into the target
//! - [`registry`] installs packages into the shared cache directory
//!
//! Collaborator failures are logged with the template identifier and
//! returned wrapped, with the original error kept as the source.

pub mod registry;
pub mod vcs;

pub use registry::{
    acquire_from_registry, cache_module_path, InstallOptions, NpmClient, PackageManager,
};
pub use vcs::{acquire_from_vcs, find_config_dir, GitClient, VersionControl, CONFIG_DIR};

/// Files that mark a directory as a loadable setup module.
pub const ENTRY_FILES: &[&str] = &["index.yml", "index.yaml", "index.json", "index.sh", "index"];

/// Manifest that can name an alternate entry file via `main`.
pub const MANIFEST_FILE: &str = "package.json";
