use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "PORTFOLIO_ROOT";
pub const DATA_DIR_ENV: &str = "PORTFOLIO_DATA_DIR";
const APP_DIR_NAME: &str = "portfolio-chat";

/// Filesystem locations the server reads config from and writes logs to.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub project_root: PathBuf,
    pub user_data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub secrets_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let lookup = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        let project_root = resolve_project_root(&lookup);
        let user_data_dir = resolve_data_dir(&project_root, &lookup);
        Self::from_dirs(project_root, user_data_dir)
    }

    /// Paths under explicit directories. The data and log dirs are created
    /// if missing; failure surfaces later when logging or reading config.
    pub fn from_dirs(project_root: PathBuf, user_data_dir: PathBuf) -> Self {
        let log_dir = user_data_dir.join("logs");
        let secrets_path = user_data_dir.join("secrets.yaml");

        if let Err(err) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create {}: {}", log_dir.display(), err);
        }

        AppPaths {
            project_root,
            user_data_dir,
            log_dir,
            secrets_path,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_project_root(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(root) = lookup(ROOT_ENV) {
        return PathBuf::from(root);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if manifest_dir.join("config.yml").exists() {
        return manifest_dir;
    }

    env::current_dir().unwrap_or(manifest_dir)
}

/// Debug builds keep everything next to the checkout.
fn resolve_data_dir(project_root: &Path, lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = lookup(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if cfg!(debug_assertions) {
        return project_root.to_path_buf();
    }
    platform_data_dir(lookup).join(APP_DIR_NAME)
}

fn platform_data_dir(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let home = lookup("HOME")
        .or_else(|| lookup("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    if cfg!(target_os = "windows") {
        return lookup("LOCALAPPDATA").map(PathBuf::from).unwrap_or(home);
    }
    if cfg!(target_os = "macos") {
        return home.join("Library").join("Application Support");
    }
    lookup("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home.join(".local").join("share"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_take_precedence() {
        let lookup = lookup_from(&[(ROOT_ENV, "/srv/portfolio"), (DATA_DIR_ENV, "/var/lib/portfolio")]);
        let root = resolve_project_root(&lookup);
        assert_eq!(root, PathBuf::from("/srv/portfolio"));
        assert_eq!(resolve_data_dir(&root, &lookup), PathBuf::from("/var/lib/portfolio"));
    }

    #[test]
    fn from_dirs_creates_log_dir_under_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = dir.path().join("data");
        let paths = AppPaths::from_dirs(dir.path().to_path_buf(), data.clone());

        assert_eq!(paths.log_dir, data.join("logs"));
        assert_eq!(paths.secrets_path, data.join("secrets.yaml"));
        assert!(paths.log_dir.is_dir());
    }

    #[test]
    fn debug_builds_use_project_root_for_data() {
        if !cfg!(debug_assertions) {
            return;
        }
        let root = PathBuf::from("/checkout");
        assert_eq!(resolve_data_dir(&root, &lookup_from(&[])), root);
    }
}
