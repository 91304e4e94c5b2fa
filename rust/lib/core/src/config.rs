use std::path::{Path, PathBuf};

/// Where the server keeps its files, and where it listens.
///
/// Explicit paths win; otherwise everything lands under `data_dir`
/// (`data.redb` for the catalog store, `blobs/` for uploaded images,
/// `visitors/` for per-visitor storefront state).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub blob_dir: Option<PathBuf>,
    pub visitor_dir: Option<PathBuf>,
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            blob_dir: None,
            visitor_dir: None,
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| self.under_data_dir("data.redb"))
    }

    pub fn resolve_blob_dir(&self) -> PathBuf {
        self.blob_dir.clone().unwrap_or_else(|| self.under_data_dir("blobs"))
    }

    pub fn resolve_visitor_dir(&self) -> PathBuf {
        self.visitor_dir.clone().unwrap_or_else(|| self.under_data_dir("visitors"))
    }

    fn under_data_dir(&self, name: &str) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join(name),
            None => Path::new(name).to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_data_dir() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/var/lib/ementa")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/var/lib/ementa/data.redb"));
        assert_eq!(config.resolve_blob_dir(), PathBuf::from("/var/lib/ementa/blobs"));
        assert_eq!(config.resolve_visitor_dir(), PathBuf::from("/var/lib/ementa/visitors"));
        assert_eq!(config.listen, "0.0.0.0:8080");
    }

    #[test]
    fn explicit_paths_win() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/var/lib/ementa")),
            db_path: Some(PathBuf::from("/mnt/fast/menu.redb")),
            blob_dir: Some(PathBuf::from("/srv/images")),
            visitor_dir: Some(PathBuf::from("/run/ementa/visitors")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/mnt/fast/menu.redb"));
        assert_eq!(config.resolve_blob_dir(), PathBuf::from("/srv/images"));
        assert_eq!(config.resolve_visitor_dir(), PathBuf::from("/run/ementa/visitors"));
    }

    #[test]
    fn without_data_dir_paths_are_relative() {
        let config = ServiceConfig::default();
        assert_eq!(config.resolve_db_path(), PathBuf::from("data.redb"));
        assert_eq!(config.resolve_blob_dir(), PathBuf::from("blobs"));
    }
}
