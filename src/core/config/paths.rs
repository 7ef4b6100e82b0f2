use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known locations of everything the service reads or writes.
///
/// The index and metadata files are produced together by `build-index` and
/// must always be regenerated as a pair.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub config_path: PathBuf,
    pub faqs_path: PathBuf,
    pub index_path: PathBuf,
    pub metadata_path: PathBuf,
    pub leads_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        let mut paths = Self::with_data_dir(data_dir);

        if let Ok(path) = env::var("FAQBOT_CONFIG_PATH") {
            paths.config_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("FAQBOT_FAQS_PATH") {
            paths.faqs_path = PathBuf::from(path);
        }

        paths
    }

    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let log_dir = data_dir.join("logs");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            config_path: data_dir.join("config.yml"),
            faqs_path: data_dir.join("faqs.json"),
            index_path: data_dir.join("faq_index.bin"),
            metadata_path: data_dir.join("metadata.json"),
            leads_path: data_dir.join("leads.csv"),
            log_dir,
            data_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("FAQBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
