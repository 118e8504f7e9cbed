use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration, from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "study-hub")]
#[command(about = "Study materials tree with file uploads")]
pub struct Config {
    /// Listen address
    #[arg(long, env = "STUDY_HUB_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Directory holding materials.json and the uploads/ sandbox
    #[arg(long, env = "STUDY_HUB_DATA_DIR", default_value = "storage")]
    pub data_dir: PathBuf,

    /// Comma separated origins allowed by CORS; any origin when unset
    #[arg(long, env = "STUDY_HUB_CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: data_dir.into(),
            cors_origin: None,
        }
    }

    pub fn materials_path(&self) -> PathBuf {
        self.data_dir.join("materials.json")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["study-hub"]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("storage"));
        assert_eq!(config.materials_path(), PathBuf::from("storage/materials.json"));
        assert_eq!(config.uploads_dir(), PathBuf::from("storage/uploads"));
    }

    #[test]
    fn flags_override() {
        let config = Config::try_parse_from([
            "study-hub",
            "--addr",
            "0.0.0.0:9000",
            "--data-dir",
            "/srv/study",
            "--cors-origin",
            "http://localhost:5173",
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.uploads_dir(), PathBuf::from("/srv/study/uploads"));
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
    }
}
