use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub url: String,
    pub key: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_api_proxy")]
    pub api_proxy: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_hero_count")]
    pub hero_count: usize,
    #[serde(default = "default_latest_count")]
    pub latest_count: usize,
    #[serde(default)]
    pub cloud: Option<CloudConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: komik_home().join("config.yml"),
            port: default_port(),
            api_proxy: default_api_proxy(),
            api_base: default_api_base(),
            backend_url: None,
            storage_path: default_storage_path(),
            database_path: default_database_path(),
            hero_count: default_hero_count(),
            latest_count: default_latest_count(),
            cloud: None,
        }
    }
}

fn komik_home() -> PathBuf {
    match std::env::var("KOMIK_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".komik"),
    }
}

fn default_port() -> u16 {
    8080
}

fn default_api_proxy() -> String {
    "https://api.nekolabs.web.id/px".to_string()
}

fn default_api_base() -> String {
    "https://www.sankavollerei.com/comic/komikcast".to_string()
}

fn default_storage_path() -> String {
    komik_home().join("storage").display().to_string()
}

fn default_database_path() -> String {
    komik_home().join("komik.db").display().to_string()
}

fn default_hero_count() -> usize {
    5
}

fn default_latest_count() -> usize {
    12
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => komik_home().join("config.yml"),
        };

        match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    /// Base url of the slug/id backend, this server unless configured
    pub fn backend_url(&self) -> String {
        self.backend_url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", self.port))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_open_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let cfg = Config::open(Some(&path)).unwrap();

        assert!(path.exists());
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.hero_count, 5);
        assert_eq!(cfg.backend_url(), "http://127.0.0.1:8080");
        assert!(cfg.cloud.is_none());
    }

    #[test]
    fn test_open_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(
            &path,
            "port: 9000\nbackend_url: http://ids.local\ncloud:\n  url: https://cloud.local\n  key: anon\n",
        )
        .unwrap();

        let cfg = Config::open(Some(&path)).unwrap();

        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.backend_url(), "http://ids.local");
        assert_eq!(cfg.latest_count, 12);
        assert_eq!(
            cfg.cloud,
            Some(CloudConfig {
                url: "https://cloud.local".to_string(),
                key: "anon".to_string(),
                access_token: None,
            })
        );
    }
}
