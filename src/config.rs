use serde::Deserialize;

/// Which persistence backend the engine writes through to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, lost on exit
    Memory,
    /// One JSON file per key under `store_dir`
    File,
    /// Redis instance at `redis_url`
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Persistence backend
    #[serde(default = "default_store_backend")]
    pub store_backend: StoreBackend,

    /// Directory used by the file backend
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Optional namespace (profile id) prefixed to every store key
    #[serde(default)]
    pub profile_namespace: Option<String>,

    /// Keep "liked" and "my list" membership in lockstep
    #[serde(default)]
    pub mirror_likes_and_list: bool,

    /// Maximum titles per "because you watched" row
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// JSON catalog to load; an empty catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<String>,
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::File
}

fn default_store_dir() -> String {
    ".marquee".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_recommendation_limit() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: default_store_backend(),
            store_dir: default_store_dir(),
            redis_url: default_redis_url(),
            profile_namespace: None,
            mirror_likes_and_list: false,
            recommendation_limit: default_recommendation_limit(),
            catalog_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
