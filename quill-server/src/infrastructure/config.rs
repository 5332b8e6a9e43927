use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub session_secret: String,
    /// Posts per feed page.
    pub page_size: u32,
    /// Index page cache lifetime, seconds.
    pub index_cache_ttl_secs: u64,
    /// Directory uploaded post images are stored under.
    pub media_root: String,
    /// Upload size cap, bytes.
    pub max_image_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let session_secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set"))?;
        let page_size = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PAGE_SIZE: {}", e))?;
        let index_cache_ttl_secs = std::env::var("INDEX_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid INDEX_CACHE_TTL_SECS: {}", e))?;
        let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into());
        let max_image_bytes = std::env::var("MAX_IMAGE_BYTES")
            .unwrap_or_else(|_| "5242880".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid MAX_IMAGE_BYTES: {}", e))?;

        Ok(Self {
            host,
            port,
            database_url,
            session_secret,
            page_size,
            index_cache_ttl_secs,
            media_root,
            max_image_bytes,
        })
    }
}
