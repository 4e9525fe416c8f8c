use anyhow::Result;

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Clone)]
pub struct StorageConfig {
    pub backend: String,
}

/// 读取服务端配置快照 / Snapshot the server configuration
pub fn load() -> Result<(ServerConfig, StorageConfig)> {
    let cm = kefu::get_global_config_manager()?;
    Ok((
        ServerConfig {
            host: cm.get_or("server.host", "0.0.0.0".to_string()),
            port: cm.get_or("server.port", 3000_i64) as u16,
            workers: cm.get_int("server.workers").ok().map(|w| w as usize),
        },
        StorageConfig {
            backend: cm.get_or("storage.backend", "memory".to_string()),
        },
    ))
}
