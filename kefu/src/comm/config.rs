use anyhow::{anyhow, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_CONFIG_MANAGER: RwLock<Option<Arc<ConfigManager>>> = RwLock::new(None);
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },
    #[error("配置项 '{key}' 不存在")]
    KeyNotFound { key: String },
    #[error("配置项 '{key}' 类型转换失败: {message}")]
    TypeConversionError { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 配置数据源信息
#[derive(Debug, Clone)]
pub struct ConfigSourceInfo {
    pub source_type: String,
    pub description: String,
    pub priority: u8,
    pub loaded: bool,
}

/// 配置管理器
///
/// 默认分层（后添加者优先生效）：
/// development.toml -> default.toml -> production.toml -> KEFU_* 环境变量
/// Layered sources (later wins):
/// development.toml -> default.toml -> production.toml -> KEFU_* env vars
pub struct ConfigManager {
    config: Config,
    sources_info: Vec<ConfigSourceInfo>,
}

impl ConfigManager {
    /// 创建配置管理器（仅默认配置源）
    pub fn new() -> Result<Self> {
        Self::with_sources(vec![])
    }

    /// 使用附加配置源创建配置管理器，附加源优先级高于默认源
    /// Build a manager with extra sources layered on top of the defaults
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self> {
        let mut builder = Config::builder();
        let mut sources_info = Vec::new();

        let default_sources = vec![
            ConfigSource::File {
                path: "config/development.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::File {
                path: "config/default.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::File {
                path: "config/production.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::Env {
                prefix: "KEFU".to_string(),
                separator: "_",
            },
        ];

        let mut priority = 1u8;

        // 预处理配置源：可选文件不存在时记录但不添加
        // Pre-check sources: optional missing files are recorded but skipped
        let mut valid_sources: Vec<(ConfigSource, ConfigSourceInfo)> = Vec::new();
        for source in default_sources.into_iter().chain(sources) {
            let source_info = source.get_source_info(priority);
            let should_add = match &source {
                ConfigSource::File { path, required, .. } => {
                    let file_exists = std::path::Path::new(path).exists();
                    if !file_exists && !required {
                        sources_info.push(ConfigSourceInfo {
                            loaded: false,
                            ..source_info.clone()
                        });
                        false
                    } else if !file_exists && *required {
                        return Err(anyhow!(ConfigError::FileNotFound { path: path.clone() }));
                    } else {
                        true
                    }
                }
                _ => true,
            };
            if should_add {
                valid_sources.push((source, source_info));
            }
            priority += 1;
        }

        for (source, source_info) in valid_sources {
            builder = source.add_to_builder(builder)?;
            sources_info.push(ConfigSourceInfo {
                loaded: true,
                ..source_info
            });
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self {
            config,
            sources_info,
        })
    }

    /// 获取指定 key 的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config
            .get(key)
            .map_err(|e| anyhow!("获取配置 '{}' 失败: {}", key, e))
    }

    /// 获取指定 key 的配置值，如果不存在返回默认值
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// 安全获取配置值，返回详细错误信息
    pub fn get_safe<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, ConfigError> {
        self.config.get(key).map_err(|e| {
            if e.to_string().contains("not found") {
                ConfigError::KeyNotFound {
                    key: key.to_string(),
                }
            } else {
                ConfigError::TypeConversionError {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// 获取字符串配置值
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }
    /// 获取整数配置值
    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.get(key)
    }
    /// 获取布尔配置值
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    /// 检查配置项是否存在
    pub fn exists(&self, key: &str) -> bool {
        self.config.get::<serde_json::Value>(key).is_ok()
    }

    /// 获取所有配置源信息
    pub fn get_sources_info(&self) -> &Vec<ConfigSourceInfo> {
        &self.sources_info
    }

    /// 获取配置源统计信息
    pub fn get_sources_stats(&self) -> (usize, usize, usize) {
        let total = self.sources_info.len();
        let loaded = self.sources_info.iter().filter(|info| info.loaded).count();
        let failed = total - loaded;
        (total, loaded, failed)
    }

    /// 打印配置源详细信息
    pub fn print_sources_info(&self) {
        println!("配置源信息:");
        println!("============");
        for (index, info) in self.sources_info.iter().enumerate() {
            let status = if info.loaded {
                "✓ 已加载"
            } else {
                "✗ 未加载"
            };
            println!(
                "{}. {} - {} (优先级: {})",
                index + 1,
                info.source_type,
                status,
                info.priority
            );
            println!("   描述: {}", info.description);
        }
        let (total, loaded, failed) = self.get_sources_stats();
        println!(
            "统计: 总计 {} 个配置源，成功 {} 个，失败 {} 个",
            total, loaded, failed
        );
    }
}

/// 配置源类型
pub enum ConfigSource {
    /// 文件配置源
    File {
        path: String,
        format: Option<FileFormat>,
        required: bool,
    },
    /// 环境变量配置源
    Env {
        prefix: String,
        separator: &'static str,
    },
    /// 字符串配置源（测试常用）
    String { content: String, format: FileFormat },
}

impl ConfigSource {
    /// 获取配置源信息
    pub fn get_source_info(&self, priority: u8) -> ConfigSourceInfo {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let format_str = match format {
                    Some(FileFormat::Toml) => "TOML",
                    Some(FileFormat::Yaml) => "YAML",
                    Some(FileFormat::Json) => "JSON",
                    None => "Auto-detect",
                    _ => "Unknown",
                };
                ConfigSourceInfo {
                    source_type: "File".to_string(),
                    description: format!(
                        "文件配置源: {} (格式: {}, 必需: {})",
                        path, format_str, required
                    ),
                    priority,
                    loaded: false,
                }
            }
            ConfigSource::Env { prefix, separator } => ConfigSourceInfo {
                source_type: "Environment".to_string(),
                description: format!("环境变量配置源: 前缀={}, 分隔符={}", prefix, separator),
                priority,
                loaded: false,
            },
            ConfigSource::String { format, .. } => {
                let format_str = match format {
                    FileFormat::Toml => "TOML",
                    FileFormat::Yaml => "YAML",
                    FileFormat::Json => "JSON",
                    _ => "Unknown",
                };
                ConfigSourceInfo {
                    source_type: "String".to_string(),
                    description: format!("字符串配置源: 格式={}", format_str),
                    priority,
                    loaded: false,
                }
            }
        }
    }

    pub fn add_to_builder(
        self,
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let file_source = if let Some(format) = format {
                    File::with_name(&path).format(format)
                } else {
                    File::with_name(&path)
                };
                Ok(builder.add_source(file_source.required(required)))
            }
            ConfigSource::Env { prefix, separator } => Ok(builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(separator)
                    .prefix_separator("_")
                    .ignore_empty(true),
            )),
            ConfigSource::String { content, format } => {
                Ok(builder.add_source(File::from_str(&content, format)))
            }
        }
    }
}

/// 显式初始化全局配置管理器，可传入命令行指定的配置文件
/// Explicitly initialize the global manager, optionally with a CLI-given file
pub fn init_global_config_manager(extra_file: Option<&str>) -> Result<Arc<ConfigManager>> {
    let sources = match extra_file {
        Some(path) => vec![ConfigSource::File {
            path: path.to_string(),
            format: None,
            required: true,
        }],
        None => vec![],
    };
    let manager = Arc::new(ConfigManager::with_sources(sources)?);
    let mut slot = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    *slot = Some(Arc::clone(&manager));
    Ok(manager)
}

/// 获取全局配置管理器实例（单例模式，未初始化时按默认源创建）
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let manager = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("读取全局配置管理器锁失败: {}", e))?;
        if let Some(ref config_manager) = *manager {
            return Ok(Arc::clone(config_manager));
        }
    }
    let mut manager = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    if manager.is_none() {
        let config_manager = Arc::new(ConfigManager::new()?);
        *manager = Some(Arc::clone(&config_manager));
        Ok(config_manager)
    } else {
        Ok(Arc::clone(manager.as_ref().unwrap()))
    }
}

/// 全局配置获取函数（使用单例）
pub fn get_config<T: DeserializeOwned>(key: &str) -> Result<T> {
    let manager = get_global_config_manager()?;
    manager.get(key)
}
