//! 配置加载器实现
//!
//! 提供TOML配置文件解析、变量替换和错误处理功能

use crate::config::types::{validate_config, PanelConfig, ServiceDescriptor};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<PanelConfig>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<PanelConfig>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<PanelConfig>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<PanelConfig>;

    /// 验证配置
    fn validate(&self, config: &PanelConfig) -> Result<()>;
}

/// TOML配置加载器实现
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// `[variables]` 中找不到的变量是否回退到环境变量
    enable_env_fallback: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    ///
    /// 关闭环境变量回退时，未定义的 `${NAME}` 原样保留，交给 shell 展开。
    ///
    /// # 参数
    /// * `enable_env_fallback` - 是否启用环境变量回退
    pub fn new(enable_env_fallback: bool) -> Self {
        Self {
            enable_env_fallback,
        }
    }

    /// 解析TOML内容并展开命令中的变量
    fn parse_toml(&self, content: &str) -> Result<PanelConfig> {
        let mut config: PanelConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        let expander = VarExpander::new(&config.variables, self.enable_env_fallback)?;
        for service in &mut config.services {
            expander.expand_descriptor(service)?;
            service.apply_roles().map_err(ConfigError::ValidationError)?;
        }

        for service in &config.services {
            if service.has_partial_probe() {
                log::warn!(
                    "服务 {} 只配置了 status_command 或 expected_status_output 之一，将不会探测状态",
                    service.name
                );
            }
        }

        Ok(config)
    }
}

/// `${NAME}` 变量展开器
struct VarExpander<'a> {
    pattern: Regex,
    variables: &'a HashMap<String, String>,
    env_fallback: bool,
}

impl<'a> VarExpander<'a> {
    fn new(variables: &'a HashMap<String, String>, env_fallback: bool) -> Result<Self> {
        let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        Ok(Self {
            pattern,
            variables,
            env_fallback,
        })
    }

    fn expand_descriptor(&self, service: &mut ServiceDescriptor) -> Result<()> {
        if let Some(cmd) = service.status_command.as_mut() {
            *cmd = self.expand(cmd)?;
        }
        service.start_command = self.expand(&service.start_command)?;
        service.stop_command = self.expand(&service.stop_command)?;
        for action in &mut service.actions {
            action.command = self.expand(&action.command)?;
        }
        Ok(())
    }

    fn expand(&self, text: &str) -> Result<String> {
        self.expand_with_stack(text, &mut Vec::new())
    }

    fn expand_with_stack(&self, text: &str, stack: &mut Vec<String>) -> Result<String> {
        let mut result = String::with_capacity(text.len());
        let mut last = 0;

        for captures in self.pattern.captures_iter(text) {
            let full_match = captures.get(0).map(|m| (m.start(), m.end()));
            let Some((start, end)) = full_match else {
                continue;
            };
            let var_name = &captures[1];

            result.push_str(&text[last..start]);
            match self.resolve(var_name, stack)? {
                Some(value) => result.push_str(&value),
                None => result.push_str(&text[start..end]),
            }
            last = end;
        }

        result.push_str(&text[last..]);
        Ok(result)
    }

    /// 解析单个变量；返回 None 表示保留原文
    fn resolve(&self, name: &str, stack: &mut Vec<String>) -> Result<Option<String>> {
        if stack.iter().any(|n| n == name) {
            return Err(ConfigError::ParseError(format!(
                "变量循环引用: {} -> {}",
                stack.join(" -> "),
                name
            ))
            .into());
        }

        if let Some(raw) = self.variables.get(name) {
            stack.push(name.to_string());
            let expanded = self.expand_with_stack(raw, stack);
            stack.pop();
            return expanded.map(Some);
        }

        if !self.env_fallback {
            return Ok(None);
        }

        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(ConfigError::VarError {
                var: name.to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<PanelConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.parse_toml(&content)?;
        self.validate(&config)?;

        log::info!("成功加载配置文件: {}", path.display());
        log::debug!("配置内容: {:?}", config);

        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<PanelConfig> {
        let config = self.parse_toml(content)?;
        self.validate(&config)?;

        log::debug!("成功解析配置字符串");

        Ok(config)
    }

    fn validate(&self, config: &PanelConfig) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 获取默认配置文件路径
///
/// 当前目录存在 `service-panel.toml` 时优先使用，否则为
/// `<config_dir>/service-panel/config.toml`。
pub fn get_default_config_path() -> std::path::PathBuf {
    if Path::new("service-panel.toml").exists() {
        return std::path::PathBuf::from("service-panel.toml");
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join("service-panel").join("config.toml"))
        .unwrap_or_else(|| std::path::PathBuf::from("service-panel.toml"))
}
