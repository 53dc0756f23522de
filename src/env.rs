//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量配置；命令行参数优先于这里的值

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::core::{DEFAULT_LINK_ATTRIBUTE, DEFAULT_PARAM_NAME};
use crate::utils::fingerprint::DigestAlgorithm;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "CACHEBUST_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// cachebust 行为相关环境变量
pub mod cachebust {
    use super::*;

    /// 根路径 `/` 对应的目录
    pub struct AssetRoot;
    impl EnvVar<PathBuf> for AssetRoot {
        const NAME: &'static str = "CACHEBUST_ASSET_ROOT";
        const DEFAULT: Option<PathBuf> = None;
        const DESCRIPTION: &'static str =
            "Directory that root-relative asset URLs map to (default: working directory)";

        fn parse(value: &str) -> EnvResult<PathBuf> {
            if value.trim().is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path must not be empty".to_string(),
                });
            }
            Ok(PathBuf::from(value))
        }
    }

    /// 输入文档编码
    pub struct Encoding;
    impl EnvVar<String> for Encoding {
        const NAME: &'static str = "CACHEBUST_ENCODING";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Input document encoding (default: detected from the document, else utf-8)";

        fn parse(value: &str) -> EnvResult<String> {
            if encoding_rs::Encoding::for_label_no_replacement(value.trim().as_bytes()).is_none() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Unknown encoding '{}'", value),
                });
            }
            Ok(value.trim().to_string())
        }
    }

    /// 静默模式
    pub struct Quiet;
    impl EnvVar<bool> for Quiet {
        const NAME: &'static str = "CACHEBUST_QUIET";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Suppress warnings about assets that were left unchanged";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 指纹查询参数名
    pub struct Param;
    impl EnvVar<String> for Param {
        const NAME: &'static str = "CACHEBUST_PARAM";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(DEFAULT_PARAM_NAME.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Query parameter that carries the fingerprint";

        fn parse(value: &str) -> EnvResult<String> {
            parse_name(value, Self::NAME)
        }
    }

    /// 指纹哈希算法
    pub struct Algorithm;
    impl EnvVar<DigestAlgorithm> for Algorithm {
        const NAME: &'static str = "CACHEBUST_ALGORITHM";
        const DEFAULT: Option<DigestAlgorithm> = Some(DigestAlgorithm::Sha256);
        const DESCRIPTION: &'static str = "Fingerprint digest: md5, sha256, sha384, sha512";

        fn parse(value: &str) -> EnvResult<DigestAlgorithm> {
            value.parse().map_err(|message| EnvError {
                variable: Self::NAME.to_string(),
                message,
            })
        }
    }

    /// `<link>` 标签使用的属性
    pub struct LinkAttribute;
    impl EnvVar<String> for LinkAttribute {
        const NAME: &'static str = "CACHEBUST_LINK_ATTR";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(DEFAULT_LINK_ATTRIBUTE.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Attribute of <link> tags holding the asset URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_name(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_name(value: &str, var_name: &str) -> EnvResult<String> {
    let value = value.trim();
    if value.is_empty() || value.contains(|c: char| c.is_whitespace() || "&=#?".contains(c)) {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid name '{}'", value),
        });
    }
    Ok(value.to_string())
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: String,
    pub no_color: bool,

    // cachebust 配置
    pub asset_root: Option<PathBuf>,
    pub encoding: Option<String>,
    pub quiet: bool,
    pub param_name: String,
    pub algorithm: DigestAlgorithm,
    pub link_attribute: String,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,
            no_color: core::NoColor::get()?,

            asset_root: optional::<cachebust::AssetRoot, _>()?,
            encoding: optional::<cachebust::Encoding, _>()?,
            quiet: cachebust::Quiet::get()?,
            param_name: cachebust::Param::get()?,
            algorithm: cachebust::Algorithm::get()?,
            link_attribute: cachebust::LinkAttribute::get()?,
        })
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("Environment Configuration Summary:");
        println!("  Log Level: {}", self.log_level);
        match &self.asset_root {
            Some(asset_root) => println!("  Asset Root: {}", asset_root.display()),
            None => println!("  Asset Root: [working directory]"),
        }
        println!("  Encoding: {}", self.encoding.as_deref().unwrap_or("[detect]"));
        println!("  Param: {}", self.param_name);
        println!("  Algorithm: {}", self.algorithm);
        println!("  Link Attribute: {}", self.link_attribute);
    }
}

/// Unset variables without a default are `None`, malformed ones are still errors
fn optional<V: EnvVar<T>, T>() -> EnvResult<Option<T>> {
    match env::var(V::NAME) {
        Ok(value) => V::parse(&value).map(Some),
        Err(_) => Ok(None),
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        "info"
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT
    ));

    docs.push_str("\n## Cachebust Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {}\n",
        cachebust::AssetRoot::NAME,
        cachebust::AssetRoot::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {}\n",
        cachebust::Encoding::NAME,
        cachebust::Encoding::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cachebust::Quiet::NAME,
        cachebust::Quiet::DESCRIPTION,
        cachebust::Quiet::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cachebust::Param::NAME,
        cachebust::Param::DESCRIPTION,
        DEFAULT_PARAM_NAME
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {})\n",
        cachebust::Algorithm::NAME,
        cachebust::Algorithm::DESCRIPTION,
        DigestAlgorithm::default()
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        cachebust::LinkAttribute::NAME,
        cachebust::LinkAttribute::DESCRIPTION,
        DEFAULT_LINK_ATTRIBUTE
    ));

    docs
}
