//! 环境变量文档生成工具
//!
//! 输出所有环境变量的 Markdown 文档，以及当前环境下解析出的配置

use cachebust::env::{self, EnvConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", env::generate_env_docs());
    EnvConfig::from_env()?.print_summary();
    Ok(())
}
