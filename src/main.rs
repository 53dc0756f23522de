use std::env;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tempfile::NamedTempFile;
use tracing::info;

use cachebust::core::{cachebust_file, cachebust_html, print_error_message, CachebustOptions};
use cachebust::env::EnvConfig;
use cachebust::logging::init_logging;
use cachebust::utils::fingerprint::DigestAlgorithm;

const STDIO_TARGET: &str = "-";

#[derive(Parser, Debug)]
#[command(
    name = "cachebust",
    version,
    about = "Adds content fingerprints to asset URLs in HTML so that browsers refetch changed files"
)]
struct Cli {
    /// Sets the directory that root-relative URLs ("/...") map to [default: working directory]
    #[arg(short, long, value_name = "DIR")]
    asset_root: Option<PathBuf>,

    /// Sets the directory that relative URLs are looked up in [default: working directory]
    #[arg(short, long, value_name = "DIR")]
    relative_root: Option<PathBuf>,

    /// Enforces custom input encoding
    #[arg(short, long, value_name = "UTF-8")]
    encoding: Option<String>,

    /// Sets the query parameter that carries the fingerprint [default: cachebust]
    #[arg(short, long, value_name = "NAME")]
    param: Option<String>,

    /// Sets the fingerprint digest: md5, sha256, sha384, sha512 [default: sha256]
    #[arg(long, value_name = "ALGORITHM")]
    algorithm: Option<DigestAlgorithm>,

    /// Sets the attribute of <link> tags that holds the asset URL [default: rel]
    #[arg(long, value_name = "NAME")]
    link_attr: Option<String>,

    /// Suppresses warnings about assets that were left unchanged
    #[arg(short, long)]
    quiet: bool,

    /// Writes output to <FILE>, use - for STDOUT
    #[arg(short, long, value_name = "FILE", default_value = STDIO_TARGET)]
    output: String,

    /// HTML file to cachebust, use - for STDIN
    #[arg(required = true)]
    input: String,
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    let env_config = match EnvConfig::from_env() {
        Ok(env_config) => env_config,
        Err(error) => {
            print_error_message(&format!("Error: {error}"));
            process::exit(1);
        }
    };

    let working_dir = match env::current_dir() {
        Ok(working_dir) => working_dir,
        Err(error) => {
            print_error_message(&format!("Error: unable to determine working directory: {error}"));
            process::exit(1);
        }
    };

    let options = build_options(&cli, env_config, working_dir);

    let result = if cli.input == STDIO_TARGET {
        read_stdin().and_then(|input_data| {
            cachebust_html(&input_data, &options).map_err(|error| error.to_string())
        })
    } else {
        cachebust_file(&cli.input, &options).map_err(|error| error.to_string())
    };

    let output_data = match result {
        Ok(output_data) => output_data,
        Err(error) => {
            print_error_message(&format!("Error: {error}"));
            process::exit(1);
        }
    };

    if let Err(error) = write_output(&cli.output, &output_data) {
        print_error_message(&format!("Error: could not write output: {error}"));
        process::exit(1);
    }

    if cli.output != STDIO_TARGET {
        info!("wrote {}", cli.output);
    }
}

// 命令行参数 > 环境变量 > 默认值；工作目录只在这里读取一次
fn build_options(cli: &Cli, env_config: EnvConfig, working_dir: PathBuf) -> CachebustOptions {
    let absolute = |path: PathBuf| {
        if path.is_absolute() {
            path
        } else {
            working_dir.join(path)
        }
    };

    CachebustOptions {
        asset_root: absolute(
            cli.asset_root
                .clone()
                .or(env_config.asset_root)
                .unwrap_or_else(|| working_dir.clone()),
        ),
        relative_root: absolute(
            cli.relative_root
                .clone()
                .unwrap_or_else(|| working_dir.clone()),
        ),
        encoding: cli.encoding.clone().or(env_config.encoding),
        quiet: cli.quiet || env_config.quiet,
        param_name: cli.param.clone().unwrap_or(env_config.param_name),
        algorithm: cli.algorithm.unwrap_or(env_config.algorithm),
        link_attribute: cli.link_attr.clone().unwrap_or(env_config.link_attribute),
    }
}

fn read_stdin() -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .map_err(|error| format!("failed to read STDIN: {error}"))?;
    Ok(buf)
}

fn write_output(destination: &str, data: &[u8]) -> io::Result<()> {
    if destination == STDIO_TARGET {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        return stdout.flush();
    }

    // 先写入同目录下的临时文件再替换，避免留下写了一半的输出
    let path = Path::new(destination);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.persist(path).map_err(|error| error.error)?;

    Ok(())
}
