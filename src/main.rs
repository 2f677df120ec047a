use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;

use tokenmark::config::{Config, OutputFormat};
use tokenmark::{check_document, rehydrate, tokenize};

mod cli;
use cli::{Cli, Commands};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd"];

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: Option<&Path>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, input: Option<&Path>) -> io::Result<Config> {
    let start_dir = start_dir_for(input)?;
    let (cfg, cfg_path) = tokenmark::config::load(explicit, &start_dir)?;
    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }
    Ok(cfg)
}

fn tokenize_or_exit(input: &str, cfg: Config, file: Option<&PathBuf>) -> Vec<tokenmark::MarkdownToken> {
    match tokenize(input, Some(cfg)) {
        Ok(tokens) => tokens,
        Err(e) => {
            let name = file.and_then(|p| p.to_str()).unwrap_or("<stdin>");
            eprintln!("\x1b[31merror\x1b[0m: {name}: {e}");
            std::process::exit(1);
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Expand directories into the Markdown files below them. Explicit file
/// arguments are kept whatever their extension.
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in ignore::WalkBuilder::new(path).build() {
            match entry {
                Ok(entry) => {
                    let p = entry.path();
                    if p.is_file() && is_markdown(p) {
                        files.push(p.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Skipping entry: {e}"),
            }
        }
    }
    files.sort();
    files
}

fn run_check(paths: Vec<PathBuf>, explicit: Option<&Path>) -> io::Result<bool> {
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };
    let files = collect_files(&paths);
    log::debug!("Checking {} file(s)", files.len());

    let results: Vec<(PathBuf, io::Result<Vec<tokenmark::Problem>>)> = files
        .into_par_iter()
        .map(|file| {
            let result = load_config(explicit, Some(&file)).and_then(|cfg| {
                let input = fs::read_to_string(&file)?;
                Ok(check_document(&input, &cfg))
            });
            (file, result)
        })
        .collect();

    let mut failed = 0;
    for (file, result) in &results {
        match result {
            Ok(problems) if problems.is_empty() => {}
            Ok(problems) => {
                failed += 1;
                for problem in problems {
                    println!("\x1b[31merror\x1b[0m: {}: {problem}", file.display());
                }
            }
            Err(e) => {
                failed += 1;
                println!("\x1b[31merror\x1b[0m: {}: {e}", file.display());
            }
        }
    }

    if failed == 0 {
        println!("Checked {} file(s), no problems found", results.len());
    } else {
        println!("\n{failed} of {} file(s) failed", results.len());
    }
    Ok(failed == 0)
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tokens { file, json } => {
            let cfg = load_config(cli.config.as_deref(), file.as_deref())?;
            let as_json = json || cfg.output == OutputFormat::Json;
            let input = read_all(file.as_ref())?;
            let tokens = tokenize_or_exit(&input, cfg, file.as_ref());

            if as_json {
                let out = serde_json::to_string_pretty(&tokens).map_err(io::Error::other)?;
                println!("{out}");
            } else {
                for token in &tokens {
                    println!("{token}");
                }
            }
            Ok(())
        }
        Commands::Check { paths } => {
            if !run_check(paths, cli.config.as_deref())? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Rehydrate { file } => {
            let cfg = load_config(cli.config.as_deref(), file.as_deref())?;
            let input = read_all(file.as_ref())?;
            let tokens = tokenize_or_exit(&input, cfg, file.as_ref());
            print!("{}", rehydrate(&tokens));
            Ok(())
        }
    }
}
