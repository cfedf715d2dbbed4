use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use chainshift_engine::{
    assemble_suites, collect_commands, CommandRegistry, Diagnostic, EmitCx, DRIVER_CLASS,
};

#[derive(Parser)]
#[command(name = "chainshift", version, about = "Converts fluent browser-test suites to Java/Selenium")]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Convert a test suite file into one Java class per suite
    Convert {
        /// Suite file to convert
        file: PathBuf,

        /// Directory for generated .java files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Custom-command registry produced by a prior collect run
        #[arg(long, default_value = "commands.list")]
        registry: PathBuf,

        /// Print the parsed AST as JSON and exit without generating
        #[arg(long)]
        dump_ast: bool,
    },
    /// Collect custom command definitions into a driver subclass and
    /// update the registry
    Collect {
        /// Command-definitions file to scan
        file: PathBuf,

        /// Directory for the generated driver subclass
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Registry file to update (order preserved)
        #[arg(long, default_value = "commands.list")]
        registry: PathBuf,
    },
}

/// Emitted-file boilerplate. Generated code references these types; the
/// core never emits imports itself.
const TEST_FILE_HEADER: &str = "\
import java.net.HttpURLConnection;
import java.net.URL;
import java.util.List;

import org.json.JSONObject;
import org.junit.After;
import org.junit.Assert;
import org.junit.Before;
import org.junit.Test;
import org.openqa.selenium.By;
import org.openqa.selenium.Keys;
import org.openqa.selenium.NoSuchElementException;
import org.openqa.selenium.WebDriver;
import org.openqa.selenium.WebElement;
import org.openqa.selenium.chrome.ChromeDriver;

";

const DRIVER_FILE_HEADER: &str = "\
import org.openqa.selenium.By;
import org.openqa.selenium.Keys;
import org.openqa.selenium.WebElement;
import org.openqa.selenium.chrome.ChromeDriver;

";

fn main() -> Result<()> {
    // Log to stderr so stdout stays usable for --dump-ast output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.mode {
        Mode::Convert {
            file,
            out_dir,
            registry,
            dump_ast,
        } => convert(&file, &out_dir, &registry, dump_ast),
        Mode::Collect {
            file,
            out_dir,
            registry,
        } => collect(&file, &out_dir, &registry),
    }
}

fn parse_file(path: &Path) -> Result<chainshift_parser::Program> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    chainshift_parser::parse(&source)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn load_registry(path: &Path) -> Result<CommandRegistry> {
    if !path.exists() {
        return Ok(CommandRegistry::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read registry {}", path.display()))?;
    Ok(CommandRegistry::parse(&content))
}

fn persist_registry(path: &Path, registry: &CommandRegistry) -> Result<()> {
    fs::write(path, registry.to_file_string())
        .with_context(|| format!("failed to write registry {}", path.display()))
}

fn report_gaps(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        tracing::warn!("translation gap: {} in `{}`", diag.reason, diag.call_text);
    }
    if !diagnostics.is_empty() {
        tracing::warn!(
            "{} construct(s) need hand-finishing, marked UNSUPPORTED in output",
            diagnostics.len()
        );
    }
}

fn convert(file: &Path, out_dir: &Path, registry_path: &Path, dump_ast: bool) -> Result<()> {
    let program = parse_file(file)?;

    if dump_ast {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let registry = load_registry(registry_path)?;
    if !registry.is_empty() {
        tracing::info!("loaded {} custom command(s) from registry", registry.len());
    }

    let mut cx = EmitCx::new();
    let result = assemble_suites(&program, &mut cx, &registry);
    if result.classes.is_empty() {
        tracing::warn!("no describe() suites found in {}", file.display());
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for class in &result.classes {
        let path = out_dir.join(format!("{}.java", class.class_name));
        let mut content = String::from(TEST_FILE_HEADER);
        content.push_str(&class.code);
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("wrote {}", path.display());
    }

    report_gaps(&result.diagnostics);
    Ok(())
}

fn collect(file: &Path, out_dir: &Path, registry_path: &Path) -> Result<()> {
    let program = parse_file(file)?;
    let mut registry = load_registry(registry_path)?;
    let mut cx = EmitCx::new();

    let result = collect_commands(&program, &mut registry, &mut cx)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.java", DRIVER_CLASS));
    let mut content = String::from(DRIVER_FILE_HEADER);
    content.push_str(&result.class_code);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {}", path.display());

    persist_registry(registry_path, &registry)?;
    tracing::info!(
        "registry now holds {} command(s) at {}",
        registry.len(),
        registry_path.display()
    );

    report_gaps(&result.diagnostics);
    Ok(())
}
