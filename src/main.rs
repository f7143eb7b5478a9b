//! Purpose: `llui-host` CLI; stands in for the engine when exercising native plugins.
//! Role: Binary crate root; resolves a plugin, registers a null host bundle, relays the hooks.
//! Invariants: Successful commands print exactly one JSON object on stdout.
//! Invariants: Errors are emitted on stderr (JSON unless stderr is a terminal).
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::error::Error as StdError;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueHint};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use stub_llui_plugin::config::RelayConfig;
use stub_llui_plugin::core::pattern::PathPattern;
use stub_llui_plugin::host::HostRegistration;
use stub_llui_plugin::relay::{HookSource, NativeLibrary, PluginRelay};
use stub_llui_plugin::{Error, ErrorKind, to_exit_code};

#[derive(Parser)]
#[command(
    name = "llui-host",
    version,
    about = "Load native plugins and relay the host interface bundle to their lifecycle hooks",
    long_about = None
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Relay config file (JSON)",
        value_hint = ValueHint::FilePath
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a plugin, call `UnityPluginLoad`, then `UnityPluginUnload`, and report.
    Load {
        #[arg(help = "Library path, or a name expanded through the path pattern")]
        library: String,
        #[command(flatten)]
        resolve: ResolveArgs,
        #[arg(long, help = "Do not call UnityPluginUnload before releasing the library")]
        no_unload: bool,
        #[arg(long, help = "Fail when the library does not export UnityPluginLoad")]
        require_load_hook: bool,
    },
    /// Print the path a library name resolves to.
    Resolve {
        name: String,
        #[command(flatten)]
        resolve: ResolveArgs,
    },
}

#[derive(Args)]
struct ResolveArgs {
    #[arg(long, help = "Directory substituted for {assets}", value_hint = ValueHint::DirPath)]
    assets: Option<PathBuf>,
    #[arg(long, help = "Path pattern using {name}, {assets}, {proj}")]
    pattern: Option<String>,
}

impl ResolveArgs {
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(assets) = &self.assets {
            config.assets_dir = Some(assets.clone());
        }
        if let Some(pattern) = &self.pattern {
            config.path_pattern = Some(pattern.clone());
        }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::default(),
    };

    match cli.command {
        Command::Load {
            library,
            resolve,
            no_unload,
            require_load_hook,
        } => {
            resolve.apply(&mut config);
            if no_unload {
                config.call_unload_hook = false;
            }
            if require_load_hook {
                config.require_load_hook = true;
            }
            let path = resolve_library(&library, &config)?;
            let report = load_library(&library, &path, &config)?;
            emit_json(&report)
        }
        Command::Resolve { name, resolve } => {
            resolve.apply(&mut config);
            let path = config.pattern()?.resolve(&name, &config.assets_dir())?;
            emit_json(&json!({
                "name": name,
                "path": path.display().to_string(),
            }))
        }
    }
}

fn resolve_library(input: &str, config: &RelayConfig) -> Result<PathBuf, Error> {
    let candidate = Path::new(input);
    if input.contains(std::path::MAIN_SEPARATOR) || input.contains('/') || candidate.exists() {
        return Ok(candidate.to_path_buf());
    }
    let pattern: PathPattern = config.pattern()?;
    pattern.resolve(input, &config.assets_dir())
}

fn load_library(input: &str, path: &Path, config: &RelayConfig) -> Result<Value, Error> {
    let _host = HostRegistration::register();
    let relay = PluginRelay::from_registered()?
        .with_unload_hook(config.call_unload_hook)
        .with_required_load_hook(config.require_load_hook);

    let library = NativeLibrary::open(path)?;
    let load_hook = relay.attach(&library)?;
    let unload_hook = relay.detach(&library);

    Ok(json!({
        "library": input,
        "name": library.name(),
        "path": library.path().display().to_string(),
        "load_hook": load_hook,
        "unload_hook": unload_hook,
    }))
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let text = serde_json::to_string(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    println!("{text}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        for cause in error_causes(err) {
            eprintln!("  caused by: {cause}");
        }
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or(err.kind().as_str())),
    );
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(symbol) = err.symbol() {
        inner.insert("symbol".to_string(), json!(symbol));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        causes.push(source.to_string());
        current = source.source();
    }
    causes
}
