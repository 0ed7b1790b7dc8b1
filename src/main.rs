use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use resource_bundle::config::DEFAULT_CONFIG_FILE;
use resource_bundle::logging::init_logging;
use resource_bundle::{
  Context, DependencyStore, JsonDependencyStore, MemoryDependencyStore, ModuleRegistry,
  ModuleServices, ResourceModule,
};

/// Resolve configured script and style modules for a request context.
#[derive(Debug, Parser)]
#[command(name = "resource-bundle", version, about)]
struct Cli {
  /// Registry file (JSON or YAML) defining server paths and modules. Without it, the
  /// default registry file in the current directory is used when present.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Override the install root from the registry.
  #[arg(long)]
  install_root: Option<PathBuf>,

  /// Override the public base path from the registry.
  #[arg(long)]
  public_base_path: Option<String>,

  /// JSON file persisting style dependency records; in-memory when omitted.
  #[arg(long)]
  deps: Option<PathBuf>,

  /// Increase log verbosity (repeatable).
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Print the concatenated scripts for a context.
  Script(ContextArgs),
  /// Print the loader script, if the module has one.
  Loader {
    /// Module name.
    module: String,
  },
  /// Print the generated stylesheets keyed by media type as JSON.
  Styles(ContextArgs),
  /// Print the latest modification time for a context.
  Mtime(ContextArgs),
  /// Print module metadata as JSON.
  Info {
    /// Module name.
    module: String,
  },
}

#[derive(Debug, Args)]
struct ContextArgs {
  /// Module name.
  module: String,
  /// Language code.
  #[arg(long, default_value = "en")]
  lang: String,
  /// Skin identifier.
  #[arg(long, default_value = "default")]
  skin: String,
  /// Include debug-only scripts.
  #[arg(long)]
  debug: bool,
}

impl ContextArgs {
  fn context(&self) -> Context {
    Context::new(&self.lang, &self.skin, self.debug)
  }
}

#[derive(Serialize)]
struct ModuleInfo<'a> {
  name: &'a str,
  group: Option<&'a str>,
  dependencies: &'a [String],
  messages: &'a [String],
  has_loader: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let mut registry = match &cli.config {
    Some(path) => ModuleRegistry::load_from_path(path)
      .with_context(|| format!("failed to load registry {}", path.display()))?,
    None => ModuleRegistry::discover(Path::new("."))
      .with_context(|| format!("failed to load registry {DEFAULT_CONFIG_FILE}"))?,
  };
  if let Some(root) = &cli.install_root {
    registry.paths.install_root = root.clone();
  }
  if let Some(base) = &cli.public_base_path {
    registry.paths.public_base_path = base.clone();
  }

  let store: Arc<dyn DependencyStore> = match &cli.deps {
    Some(path) => Arc::new(JsonDependencyStore::new(path)),
    None => Arc::new(MemoryDependencyStore::default()),
  };
  let services = ModuleServices::local(&registry.paths, store);
  let load = |name: &str| {
    ResourceModule::from_registry(&registry, name, services.clone())
      .with_context(|| format!("failed to configure module `{name}`"))
  };

  match &cli.command {
    Command::Script(args) => {
      let script = load(args.module.as_str())?
        .get_script(&args.context())
        .context("failed to generate script")?;
      println!("{script}");
    }
    Command::Loader { module } => match load(module.as_str())?.get_loader_script()? {
      Some(script) => println!("{script}"),
      None => eprintln!("module `{module}` has no loader script"),
    },
    Command::Styles(args) => {
      let styles = load(args.module.as_str())?
        .get_styles(&args.context())
        .context("failed to generate styles")?;
      println!("{}", serde_json::to_string_pretty(&styles)?);
    }
    Command::Mtime(args) => {
      let modified = load(args.module.as_str())?
        .get_modified_time(&args.context())
        .context("failed to compute modified time")?;
      println!("{modified}");
    }
    Command::Info { module } => {
      let resolved = load(module.as_str())?;
      let info = ModuleInfo {
        name: resolved.name(),
        group: resolved.get_group(),
        dependencies: resolved.get_dependencies(),
        messages: resolved.get_messages(),
        has_loader: !resolved.files().loader_scripts.is_empty(),
      };
      println!("{}", serde_json::to_string_pretty(&info)?);
    }
  }

  Ok(())
}
