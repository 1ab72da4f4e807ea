use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use toppingmaker::config::{
    ResolverKind, ToppingConfig, defaults, load_config, load_user_config, merge_config,
};
use toppingmaker::host::memory::MemoryProject;
use toppingmaker::{ProjectTopping, ToppingError, ToppingResult};

/// Extract a portable project topping (layer tree, map themes and layer assets)
#[derive(Parser)]
#[command(name = "toppingmaker")]
#[command(version)]
#[command(about = "Extract a portable project topping (layer tree, map themes and layer assets)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the topping document and assets for a project description
    Generate(GenerateArgs),
    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a configuration template (to stdout without --output)
    Init {
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// YAML project description to read the layer tree and themes from
    #[arg(long)]
    project: PathBuf,

    /// Configuration file (merged over the user configuration)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target identifier, used as file name prefix
    #[arg(long)]
    identifier: Option<String>,

    /// Root directory the topping is written into
    #[arg(long)]
    main_dir: Option<PathBuf>,

    /// Project directory below the root directory
    #[arg(long)]
    sub_dir: Option<String>,

    /// Register files with ids and a version stamp
    #[arg(long)]
    versioned: bool,

    /// Print the file registry as JSON after generating
    #[arg(long)]
    print_registry: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Config {
            action: ConfigAction::Init { output, force },
        } => init_config(output, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn generate(args: GenerateArgs) -> ToppingResult<()> {
    let explicit = args.config.as_deref().map(load_config).transpose()?;
    let mut config: ToppingConfig =
        merge_config(load_user_config()?, explicit).unwrap_or_default();

    if args.identifier.is_some() {
        config.target.identifier = args.identifier;
    }
    if args.main_dir.is_some() {
        config.target.main_dir = args.main_dir;
    }
    if args.sub_dir.is_some() {
        config.target.sub_dir = args.sub_dir;
    }
    if args.versioned {
        config.target.path_resolver = Some(ResolverKind::Versioned);
    }

    let settings = config.export.to_export_settings()?;
    let mut target = config.target.build_target()?;
    let mut project = MemoryProject::load(&args.project)?;

    let topping = ProjectTopping::parse_project(&project, Some(&settings));
    let path = topping.generate_files(&mut target, Some(&settings), &mut project)?;

    println!("{}", target.main_dir.join(&path).display());
    if args.print_registry {
        println!("{}", target.registry_json()?);
    }
    Ok(())
}

fn init_config(output: Option<PathBuf>, force: bool) -> ToppingResult<()> {
    let template = defaults::default_config_toml()
        .map_err(|e| ToppingError::internal(format!("cannot render template: {}", e)))?;

    let Some(path) = output else {
        print!("{}", template);
        return Ok(());
    };
    if path.exists() && !force {
        return Err(ToppingError::config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    std::fs::write(&path, template).map_err(|e| ToppingError::io(&path, e))?;
    eprintln!("Wrote configuration template to {}", path.display());
    Ok(())
}
