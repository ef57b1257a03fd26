use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use procyon_lib::config::options_store::OptionsStore;
use procyon_lib::config::{home_dir, AppPaths, AppSettings};
use procyon_lib::core::bottle::{find_bottle, list_bottles};
use procyon_lib::core::launcher::{LaunchEnvironment, LaunchOrchestrator};
use procyon_lib::core::library::volume_name;
use procyon_lib::core::library_service::LibraryService;
use procyon_lib::core::registry::AppRegistry;
use procyon_lib::models::error::SError;
use procyon_lib::models::game::Game;
use procyon_lib::models::launch_options::{GraphicsBackend, LaunchOptions};
use procyon_lib::utils::logging;
use procyon_lib::utils::process::ProcessChecker;
use procyon_lib::utils::progress::Progress;
use procyon_lib::utils::shell::Shell;
use procyon_lib::utils::thread::with_library_mut;
use std::time::Duration;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "procyon", version, about = "Steam library browser and CrossOver launcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage registered steamapps directories
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },
    /// Scan every registered library and list installed titles
    Scan,
    /// List installed titles with their catalog names
    Games {
        /// Case-insensitive name filter
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Manage the catalog cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// List CrossOver bottles or pick the one Windows titles launch in
    Bottles {
        #[command(subcommand)]
        command: Option<BottlesCommand>,
    },
    /// Show or change launcher settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Show or change per-title launch options
    Options {
        #[command(subcommand)]
        command: OptionsCommand,
    },
    /// Launch a title by app id
    Launch { app_id: String },
}

#[derive(Subcommand)]
enum LibraryCommand {
    Add { path: Utf8PathBuf },
    Remove { path: Utf8PathBuf },
    List,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Delete the cache file and forget every entry
    Clear,
}

#[derive(Subcommand)]
enum BottlesCommand {
    List,
    /// Use this bottle for Windows titles
    Select { name: String },
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    Set {
        #[arg(long)]
        crossover_app: Option<Utf8PathBuf>,
        #[arg(long)]
        native_client: Option<Utf8PathBuf>,
        #[arg(long)]
        shell: Option<String>,
        #[arg(long)]
        include_patched_bottles: Option<bool>,
    },
}

#[derive(Subcommand)]
enum OptionsCommand {
    Show {
        app_id: String,
    },
    Set {
        app_id: String,
        #[arg(long)]
        backend: Option<GraphicsBackend>,
        #[arg(long)]
        sync: Option<bool>,
        #[arg(long)]
        hud: Option<bool>,
        #[arg(long)]
        frame_rate_cap: Option<f32>,
        #[arg(long)]
        upscale: Option<bool>,
        #[arg(long)]
        upscale_factor: Option<f32>,
        #[arg(long)]
        advertise_avx: Option<bool>,
        #[arg(long, allow_hyphen_values = true)]
        extra_args: Option<String>,
        #[arg(long)]
        extra_env: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve();
    let _guard = logging::init(&paths.log_dir);

    let settings = AppSettings::load().context("loading settings")?;
    let registry = AppRegistry::new(settings, &paths).await?;

    match cli.command {
        Command::Library { command } => library(&registry, command),
        Command::Scan => scan(&registry).await,
        Command::Games { filter } => games(&registry, filter.as_deref()).await,
        Command::Cache {
            command: CacheCommand::Clear,
        } => {
            registry.client.lock().await.delete_cache().await;
            println!("Cache cleared");
            Ok(())
        }
        Command::Bottles { command } => bottles(&registry, command.unwrap_or(BottlesCommand::List)),
        Command::Config { command } => config(&registry, command),
        Command::Options { command } => options(&paths, command),
        Command::Launch { app_id } => launch(&registry, &paths, &app_id).await,
    }
}

fn bottles(registry: &AppRegistry, command: BottlesCommand) -> Result<()> {
    let mut settings = registry.settings.lock();

    match command {
        BottlesCommand::List => {
            for bottle in list_bottles(&home_dir(), settings.include_patched_bottles) {
                let marker = if settings.selected_bottle.as_deref() == Some(bottle.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}\t{}", bottle.name, bottle.root);
            }
        }
        BottlesCommand::Select { name } => {
            let bottle = find_bottle(&home_dir(), settings.include_patched_bottles, &name)?;
            settings.selected_bottle = Some(bottle.name.clone());
            settings.save().context("saving settings")?;
            println!("Selected bottle {} ({})", bottle.name, bottle.root);
        }
    }
    Ok(())
}

fn config(registry: &AppRegistry, command: ConfigCommand) -> Result<()> {
    let mut settings = registry.settings.lock();

    if let ConfigCommand::Set {
        crossover_app,
        native_client,
        shell,
        include_patched_bottles,
    } = command
    {
        if let Some(v) = crossover_app {
            settings.crossover_app = v;
        }
        if let Some(v) = native_client {
            settings.native_client = v;
        }
        if let Some(v) = shell {
            settings.shell = v;
        }
        if let Some(v) = include_patched_bottles {
            settings.include_patched_bottles = v;
        }
        settings.save().context("saving settings")?;
    }

    println!("crossover_app\t{}", settings.crossover_app);
    println!("native_client\t{}", settings.native_client);
    println!("shell\t{}", settings.shell);
    println!("selected_bottle\t{}", settings.selected_bottle.as_deref().unwrap_or("-"));
    println!("include_patched_bottles\t{}", settings.include_patched_bottles);
    Ok(())
}

fn library(registry: &AppRegistry, command: LibraryCommand) -> Result<()> {
    let service = LibraryService::new();
    let mut settings = registry.settings.lock();

    match command {
        LibraryCommand::Add { path } => {
            let mut lib = registry.library.lock();
            let games = service.add_library(&mut settings, &mut lib, &path)?;
            println!("Added {} ({} games)", volume_name(&path), games.len());
        }
        LibraryCommand::Remove { path } => {
            let mut lib = registry.library.lock();
            if service.remove_library(&mut settings, &mut lib, &path) {
                println!("Removed {path}");
            } else {
                println!("{path} was not registered");
            }
        }
        LibraryCommand::List => {
            for root in service.library_roots(&settings) {
                println!("{}\t{root}", volume_name(&root));
            }
        }
    }
    Ok(())
}

async fn scan(registry: &AppRegistry) -> Result<()> {
    let roots = registry.settings.lock().library_roots.clone();
    if roots.is_empty() {
        return Err(SError::NoLibraries.into());
    }

    let metas = with_library_mut(registry.library.clone(), move |lib| lib.rescan(&roots)).await?;
    for meta in metas {
        let kind = if meta.is_native { "native" } else { "windows" };
        println!("{}\t{}\t{kind}\t{}", meta.app_id, meta.install_dir, meta.library_root);
    }
    Ok(())
}

async fn load_games(registry: &AppRegistry) -> Result<Vec<Game>> {
    let settings = registry.settings.lock().clone();
    let progress = Progress::new();
    let reporter = progress.spawn_reporter(PROGRESS_INTERVAL, |value| {
        eprintln!("Loading... {value:.0}%");
    });

    let mut client = registry.client.lock().await;
    let result = LibraryService::new()
        .load_games(&settings, registry.library.clone(), &mut *client, |p| {
            progress.publish(p)
        })
        .await;
    reporter.cancel();

    Ok(result?)
}

async fn games(registry: &AppRegistry, filter: Option<&str>) -> Result<()> {
    let all = load_games(registry).await?;
    for game in LibraryService::filter_games(&all, filter.unwrap_or_default()) {
        let kind = if game.is_native() { "native" } else { "windows" };
        println!("{}\t{}\t{kind}", game.meta.app_id, game.name());
    }
    Ok(())
}

fn options(paths: &AppPaths, command: OptionsCommand) -> Result<()> {
    let store = OptionsStore::new(paths.options_dir.clone());

    match command {
        OptionsCommand::Show { app_id } => {
            let opts = store.load(&app_id).unwrap_or_default();
            println!("{opts:#?}");
        }
        OptionsCommand::Set {
            app_id,
            backend,
            sync,
            hud,
            frame_rate_cap,
            upscale,
            upscale_factor,
            advertise_avx,
            extra_args,
            extra_env,
        } => {
            let current = store.load(&app_id).unwrap_or_default();
            let mut builder = current.to_builder();
            if let Some(v) = backend {
                builder = builder.backend(v);
            }
            if let Some(v) = sync {
                builder = builder.sync_mode(v);
            }
            if let Some(v) = hud {
                builder = builder.hud_enabled(v);
            }
            if let Some(v) = frame_rate_cap {
                builder = builder.frame_rate_cap(v);
            }
            if let Some(v) = upscale {
                builder = builder.upscale_enabled(v);
            }
            if let Some(v) = upscale_factor {
                builder = builder.upscale_factor(v);
            }
            if let Some(v) = advertise_avx {
                builder = builder.advertise_extended_cpu(v);
            }
            if let Some(v) = extra_args {
                builder = builder.extra_arguments(v);
            }
            if let Some(v) = extra_env {
                builder = builder.extra_env(v);
            }

            let updated: LaunchOptions = builder.build();
            store.save(&app_id, &updated)?;
            println!("{updated:#?}");
        }
    }
    Ok(())
}

async fn launch(registry: &AppRegistry, paths: &AppPaths, app_id: &str) -> Result<()> {
    let settings = registry.settings.lock().clone();

    let roots = settings.library_roots.clone();
    let wanted = app_id.to_string();
    let meta = with_library_mut(registry.library.clone(), move |lib| {
        lib.rescan(&roots);
        lib.find(&wanted).cloned()
    })
    .await?
    .ok_or_else(|| SError::GameNotFound(app_id.to_string()))?;

    // A stale selection only matters for Windows titles, which then fail with NoBottleSelected
    let bottle = settings
        .selected_bottle
        .as_deref()
        .and_then(|name| find_bottle(&home_dir(), settings.include_patched_bottles, name).ok());
    let environment = LaunchEnvironment {
        crossover_app: settings.crossover_app.clone(),
        native_client: settings.native_client.clone(),
        bottle,
    };

    let options = OptionsStore::new(paths.options_dir.clone()).load(app_id);
    let mut launcher = LaunchOrchestrator::new(
        ProcessChecker::new(),
        Shell::new(settings.shell.clone()),
        environment,
    );
    let pid = launcher.launch(&meta, options.as_ref()).await?;
    println!("Launched {app_id} (pid {pid})");
    Ok(())
}
