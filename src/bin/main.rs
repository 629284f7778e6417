use anyhow::{Context, Result, anyhow};
use log::{error, info, warn};
use std::path::PathBuf;

const CONFIG_TEMPLATE: &str = include_str!("../../templates/config.ron");

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut custom_config_path: Option<PathBuf> = None;

    match args.get(1).map(|s| s.as_str()) {
        Some("--version") | Some("-v") => {
            println!("tagwm {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some("--help") | Some("-h") => {
            print_help();
            return Ok(());
        }
        Some("--init") => {
            init_config()?;
            return Ok(());
        }
        Some("--config") => {
            if let Some(path) = args.get(2) {
                custom_config_path = Some(PathBuf::from(path));
            } else {
                eprintln!("Error: --config requires a path argument");
                std::process::exit(1);
            }
        }
        Some(other) => {
            eprintln!("usage: tagwm [--version | --help | --init | --config <PATH>]");
            eprintln!("unknown argument '{}'", other);
            std::process::exit(1);
        }
        None => {}
    }

    let config = load_config(custom_config_path)?;

    let mut wm = tagwm::window_manager::WindowManager::connect(config)
        .context("Failed to start the window manager")?;
    let should_restart = wm.run()?;

    drop(wm);

    if should_restart {
        use std::os::unix::process::CommandExt;
        info!("restarting");
        let err = std::process::Command::new(&args[0]).args(&args[1..]).exec();
        error!("Failed to restart: {}", err);
    }

    Ok(())
}

fn load_config(custom_path: Option<PathBuf>) -> Result<tagwm::Config> {
    let config_path = match custom_path {
        Some(path) => path,
        None => {
            let path = get_config_path()?.join("config.ron");
            if !path.exists() {
                warn!("no config at {:?}, using built-in defaults", path);
                return Ok(tagwm::Config::default());
            }
            path
        }
    };

    let config_str = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;

    let config = tagwm::config::parse_config(&config_str)
        .with_context(|| format!("Failed to parse config {:?}", config_path))?;
    info!("loaded config from {:?}", config_path);
    Ok(config)
}

fn init_config() -> Result<()> {
    let config_dir = get_config_path()?;
    std::fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join("config.ron");
    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!("Config created at {:?}", config_path);
    println!("  Edit the file and restart with Mod+Control+Shift+Q");

    Ok(())
}

fn get_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("tagwm"))
        .ok_or_else(|| anyhow!("Could not find config directory"))
}

fn print_help() {
    println!("tagwm - a dynamic tiling window manager for X\n");
    println!("USAGE:");
    println!("    tagwm [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --init              Create default config in ~/.config/tagwm/config.ron");
    println!("    --config <PATH>     Use custom config file");
    println!("    --version           Print version information");
    println!("    --help              Print this help message\n");
    println!("CONFIG:");
    println!("    Location: ~/.config/tagwm/config.ron");
    println!("    Without a config file the built-in defaults are used.");
    println!("    The status text is the root window name, e.g. xsetroot -name \"$(date)\"\n");
}
