mod headless;

use anyhow::{Result, bail};
use calloop::EventLoop;
use clap::{Parser, Subcommand};
use smenu::config::{Config, default_config_path, load_config, save_config};
use smenu::dispatch::{SearchEvent, SearchEventKind};
use smenu::executor::DesktopLauncher;
use smenu::icons::IconResolver;
use smenu::keys::{KeyPress, Modifiers};
use smenu::plugin::{MenuPlugin, PluginContext};
use smenu::sources::desktop::DesktopMenuSource;
use std::path::PathBuf;
use std::time::Duration;
use crate::headless::HeadlessHost;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Icon size used when resolving icons
    #[arg(long, default_value_t = 24)]
    icon_size: u32,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the menu tree
    Tree,
    /// Print the applications matching a query
    Search { query: String },
    /// Launch the first application matching a query
    Launch { query: String },
    /// Write the default configuration
    InitConfig,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    if let Cmd::InitConfig = args.command {
        save_config(&config_path, &Config::default())?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let config = load_config(&config_path)?;
    let mut event_loop: EventLoop<MenuPlugin> = EventLoop::try_new()?;

    let ctx = PluginContext {
        host: Box::new(HeadlessHost {
            icon_size: args.icon_size,
            print_menu: matches!(args.command, Cmd::Tree),
        }),
        source: Box::new(DesktopMenuSource::new()),
        launcher: Box::new(DesktopLauncher::new(config.terminal.clone())),
        icons: IconResolver::new(&config.icon_theme),
        config_path: None,
    };
    let mut plugin = MenuPlugin::construct(event_loop.handle(), config, ctx)?;

    match args.command {
        Cmd::Tree => {
            plugin.on_button_press(1);
        }
        Cmd::Search { query } => {
            type_query(&mut plugin, &query)?;
            if let Some(session) = plugin.session() {
                for entry in session.rows(plugin.index()) {
                    println!("{}\t{}", entry.display_name, entry.launch_path);
                }
            }
        }
        Cmd::Launch { query } => {
            let id = type_query(&mut plugin, &query)?;
            let enter = SearchEvent::new(id, SearchEventKind::Key(KeyPress::from_char('\r', Modifiers::none())));
            plugin.deliver(enter);
            if plugin.session().is_some() {
                bail!("nothing matches '{}'", query);
            }
        }
        Cmd::InitConfig => {}
    }

    event_loop.dispatch(Some(Duration::ZERO), &mut plugin)?;
    plugin.destroy();
    Ok(())
}

/// Opens a search with the first character and types the rest.
fn type_query(plugin: &mut MenuPlugin, query: &str) -> Result<smenu::dispatch::SessionId> {
    let mut chars = query.chars();
    let Some(seed) = chars.next() else {
        bail!("query must not be empty");
    };
    let Some(id) = plugin.start_search(seed) else {
        bail!("a search is already open");
    };
    for c in chars {
        let press = KeyPress::from_char(c, Modifiers::none());
        plugin.deliver(SearchEvent::new(id, SearchEventKind::Key(press)));
    }
    Ok(id)
}
