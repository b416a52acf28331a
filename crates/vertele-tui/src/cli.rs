use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use vertele_core::categories::CategoryTable;
use vertele_core::channel::{Channel, SelectedChannel};
use vertele_core::config::Config;
use vertele_core::service::PlaybackService;
use vertele_core::store::StoreLocation;

#[derive(Parser, Debug)]
#[command(name = "vertele", version)]
#[command(about = "Browse a local channel list and hand streams to an external player")]
pub struct Cli {
    /// Config file (default: ~/.config/vertele/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Channel database, overriding the configured one
    #[arg(long, value_name = "PATH", conflicts_with = "in_memory")]
    pub db: Option<PathBuf>,

    /// Use a throwaway in-memory store seeded with the built-in channels
    #[arg(long)]
    pub in_memory: bool,

    /// Launch this player command instead of detecting one
    #[arg(long, value_name = "CMD")]
    pub player: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print channels grouped by category and exit
    List,
    /// Launch one channel by instance key and exit
    Play { instance: String },
}

impl Cli {
    pub fn store_location(&self, config: &Config) -> StoreLocation {
        if self.in_memory {
            StoreLocation::InMemory
        } else {
            StoreLocation::File(
                self.db
                    .clone()
                    .unwrap_or_else(|| config.store.database.clone()),
            )
        }
    }
}

/// Channels grouped under their category headings, in tab order.
pub fn render_list(channels: &[Channel], categories: &CategoryTable) -> String {
    let mut out = String::new();
    for name in categories.names() {
        let members: Vec<&Channel> = channels
            .iter()
            .filter(|c| categories.classify_channel(c) == name)
            .collect();
        if members.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} ({})", name, members.len());
        let width = members.iter().map(|c| c.instance.len()).max().unwrap_or(0);
        for ch in members {
            let _ = writeln!(out, "  {:<width$}  {}", ch.instance, ch.title, width = width);
        }
    }
    out
}

pub fn list(service: &PlaybackService, categories: &CategoryTable) -> Result<()> {
    let store = service.store();
    let channels = store.list_all()?;
    print!("{}", render_list(&channels, categories));
    let untabbed = untabbed_categories(&store.categories()?, categories);
    if !untabbed.is_empty() {
        println!(
            "\nstored categories without a tab (grouped by title): {}",
            untabbed.join(", ")
        );
    }
    Ok(())
}

/// Stored categories the table has no tab for.
pub fn untabbed_categories(stored: &[String], categories: &CategoryTable) -> Vec<String> {
    stored
        .iter()
        .filter(|c| !categories.contains(c.as_str()))
        .cloned()
        .collect()
}

/// Start one channel without the UI. Errors become a non-zero exit.
pub async fn play(service: &mut PlaybackService, instance: &str, player: Option<&str>) -> Result<()> {
    if let Some(cmd) = player {
        if !service.play_with(cmd, instance)? {
            bail!("could not start '{}'; see the log for details", cmd);
        }
        println!("started {} with {}", instance, cmd);
        return Ok(());
    }

    service.launcher_mut().detect().await;
    let channel = service
        .store()
        .find_by_instance(instance)?
        .ok_or_else(|| anyhow!("channel not found: {}", instance))?;
    let report = service.play(&SelectedChannel::from(&channel))?;
    info!("headless play of {} done", instance);
    match report.pid {
        Some(pid) => println!(
            "playing {} with {} (pid {})",
            channel.title,
            report.player.display(),
            pid
        ),
        None => println!("playing {} with {}", channel.title, report.player.display()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vertele_core::store::{ChannelStore, StoreLocation};

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["vertele", "play", "nasatv"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Play {
                instance: "nasatv".to_string()
            })
        );
        let cli = Cli::try_parse_from(["vertele"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_store_location() {
        let config = Config::default();
        let cli = Cli::try_parse_from(["vertele", "--in-memory", "list"]).unwrap();
        assert_eq!(cli.store_location(&config), StoreLocation::InMemory);

        let cli = Cli::try_parse_from(["vertele", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(
            cli.store_location(&config),
            StoreLocation::File(PathBuf::from("/tmp/x.db"))
        );

        let cli = Cli::try_parse_from(["vertele"]).unwrap();
        assert_eq!(
            cli.store_location(&config),
            StoreLocation::File(config.store.database.clone())
        );
    }

    #[test]
    fn test_db_conflicts_with_in_memory() {
        assert!(Cli::try_parse_from(["vertele", "--db", "a.db", "--in-memory"]).is_err());
    }

    #[test]
    fn test_render_list_groups_by_category() {
        let store = ChannelStore::open(StoreLocation::InMemory).unwrap();
        let out = render_list(&store.list_all().unwrap(), &CategoryTable::builtin());
        let headings: Vec<&str> = out.lines().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(
            headings,
            vec![
                "Movies (5)",
                "Sports (1)",
                "Documentaries (1)",
                "Music (1)",
                "Technology (1)"
            ]
        );
        assert!(out.contains("nasatv"));
    }

    #[test]
    fn test_untabbed_categories() {
        let store = ChannelStore::open(StoreLocation::InMemory).unwrap();
        let table = CategoryTable::builtin();
        assert!(untabbed_categories(&store.categories().unwrap(), &table).is_empty());

        let stored = vec!["Movies".to_string(), "General".to_string()];
        assert_eq!(untabbed_categories(&stored, &table), vec!["General".to_string()]);
    }

    #[tokio::test]
    async fn test_headless_play_unknown_instance_fails() {
        let store = ChannelStore::open(StoreLocation::InMemory).unwrap();
        let launcher = vertele_core::player::PlayerLauncher::new(Default::default());
        let mut service = PlaybackService::new(store, launcher);
        assert!(play(&mut service, "does-not-exist", Some("true")).await.is_err());
    }
}
