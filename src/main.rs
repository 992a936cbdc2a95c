mod buttons;
mod cache;
mod config;
mod error;
mod handler;
mod logging;
mod menu;
mod resolver;
mod traits;
mod types;
mod utils;

use anyhow::{bail, Result};
use async_trait::async_trait;
use buttons::ButtonMenu;
use clap::{Parser, Subcommand};
use handler::SourceForgeHandler;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use traits::{MessageContext, Messenger, SentMessage};

#[derive(Parser)]
#[command(name = "sfmirror")]
#[command(about = "Pick the fastest SourceForge mirror for a download link", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the project and file path inside a SourceForge link
    Resolve {
        /// The SourceForge URL
        url: String,
    },
    /// List the known mirrors in definition order
    Mirrors,
    /// Ping every mirror for a link and print the ranking
    Test {
        /// The SourceForge URL
        url: String,
    },
    /// Render the interactive mirror picker as the bot would
    Menu {
        /// The SourceForge URL
        url: String,

        /// Simulate clicking the Nth button (1-based) and print its URL
        #[arg(long)]
        pick: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Resolve { url } => handle_resolve(&url)?,
        Commands::Mirrors => handle_mirrors(),
        Commands::Test { url } => handle_test(&url).await?,
        Commands::Menu { url, pick } => handle_menu(&url, pick).await?,
    }

    Ok(())
}

// --- Handlers ---

fn handle_resolve(url: &str) -> Result<()> {
    if !resolver::is_sourceforge_url(url) {
        eprintln!("Note: {} is not a sourceforge.net link.", url);
    }
    let link = resolver::resolve(url)?;
    println!("Project:  {}", link.project);
    println!("Path:     {}", link.rel_path);
    Ok(())
}

fn handle_mirrors() {
    println!("{:<4} {:<18} Label", "#", "Slug");
    println!("{}", "-".repeat(60));
    for (i, m) in config::get_mirrors().iter().enumerate() {
        println!(
            "{:<4} {:<18} {}",
            i + 1,
            m.slug.as_deref().unwrap_or("(auto)"),
            m.label
        );
    }
}

async fn handle_test(url: &str) -> Result<()> {
    let link = resolver::resolve(url)?;
    let settings = config::settings();
    let client = utils::build_client(settings.probe_timeout())?;
    let mirrors = config::get_mirrors();

    let pb = ProgressBar::new(mirrors.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {percent}% {msg}")?.progress_chars("|| "),
    );
    pb.set_message("Pinging mirrors...");

    let results = menu::rank_mirrors(&client, &settings.download_base, mirrors, &link, &pb).await?;

    pb.finish_with_message("Done.");
    println!();

    println!("{:<4} {:<10} {:<32} URL", "RANK", "LATENCY", "MIRROR");
    println!("{}", "-".repeat(80));
    for (i, res) in results.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:<32} {}",
            i + 1,
            utils::format_latency(res.latency),
            res.mirror.label,
            res.url
        );
    }

    match results.first() {
        Some(best) if best.latency.is_some() => {
            println!("{}", "-".repeat(80));
            println!("Fastest: {} ({})", best.mirror.label, utils::format_latency(best.latency));
        }
        _ => bail!("All mirrors timed out. Please check your network connection."),
    }

    Ok(())
}

async fn handle_menu(url: &str, pick: Option<usize>) -> Result<()> {
    let handler = SourceForgeHandler::new()?;
    let messenger = ConsoleMessenger::default();
    let ctx = MessageContext {
        chat_id: 0,
        message_id: 0,
    };

    if !handler.handle(url, &ctx, &messenger).await {
        bail!("Not handled as a SourceForge link; the bot would mirror {} directly.", url);
    }

    if let Some(n) = pick {
        let menu = messenger.last_menu().unwrap_or_default();
        let button = pick_button(&menu, n)?;
        match handler.resolve_callback(&button.callback_data) {
            Some(url) => println!("\nSelected {}\n{}", button.text, url),
            None => bail!("Token for '{}' is no longer cached.", button.text),
        }
    }

    Ok(())
}

/// Button number `n`, counted from 1 across rows
fn pick_button(menu: &ButtonMenu, n: usize) -> Result<&buttons::Button> {
    if n == 0 {
        bail!("Buttons are numbered from 1.");
    }
    match menu.buttons().nth(n - 1) {
        Some(button) => Ok(button),
        None => bail!("No button #{} (menu has {}).", n, menu.buttons().count()),
    }
}

/// Prints bot messages to stdout instead of a chat
#[derive(Default)]
struct ConsoleMessenger {
    last_menu: Mutex<Option<ButtonMenu>>,
}

impl ConsoleMessenger {
    fn last_menu(&self) -> Option<ButtonMenu> {
        self.last_menu.lock().ok().and_then(|m| m.clone())
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_message(&self, ctx: &MessageContext, text: &str) -> error::Result<SentMessage> {
        println!("{}\n", text);
        Ok(SentMessage {
            chat_id: ctx.chat_id,
            message_id: ctx.message_id + 1,
        })
    }

    async fn edit_message_text(
        &self,
        sent: &SentMessage,
        text: &str,
        markup: Option<&ButtonMenu>,
    ) -> error::Result<()> {
        tracing::debug!(chat_id = sent.chat_id, message_id = sent.message_id, "editing message");
        println!("{}", text);
        if let Some(menu) = markup {
            let mut n = 0;
            for row in &menu.rows {
                let cells: Vec<String> = row
                    .iter()
                    .map(|b| {
                        n += 1;
                        format!("{:>2}. {:<36}", n, b.text)
                    })
                    .collect();
                println!("{}", cells.join(" "));
            }
            let mut last = self
                .last_menu
                .lock()
                .map_err(|_| error::MirrorError::Messaging("console state poisoned".to_string()))?;
            *last = Some(menu.clone());
        }
        Ok(())
    }
}
