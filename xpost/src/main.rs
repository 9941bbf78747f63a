//! xpost - post to X (Twitter) from the command line

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use libxpost::{capture, config, poster, render};
use libxpost::{HistoryStore, PostOutcome, Result, XClient, XpostError};

#[derive(Parser, Debug)]
#[command(name = "xpost")]
#[command(version, about = "Post to X (Twitter) from the command line", long_about = None)]
#[command(after_help = r#"THREADS:
    Pass --name "thread-name" to any posting command to save the post into a
    named thread, then use `continue` / `continue-media` to append to it.

THREAD FILE FORMAT (for `thread`):
    A JSON array of strings: ["First post", "Second post", "Third post"]

CREDENTIALS:
    Read from the environment: X_API_KEY, X_API_KEY_SECRET,
    X_ACCESS_TOKEN, X_ACCESS_TOKEN_SECRET."#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Save posts to a named thread for later continuation
    #[arg(long = "name", global = true, value_name = "THREAD")]
    thread_name: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a standalone post
    Tweet {
        /// Text to post
        text: String,
    },
    /// Upload an image and post it with a caption
    Media {
        /// Path to the media file
        path: PathBuf,
        /// Text to post alongside the media
        text: String,
    },
    /// Post a file of texts as a reply chain
    Thread {
        /// Path to a JSON array of strings
        file: PathBuf,
    },
    /// Reply to an existing post
    Reply {
        /// Id of the post to reply to
        post_id: String,
        /// Reply text
        text: String,
    },
    /// Reply to an existing post with uploaded media
    #[command(name = "reply-media")]
    ReplyMedia {
        /// Id of the post to reply to
        post_id: String,
        /// Path to the media file
        path: PathBuf,
        /// Reply text
        text: String,
    },
    /// Reply to the latest post of a named thread
    Continue {
        /// Name of a saved thread
        thread: String,
        /// Reply text
        text: String,
    },
    /// Reply with media to the latest post of a named thread
    #[command(name = "continue-media")]
    ContinueMedia {
        /// Name of a saved thread
        thread: String,
        /// Path to the media file
        path: PathBuf,
        /// Reply text
        text: String,
    },
    /// Show recent post history
    History {
        /// Number of records to show
        count: Option<usize>,
    },
    /// List saved threads
    Threads,
    /// Capture a window interactively, then post the screenshot
    Snap {
        /// Caption for the post
        caption: Option<String>,
    },
    /// Render a code file as an image, then post it
    Render {
        /// File to render
        path: PathBuf,
        /// Caption for the post
        caption: Option<String>,
    },
    /// Render literal text as an image, then post it
    #[command(name = "render-text")]
    RenderText {
        /// Text or code to render
        text: String,
        /// Caption for the post
        caption: Option<String>,
    },
}

const DEFAULT_HISTORY_COUNT: usize = 10;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                std::process::exit(0);
            }
            // An unknown subcommand gets usage text and a clean exit,
            // same as running with no arguments.
            ErrorKind::InvalidSubcommand => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                eprintln!("{}", err);
                std::process::exit(3);
            }
        },
    };

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let Some(command) = cli.command else {
        print_usage();
        return;
    };

    if let Err(e) = run(command, cli.thread_name.as_deref()).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn print_usage() {
    let _ = Cli::command().print_help();
    println!();
}

async fn run(command: Command, thread_name: Option<&str>) -> Result<()> {
    tracing::debug!(thread = ?thread_name, "dispatching");
    match command {
        Command::History { count } => {
            let store = HistoryStore::open_default()?;
            show_history(&store, count.unwrap_or(DEFAULT_HISTORY_COUNT))
        }
        Command::Threads => {
            let store = HistoryStore::open_default()?;
            show_threads(&store)
        }
        command => {
            let store = HistoryStore::open_default()?;
            let client = XClient::from_env();
            dispatch(command, &client, &store, thread_name).await
        }
    }
}

async fn dispatch(
    command: Command,
    client: &XClient,
    store: &HistoryStore,
    thread_name: Option<&str>,
) -> Result<()> {
    match command {
        Command::Tweet { text } => {
            let text = require_text(&text)?;
            let outcome = poster::post(client, store, text, thread_name).await?;
            print_outcome("Posted", &outcome);
        }
        Command::Media { path, text } => {
            let text = require_text(&text)?;
            let outcome = poster::post_with_media(client, store, text, &path, thread_name).await?;
            print_outcome("Posted with media", &outcome);
        }
        Command::Thread { file } => {
            let items = load_thread_file(&file)?;
            let outcomes = poster::post_thread(client, store, &items, thread_name).await?;
            for (index, outcome) in outcomes.iter().enumerate() {
                println!("Posted {}/{}: {}", index + 1, outcomes.len(), outcome.url);
            }
            println!();
            println!("Thread posted: {} posts.", outcomes.len());
            println!("Thread URL: {}", outcomes[0].url);
            if let Some(name) = thread_name {
                println!(
                    "Thread saved as \"{}\" - continue it with: xpost continue \"{}\" \"...\"",
                    name, name
                );
            }
        }
        Command::Reply { post_id, text } => {
            let text = require_text(&text)?;
            let outcome = poster::reply(client, store, &post_id, text, thread_name).await?;
            print_outcome("Reply posted", &outcome);
        }
        Command::ReplyMedia {
            post_id,
            path,
            text,
        } => {
            let text = require_text(&text)?;
            let outcome =
                poster::reply_with_media(client, store, &post_id, text, &path, thread_name).await?;
            print_outcome("Reply with media posted", &outcome);
        }
        Command::Continue { thread, text } => {
            let text = require_text(&text)?;
            let outcome = poster::continue_thread(client, store, &thread, text).await?;
            print_outcome("Thread continued", &outcome);
        }
        Command::ContinueMedia { thread, path, text } => {
            let text = require_text(&text)?;
            let outcome =
                poster::continue_thread_with_media(client, store, &thread, text, &path).await?;
            print_outcome("Thread continued with media", &outcome);
        }
        Command::Snap { caption } => {
            let caption = caption.unwrap_or_else(|| "Screenshot from terminal".to_string());
            let dir = config::screenshots_dir()?;
            println!("Click on the window you want to capture...");
            let Some(shot) = capture::capture_window(&dir) else {
                return Err(XpostError::Tool(
                    "screen capture cancelled or failed".to_string(),
                ));
            };
            println!("Screenshot saved: {}", shot.display());
            let outcome = poster::post_with_media(client, store, &caption, &shot, thread_name).await?;
            print_outcome("Posted with media", &outcome);
        }
        Command::Render { path, caption } => {
            let caption = caption.unwrap_or_else(|| "Code snippet".to_string());
            let dir = config::screenshots_dir()?;
            let Some(image) = render::render_file(&path, &dir) else {
                return Err(XpostError::Tool(
                    "render failed (is silicon installed?)".to_string(),
                ));
            };
            println!("Rendered: {}", image.display());
            let outcome =
                poster::post_with_media(client, store, &caption, &image, thread_name).await?;
            print_outcome("Posted with media", &outcome);
        }
        Command::RenderText { text, caption } => {
            let caption = caption.unwrap_or_else(|| "From terminal".to_string());
            let dir = config::screenshots_dir()?;
            let Some(image) = render::render_text(&text, &dir) else {
                return Err(XpostError::Tool(
                    "render failed (is silicon installed?)".to_string(),
                ));
            };
            println!("Rendered: {}", image.display());
            let outcome =
                poster::post_with_media(client, store, &caption, &image, thread_name).await?;
            print_outcome("Posted with media", &outcome);
        }
        // Handled in run()
        Command::History { .. } | Command::Threads => unreachable!(),
    }

    Ok(())
}

fn require_text(text: &str) -> Result<&str> {
    if text.trim().is_empty() {
        return Err(XpostError::InvalidInput(
            "post text cannot be empty".to_string(),
        ));
    }
    Ok(text)
}

/// Load the thread input file: a JSON array of non-empty strings.
fn load_thread_file(path: &PathBuf) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        XpostError::InvalidInput(format!("cannot read thread file {}: {}", path.display(), e))
    })?;

    let items: Vec<String> = serde_json::from_str(&content).map_err(|_| {
        XpostError::InvalidInput(format!(
            "thread file {} must be a JSON array of strings: [\"First post\", \"Second post\"]",
            path.display()
        ))
    })?;

    if items.is_empty() || items.iter().any(|item| item.trim().is_empty()) {
        return Err(XpostError::InvalidInput(
            "thread file must contain at least one non-empty string".to_string(),
        ));
    }

    Ok(items)
}

fn print_outcome(label: &str, outcome: &PostOutcome) {
    println!("{}!", label);
    println!("Post ID: {}", outcome.id);
    println!("URL: {}", outcome.url);
}

fn show_history(store: &HistoryStore, count: usize) -> Result<()> {
    let records = store.recent(count)?;
    if records.is_empty() {
        println!("No posts recorded yet.");
        return Ok(());
    }

    println!("Recent posts (last {}):", records.len());
    println!();
    for (index, record) in records.iter().enumerate() {
        let thread_tag = record
            .thread_name
            .as_deref()
            .map(|name| format!(" [{}]", name))
            .unwrap_or_default();
        println!("{}. {}{}", index + 1, record.id, thread_tag);
        println!("   \"{}\"", record.text);
        println!("   {}", record.created_at.format("%Y-%m-%d %H:%M:%S"));
        println!();
    }
    Ok(())
}

fn show_threads(store: &HistoryStore) -> Result<()> {
    let threads = store.threads()?;
    if threads.is_empty() {
        println!("No named threads yet. Pass --name \"thread-name\" when posting to track threads.");
        return Ok(());
    }

    println!("Saved threads:");
    println!();
    for (name, entry) in threads {
        println!("  \"{}\"", name);
        println!("    Latest post ID: {}", entry.latest_post_id);
        println!("    Thread URL: {}", libxpost::permalink(&entry.first_post_id));
        println!("    Updated: {}", entry.updated_at.format("%Y-%m-%d %H:%M:%S"));
        println!();
    }
    Ok(())
}
