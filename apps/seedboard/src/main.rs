use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use panel::contract::error::PanelError;
use panel::contract::model::{NewPost, NewUser, PostPatch, UserPatch};
use panel::domain::reducer::Action;
use panel::domain::service::PanelService;
use panel::domain::state::WorkingSet;
use panel::infra::seed::HttpSeedClient;
use panel::infra::storage::JsonFileStore;
use runtime::{AppConfig, CliArgs};

/// Seedboard - admin core over seeded user and post collections
#[derive(Parser)]
#[command(name = "seedboard")]
#[command(about = "Seedboard - admin core over seeded user and post collections")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the user collection
    Users {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    /// Manage the post collection
    Posts {
        #[command(subcommand)]
        cmd: PostCmd,
    },
    /// Show working-set counts
    Stats,
    /// Check configuration
    Check,
}

#[derive(Subcommand)]
enum UserCmd {
    /// List the user working set
    List,
    /// Add a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Edit a user's fields
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user and, for this session, the posts it owns
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum PostCmd {
    /// List the post working set
    List,
    /// Add a post
    Add {
        #[arg(long)]
        title: String,
        /// Owning user id, as a form-selector value
        #[arg(long)]
        user: String,
    },
    /// Edit a post's fields
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete a post
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::info!("Seedboard starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Stats) {
        Commands::Check => check_config(config),
        command => run_session(config, command).await,
    }
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// One page-session: bootstrap the working set, perform the command, print.
async fn run_session(config: AppConfig, command: Commands) -> Result<()> {
    let store = Arc::new(JsonFileStore::new(config.storage_path()));
    let seed = Arc::new(HttpSeedClient::from_config(&config.panel)?);
    let mut service = PanelService::new(store, seed);

    // A failed seed load leaves the collections empty but the surface stays
    // usable, so log and continue rather than exit.
    if let Err(e) = service.bootstrap().await {
        tracing::warn!("Seed load failed, starting with empty collections: {e}");
    }

    match perform(&mut service, command).await {
        Ok(()) => Ok(()),
        // Validation problems are session feedback, not process failures.
        Err(e) => {
            println!("{e}");
            Ok(())
        }
    }
}

async fn perform(service: &mut PanelService, command: Commands) -> Result<(), PanelError> {
    match command {
        Commands::Users { cmd } => match cmd {
            UserCmd::List => {
                print_users(service.state());
                Ok(())
            }
            UserCmd::Add {
                name,
                username,
                email,
            } => {
                service
                    .dispatch(Action::AddUser(NewUser {
                        name,
                        username,
                        email,
                    }))
                    .await?;
                print_users(service.state());
                Ok(())
            }
            UserCmd::Edit {
                id,
                name,
                username,
                email,
            } => {
                service.dispatch(Action::BeginEditUser { id }).await?;
                service
                    .dispatch(Action::EditUserDraft(UserPatch {
                        name,
                        username,
                        email,
                    }))
                    .await?;
                service.dispatch(Action::CommitEditUser).await?;
                print_users(service.state());
                Ok(())
            }
            UserCmd::Delete { id } => {
                service.dispatch(Action::DeleteUser { id }).await?;
                print_users(service.state());
                Ok(())
            }
        },
        Commands::Posts { cmd } => match cmd {
            PostCmd::List => {
                print_posts(service.state());
                Ok(())
            }
            PostCmd::Add { title, user } => {
                service
                    .dispatch(Action::AddPost(NewPost { title, owner: user }))
                    .await?;
                print_posts(service.state());
                Ok(())
            }
            PostCmd::Edit { id, title, user } => {
                service.dispatch(Action::BeginEditPost { id }).await?;
                service
                    .dispatch(Action::EditPostDraft(PostPatch { title, owner: user }))
                    .await?;
                service.dispatch(Action::CommitEditPost).await?;
                print_posts(service.state());
                Ok(())
            }
            PostCmd::Delete { id } => {
                service.dispatch(Action::DeletePost { id }).await?;
                print_posts(service.state());
                Ok(())
            }
        },
        Commands::Stats => {
            let stats = service.state().stats();
            println!("users: {}", stats.users);
            println!("posts: {}", stats.posts);
            Ok(())
        }
        // Handled before the session starts.
        Commands::Check => Ok(()),
    }
}

fn print_users(set: &WorkingSet) {
    println!(
        "{:<6} {:<24} {:<16} {:<28} {:>6}",
        "ID", "NAME", "USERNAME", "EMAIL", "POSTS"
    );
    for entry in set.users() {
        let user = &entry.record;
        println!(
            "{:<6} {:<24} {:<16} {:<28} {:>6}",
            user.id,
            user.name,
            user.username,
            user.email,
            set.post_count_for(user.id)
        );
    }
}

fn print_posts(set: &WorkingSet) {
    println!("{:<6} {:<48} {:<24}", "ID", "TITLE", "OWNER");
    for entry in set.posts() {
        let post = &entry.record;
        println!(
            "{:<6} {:<48} {:<24}",
            post.id,
            post.title,
            set.owner_name_for(post.user_id)
        );
    }
}
