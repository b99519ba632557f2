use clap::Parser;
use pinvault::cli::commands::{self, add::AddArgs};
use pinvault::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so stdout stays clean for `get --password-only`.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli).await,
        Commands::Status => commands::status::execute(&cli).await,
        Commands::Verify => commands::verify::execute(&cli).await,
        Commands::Add {
            ref title,
            ref username,
            ref password,
            ref website,
            ref notes,
            ref id,
        } => {
            let args = AddArgs {
                title,
                username,
                password: password.as_deref(),
                website: website.as_deref(),
                notes: notes.as_deref(),
                id: id.as_deref(),
            };
            commands::add::execute(&cli, args).await
        }
        Commands::Get {
            ref id,
            password_only,
        } => commands::get::execute(&cli, id, password_only).await,
        Commands::List => commands::list::execute(&cli).await,
        Commands::Delete { ref id, force } => commands::delete::execute(&cli, id, force).await,
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        pinvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
