//! Club Admin console
//!
//! Runs admin operations against the club backend from the command line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use club_admin::attachment::LocalFile;
use club_admin::auth::{Credentials, Session};
use club_admin::config::{Config, LogFormat};
use club_admin::dashboard::DashboardCounts;
use club_admin::models::{
    AboutContents, Blogs, ContactInfos, GalleryImages, Honors, LastMatches, Mails, Members,
    NextMatches, Players, SliderImages,
};
use club_admin::resource::{Record, RecordId, Resource};
use club_admin::{AppError, HttpTransport, ResourceManager, Transport};

#[derive(Parser)]
#[command(name = "club-admin", version, about = "Manage the club website backend")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the dashboard totals
    Dashboard,
    /// List the records of a resource
    List { resource: ResourceKind },
    /// Delete one record after confirmation
    Delete {
        resource: ResourceKind,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Record another win for an honor
    RecordWin {
        id: String,
        /// Date of the win (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Upload a picture to the gallery or the slideshow
    Upload {
        resource: ImageKind,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceKind {
    Members,
    Players,
    Blog,
    Honors,
    NextMatches,
    LastMatches,
    Gallery,
    Slider,
    Contact,
    About,
    Mails,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImageKind {
    Gallery,
    Slider,
}

/// Call a generic `fn name::<R, _>(args)` for the resource selected by `kind`.
macro_rules! for_resource {
    ($kind:expr, $func:ident ( $($arg:expr),* )) => {
        match $kind {
            ResourceKind::Members => $func::<Members, _>($($arg),*).await?,
            ResourceKind::Players => $func::<Players, _>($($arg),*).await?,
            ResourceKind::Blog => $func::<Blogs, _>($($arg),*).await?,
            ResourceKind::Honors => $func::<Honors, _>($($arg),*).await?,
            ResourceKind::NextMatches => $func::<NextMatches, _>($($arg),*).await?,
            ResourceKind::LastMatches => $func::<LastMatches, _>($($arg),*).await?,
            ResourceKind::Gallery => $func::<GalleryImages, _>($($arg),*).await?,
            ResourceKind::Slider => $func::<SliderImages, _>($($arg),*).await?,
            ResourceKind::Contact => $func::<ContactInfos, _>($($arg),*).await?,
            ResourceKind::About => $func::<AboutContents, _>($($arg),*).await?,
            ResourceKind::Mails => $func::<Mails, _>($($arg),*).await?,
        }
    };
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::debug!("API base URL: {}", config.api_url);

    let transport = authenticate(&config).await?;
    let config = Arc::new(config);

    match cli.command {
        Command::Dashboard => {
            let counts = DashboardCounts::fetch(&transport).await;
            print_count("Players", counts.players);
            print_count("Members", counts.members);
            print_count("Blog posts", counts.blog_posts);
            print_count("Contact messages", counts.contact_messages);
        }
        Command::List { resource } => {
            for_resource!(resource, list(&transport, config.clone()));
        }
        Command::Delete { resource, id, yes } => {
            let id = RecordId::new(id);
            for_resource!(resource, delete(&transport, config.clone(), id, yes));
        }
        Command::RecordWin { id, date } => {
            let on = date.unwrap_or_else(|| Utc::now().date_naive());
            let mut honors = ResourceManager::<Honors, _>::new(&transport, config.clone());
            honors.mount().await?;
            honors.record_win(&RecordId::new(id), on).await?;
            println!("Recorded a win on {}", on);
        }
        Command::Upload { resource, path } => {
            let file = LocalFile::from_path(&path).await?;
            match resource {
                ImageKind::Gallery => upload::<GalleryImages, _>(&transport, config, file).await?,
                ImageKind::Slider => upload::<SliderImages, _>(&transport, config, file).await?,
            }
        }
    }

    Ok(())
}

/// Log in with the configured credentials, if any.
async fn authenticate(config: &Config) -> Result<HttpTransport, AppError> {
    let transport = HttpTransport::new(config)?;

    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password)
    else {
        tracing::warn!(
            "No admin credentials configured (CLUB_ADMIN_USERNAME/CLUB_ADMIN_PASSWORD)"
        );
        return Ok(transport);
    };

    let session = Session::login(&transport, &Credentials::new(username, password)).await?;
    if !session.verify(&transport).await? {
        return Err(AppError::Unauthorized(
            "Session was rejected by the server".to_string(),
        ));
    }
    Ok(transport.with_bearer_token(session.token()))
}

async fn list<R: Resource, T: Transport>(transport: T, config: Arc<Config>) -> Result<(), AppError> {
    let mut manager = ResourceManager::<R, T>::new(transport, config);
    manager.mount().await?;

    if manager.store().is_empty() {
        println!("No {}", R::PLURAL);
        return Ok(());
    }
    for record in manager.store().records() {
        println!("{}\t{}", record.id(), serde_json::to_string(record)?);
    }
    Ok(())
}

async fn delete<R: Resource, T: Transport>(
    transport: T,
    config: Arc<Config>,
    id: RecordId,
    yes: bool,
) -> Result<(), AppError> {
    let mut manager = ResourceManager::<R, T>::new(transport, config);
    manager.request_delete(id.clone());

    if !yes && !confirm(&format!("Delete {} {}?", R::SINGULAR, id))? {
        manager.cancel_delete();
        println!("Cancelled");
        return Ok(());
    }

    if let Some(deleted) = manager.confirm_delete().await? {
        println!("Deleted {} {}", R::SINGULAR, deleted);
    }
    Ok(())
}

async fn upload<R: Resource, T: Transport>(
    transport: T,
    config: Arc<Config>,
    file: LocalFile,
) -> Result<(), AppError> {
    let mut manager = ResourceManager::<R, T>::new(transport, config);
    manager.start_create();
    manager.set_file(file)?;
    manager.submit().await?;
    println!("Uploaded {}", R::SINGULAR);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, AppError> {
    confirm_with(&mut io::stdin().lock(), &mut io::stdout(), prompt)
}

/// Ask a yes/no question; only an explicit yes confirms.
fn confirm_with(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> Result<bool, AppError> {
    let terminal_error = |e: io::Error| AppError::Io(format!("Could not use the terminal: {}", e));

    write!(output, "{} [y/N] ", prompt).map_err(terminal_error)?;
    output.flush().map_err(terminal_error)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(terminal_error)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_count(label: &str, count: Option<u64>) {
    match count {
        Some(n) => println!("{:<18}{}", label, n),
        None => println!("{:<18}unavailable", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct ClosedTerminal;

    impl Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_confirm_accepts_only_yes() {
        let mut output = Vec::new();
        assert!(confirm_with(&mut Cursor::new("y\n"), &mut output, "Delete member 7?").unwrap());
        assert!(!confirm_with(&mut Cursor::new("\n"), &mut output, "Delete member 7?").unwrap());
        assert!(String::from_utf8(output).unwrap().starts_with("Delete member 7? [y/N] "));
    }

    #[test]
    fn test_confirm_reports_terminal_failure() {
        let err =
            confirm_with(&mut Cursor::new("y\n"), &mut ClosedTerminal, "Delete?").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
