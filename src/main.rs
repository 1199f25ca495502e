use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};

use appshelf::catalog::{
    validate, AppDraft, AppStatus, CategoryFilter, FieldUpdate, Query, SortBy, StatusFilter,
    ValidatedDraft, ValidationErrors,
};
use appshelf::config::Config;
use appshelf::render;
use appshelf::session::{ImportOutcome, Session};
use appshelf::storage::{AppStore, Database, StorageError, EXPORT_FILE_NAME};
use appshelf::util::validate_url_for_open;

/// Get the config directory path (~/.config/appshelf/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("appshelf");
    Ok(config_dir)
}

/// Create the config directory if needed and restrict it to the owner.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "appshelf", version, about = "Keep a catalog of your favorite web apps")]
struct Args {
    /// Database file (default: ~/.config/appshelf/appshelf.db)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Config file (default: ~/.config/appshelf/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List apps, filtered and sorted (the default command)
    List(ListArgs),
    /// Show every field of one app
    Show { id: String },
    /// Add an app
    Add(AddArgs),
    /// Change fields of an existing app
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Delete an app
    Delete { id: String },
    /// Toggle an app's favorite flag
    Favorite { id: String },
    /// Set an app's status
    Status { id: String, status: AppStatus },
    /// Write the catalog to a JSON file
    Export {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// Replace the catalog with the contents of a JSON export
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List the configured categories
    Categories,
    /// Open an app's URL in the system browser
    Open { id: String },
}

#[derive(ClapArgs, Debug, Default)]
struct ListArgs {
    /// Match name or description, case-insensitive
    #[arg(long, short)]
    search: Option<String>,

    /// Only this category ("all" for every category)
    #[arg(long, short)]
    category: Option<String>,

    /// all, active or inactive
    #[arg(long)]
    status: Option<StatusFilter>,

    /// favorite, createdAt or name (default from config)
    #[arg(long)]
    sort: Option<SortBy>,
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    url: String,
    /// Icon glyph (default from config)
    #[arg(long)]
    icon: Option<String>,
    #[arg(long, default_value = "active")]
    status: AppStatus,
}

#[derive(ClapArgs, Debug)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    #[arg(long)]
    status: Option<AppStatus>,
}

impl EditArgs {
    fn into_updates(self) -> Vec<FieldUpdate> {
        [
            self.name.map(FieldUpdate::Name),
            self.description.map(FieldUpdate::Description),
            self.category.map(FieldUpdate::Category),
            self.url.map(FieldUpdate::Url),
            self.icon.map(FieldUpdate::Icon),
            self.status.map(FieldUpdate::Status),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Print field errors one per line and exit non-zero.
fn exit_with_validation_errors(errors: &ValidationErrors) -> ! {
    eprint!("{}", render::validation_errors(errors));
    std::process::exit(1);
}

fn validated_or_exit(draft: AppDraft) -> ValidatedDraft {
    match validate(draft) {
        Ok(draft) => draft,
        Err(errors) => exit_with_validation_errors(&errors),
    }
}

fn not_found(id: &str) -> ! {
    eprintln!("Error: No app with id '{}'", id);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => {
            ensure_config_dir(&config_dir)?;
            config_dir.join("appshelf.db")
        }
    };
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(StorageError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of appshelf appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let mut session = Session::open(AppStore::new(db), config.seed_on_first_run).await?;

    let command = args
        .command
        .unwrap_or_else(|| Command::List(ListArgs::default()));
    run(command, &mut session, &config).await
}

async fn run(command: Command, session: &mut Session, config: &Config) -> Result<()> {
    match command {
        Command::List(list) => {
            let filtered = list.search.is_some() || list.category.is_some() || list.status.is_some();
            let query = Query {
                text: list.search.unwrap_or_default(),
                category: list
                    .category
                    .as_deref()
                    .map(CategoryFilter::from)
                    .unwrap_or_default(),
                status: list.status.unwrap_or_default(),
                sort_by: list.sort.unwrap_or(config.default_sort),
            };
            let apps = session.query(&query);
            print!("{}", render::list(&apps, filtered));
        }

        Command::Show { id } => match session.find(&id) {
            Some(app) => print!("{}", render::detail(app)),
            None => not_found(&id),
        },

        Command::Add(add) => {
            let draft = validated_or_exit(AppDraft {
                name: add.name,
                description: add.description,
                category: add.category,
                url: add.url,
                icon: add.icon.unwrap_or_else(|| config.default_icon.clone()),
                status: add.status,
            });
            let category = &draft.as_draft().category;
            if !config.categories.contains(category) {
                tracing::warn!(category = %category, "Category is not in the configured list");
            }
            let app = session.add(draft).await?;
            println!("Added {} (id {})", app.name, app.id);
        }

        Command::Edit { id, fields } => {
            let Some(existing) = session.find(&id).cloned() else {
                not_found(&id);
            };
            let updates = fields.into_updates();
            if updates.is_empty() {
                anyhow::bail!("Nothing to change: pass at least one field, e.g. --name");
            }
            let changed = render::changed_fields(&updates);
            let draft = updates
                .into_iter()
                .fold(AppDraft::from(&existing), AppDraft::with);
            let draft = validated_or_exit(draft);
            let revised = existing.revise(draft.into_inner());
            session.update(&revised).await?;
            println!(
                "Updated {} of {} (id {})",
                changed,
                revised.name,
                revised.id
            );
        }

        Command::Delete { id } => {
            if session.delete(&id).await? {
                println!("Deleted app {}", id);
            } else {
                not_found(&id);
            }
        }

        Command::Favorite { id } => match session.toggle_favorite(&id).await? {
            Some(true) => println!("Marked app {} as favorite", id),
            Some(false) => println!("Removed app {} from favorites", id),
            None => not_found(&id),
        },

        Command::Status { id, status } => {
            if session.set_status(&id, status).await? {
                println!("App {} is now {}", id, status);
            } else {
                not_found(&id);
            }
        }

        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            let count = session.export_to_path(&path)?;
            println!("Exported {} apps to {}", count, path.display());
        }

        Command::Import { file } => match session.import_from_path(&file).await? {
            ImportOutcome::Replaced(count) => {
                println!("Imported {} apps from {}", count, file.display());
            }
            ImportOutcome::Ignored(reason) => {
                eprintln!("Error: {} is not a valid catalog ({})", file.display(), reason);
                eprintln!("The catalog was not changed.");
                std::process::exit(1);
            }
        },

        Command::Categories => {
            for category in &config.categories {
                println!("{}", category);
            }
        }

        Command::Open { id } => {
            let Some(app) = session.find(&id) else {
                not_found(&id);
            };
            let url = validate_url_for_open(&app.url)
                .with_context(|| format!("Refusing to open URL for app {}", id))?;
            open::that(url.as_str()).context("Failed to open browser")?;
            println!("Opening {}...", app.name);
        }
    }

    Ok(())
}
