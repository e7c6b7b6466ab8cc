//! pastq — admin and catalog CLI for the past-question library.
//!
//! Set PASTQ_API_URL to point at the API (defaults to the production base).
//! Session tokens and the draft cache live under the platform data directory
//! unless PASTQ_STATE_DIR overrides it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pastq_cli::{confirm_or_flag, init_tracing, render, report, Status};
use pastq_client::{read_snapshot, ApiClient, UploadRequest};
use pastq_core::{AppError, Config, Filters, LogLevel, PastQuestion};
use pastq_store::{state_dir, DraftStore, PhotoStore, TokenStore};

#[derive(Parser)]
#[command(name = "pastq", about = "Past-question library CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// End the session and clear the stored token
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// List records (admin view)
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Upload a file with its metadata
    Upload {
        /// Path to the document to upload
        file: PathBuf,
        #[command(flatten)]
        meta: MetaArgs,
        /// Server-side file name (slugified before sending)
        #[arg(long)]
        safe_name: Option<String>,
    },
    /// Edit a record's metadata
    Edit {
        id: i64,
        #[command(flatten)]
        meta: MetaArgs,
    },
    /// Rename a record's stored file
    Rename { id: i64, name: String },
    /// Delete a record and its stored file
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Draft cache operations
    Draft {
        #[command(subcommand)]
        sub: DraftCommands,
    },
    /// Publish the draft cache (or a JSON file) via bulk import
    Publish {
        /// JSON array of records to import instead of the draft cache
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Replace the draft cache with the live server list
    Pull {
        /// Overwrite unsaved drafts without asking
        #[arg(long)]
        force: bool,
    },
    /// Browse the public catalog
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Local member-photo store
    Photo {
        #[command(subcommand)]
        sub: PhotoCommands,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Add an unsaved draft to the cache
    Add {
        #[command(flatten)]
        meta: MetaArgs,
    },
    /// Show the cache with unsaved/unsorted counters
    List,
    /// Remove the draft at an index (see `draft list`)
    Remove { index: usize },
    /// Empty the cache
    Clear,
    /// Write the cache as a JSON array
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the cache with a JSON array from a file
    Import {
        file: PathBuf,
        /// Overwrite unsaved drafts without asking
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum PhotoCommands {
    /// Validate and store an image for a member key
    Set { key: String, image: PathBuf },
    /// Print the stored data URL for a member key
    Show { key: String },
    /// Remove the stored photo for a member key
    Remove { key: String },
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    semester: Option<String>,
    #[arg(long = "type")]
    doc_type: Option<String>,
    /// Free-text search across title, course, session, and notes
    #[arg(long)]
    q: Option<String>,
}

impl FilterArgs {
    fn to_filters(&self) -> Filters {
        Filters {
            level: self.level.clone().unwrap_or_default(),
            semester: self.semester.clone().unwrap_or_default(),
            doc_type: self.doc_type.clone().unwrap_or_default(),
            q: self.q.clone().unwrap_or_default(),
        }
    }
}

#[derive(Args, Default)]
struct MetaArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    course_code: Option<String>,
    #[arg(long)]
    course_title: Option<String>,
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    semester: Option<String>,
    #[arg(long = "type")]
    doc_type: Option<String>,
    /// Academic session, e.g. 2024/2025
    #[arg(long)]
    session: Option<String>,
    #[arg(long)]
    year: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl MetaArgs {
    /// Overlay the given flags onto an existing record; absent flags leave
    /// the field untouched.
    fn apply_to(&self, record: &mut PastQuestion) {
        let fields = [
            (&self.title, &mut record.title),
            (&self.course_code, &mut record.course_code),
            (&self.course_title, &mut record.course_title),
            (&self.level, &mut record.level),
            (&self.semester, &mut record.semester),
            (&self.doc_type, &mut record.doc_type),
            (&self.session, &mut record.session),
            (&self.year, &mut record.year),
            (&self.notes, &mut record.notes),
        ];
        for (flag, field) in fields {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
    }

    fn to_record(&self) -> PastQuestion {
        let mut record = PastQuestion::default();
        self.apply_to(&mut record);
        record
    }
}

/// Shared context for command handlers.
struct App {
    config: Config,
    tokens: TokenStore,
    drafts: DraftStore,
    photos: PhotoStore,
}

impl App {
    fn open(config: Config) -> Result<Self, AppError> {
        let dir = state_dir(config.state_dir.as_deref())?;
        Ok(Self {
            tokens: TokenStore::open(&dir),
            drafts: DraftStore::open(&dir),
            photos: PhotoStore::open(&dir),
            config,
        })
    }

    fn client(&self) -> Result<ApiClient, AppError> {
        ApiClient::from_config(&self.config, self.tokens.get())
    }

    /// Verify the stored session before a mutating command. A rejected token
    /// is cleared so the next attempt starts from a clean login.
    async fn require_auth(&self) -> Result<ApiClient, AppError> {
        if self.tokens.get().is_empty() {
            return Err(AppError::Unauthorized("Login first.".to_string()));
        }
        let client = self.client()?;
        match client.me().await {
            Ok(_) => Ok(client),
            Err(AppError::Unauthorized(_)) | Err(AppError::Api { status: 401, .. }) => {
                self.tokens.clear();
                Err(AppError::Unauthorized("Login first.".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn print_list(&self, client: &ApiClient, filters: &Filters) -> Result<(), AppError> {
        let items = client.list(filters, self.config.list_limit).await?;
        println!("{}", render::admin_table(&items));
        Ok(())
    }
}

fn prompt_password() -> Result<String, AppError> {
    dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| AppError::InvalidInput(format!("Failed to read password: {}", e)))
}

fn prompt_confirm(question: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .unwrap_or(false)
}

async fn run(cli: Cli, app: &mut App) -> Result<(), AppError> {
    match cli.command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            let mut client = ApiClient::new(app.config.api_base.clone(), None)?;
            let token = client.login(&email, &password).await?;
            app.tokens.set(&token);
            client.set_token(Some(token));
            let admin = client.me().await?;
            report(Status::Ok, &format!("Signed in as {}.", admin.email));
        }
        Commands::Logout => {
            // Best-effort on the server; the local token goes regardless.
            if app.tokens.get().is_empty() {
                report(Status::Warn, "Not signed in.");
                return Ok(());
            }
            let client = app.client()?;
            if let Err(e) = client.logout().await {
                tracing::debug!(error = %e, "server-side logout failed");
            }
            app.tokens.clear();
            report(Status::Ok, "Logged out.");
        }
        Commands::Whoami => {
            let client = app.require_auth().await?;
            let admin = client.me().await?;
            println!("{}", admin.email);
        }
        Commands::List { filters } => {
            let client = app.client()?;
            app.print_list(&client, &filters.to_filters()).await?;
        }
        Commands::Upload {
            file,
            meta,
            safe_name,
        } => {
            let request = UploadRequest {
                file,
                record: meta.to_record(),
                safe_name: safe_name.unwrap_or_default(),
            };
            // Refuse before touching the session or the network.
            pastq_core::validation::validate_upload_path(&request.file)?;

            let client = app.require_auth().await?;
            let created = client.upload(&request).await?;
            match created {
                Some(record) => report(Status::Ok, &format!("Uploaded {}.", record.display_title())),
                None => report(Status::Ok, "Uploaded."),
            }
            app.print_list(&client, &Filters::default()).await?;
        }
        Commands::Edit { id, meta } => {
            let client = app.require_auth().await?;
            let items = client.list(&Filters::default(), app.config.list_limit).await?;
            let mut record = items
                .iter()
                .find(|r| r.id == Some(id))
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("No item with id {}.", id)))?;

            meta.apply_to(&mut record);
            client.update(&record).await?;
            report(Status::Ok, "Saved.");
            app.print_list(&client, &Filters::default()).await?;
        }
        Commands::Rename { id, name } => {
            let client = app.require_auth().await?;
            client.rename(id, &name).await?;
            report(Status::Ok, "Renamed.");
        }
        Commands::Delete { id, yes } => {
            // Confirm before any network traffic; a decline costs nothing.
            let question = format!("Delete item #{}? This also removes the file.", id);
            if !confirm_or_flag(yes, || prompt_confirm(&question)) {
                report(Status::Warn, "Cancelled.");
                return Ok(());
            }

            let client = app.require_auth().await?;
            client.delete(id).await?;
            report(Status::Ok, "Deleted.");
            app.print_list(&client, &Filters::default()).await?;
        }
        Commands::Draft { sub } => run_draft(sub, app)?,
        Commands::Publish { file } => {
            let client = app.require_auth().await?;
            let records = match file {
                Some(path) => {
                    let text = std::fs::read_to_string(&path).map_err(|e| {
                        AppError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
                    })?;
                    DraftStore::import_json(&text)?
                }
                None => app.drafts.items().to_vec(),
            };
            let outcome = client.import(&records).await?;
            report(
                Status::Ok,
                &format!(
                    "Imported {} of {} record(s) ({} skipped locally).",
                    outcome.inserted, outcome.sent, outcome.skipped
                ),
            );
        }
        Commands::Pull { force } => {
            let unsaved = app.drafts.unsaved_count();
            if unsaved > 0 {
                let question = format!(
                    "Overwrite {} unsaved draft(s) with the live list?",
                    unsaved
                );
                if !confirm_or_flag(force, || prompt_confirm(&question)) {
                    report(Status::Warn, "Cancelled. Publish or export your drafts first.");
                    return Ok(());
                }
            }
            let client = app.client()?;
            let items = client.list(&Filters::default(), app.config.list_limit).await?;
            let count = items.len();
            app.drafts.replace_with_live(items);
            report(Status::Ok, &format!("Pulled {} item(s).", count));
        }
        Commands::Browse { filters } => {
            let filters = filters.to_filters();
            let client = app.client()?;
            // The catalog always fetches unfiltered and filters locally so
            // the "{shown} of {total}" line reflects the whole library.
            let all = match client.list(&Filters::default(), app.config.list_limit).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(error = %e, "live list unavailable, using snapshot");
                    read_snapshot(&app.config.snapshot_path)?
                }
            };
            let shown = filters.apply(&all);
            println!("{}", render::browse_cards(&shown, all.len(), &filters.q));
        }
        Commands::Photo { sub } => match sub {
            PhotoCommands::Set { key, image } => {
                app.photos.set(&key, &image)?;
                report(Status::Ok, &format!("Photo stored for {}.", key));
            }
            PhotoCommands::Show { key } => {
                let url = app
                    .photos
                    .get(&key)
                    .ok_or_else(|| AppError::NotFound(format!("No photo for {}.", key)))?;
                println!("{}", url);
            }
            PhotoCommands::Remove { key } => {
                if app.photos.remove(&key) {
                    report(Status::Ok, &format!("Photo removed for {}.", key));
                } else {
                    report(Status::Warn, &format!("No photo for {}.", key));
                }
            }
        },
    }

    Ok(())
}

fn run_draft(sub: DraftCommands, app: &mut App) -> Result<(), AppError> {
    match sub {
        DraftCommands::Add { meta } => {
            app.drafts.add(meta.to_record());
            report(Status::Ok, "Added to draft.");
            print_drafts(app);
        }
        DraftCommands::List => print_drafts(app),
        DraftCommands::Remove { index } => {
            let removed = app
                .drafts
                .remove(index)
                .ok_or_else(|| AppError::NotFound(format!("No draft at index {}.", index)))?;
            report(Status::Ok, &format!("Removed {}.", removed.display_title()));
        }
        DraftCommands::Clear => {
            app.drafts.clear();
            report(Status::Ok, "Draft cleared.");
        }
        DraftCommands::Export { out } => {
            let json = app.drafts.export_json()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    report(Status::Ok, &format!("Exported to {}.", path.display()));
                }
                None => println!("{}", json),
            }
        }
        DraftCommands::Import { file, force } => {
            let unsaved = app.drafts.unsaved_count();
            if unsaved > 0 {
                let question = format!("Overwrite {} unsaved draft(s) with the file?", unsaved);
                if !confirm_or_flag(force, || prompt_confirm(&question)) {
                    report(Status::Warn, "Cancelled. Publish or export your drafts first.");
                    return Ok(());
                }
            }
            let text = std::fs::read_to_string(&file).map_err(|e| {
                AppError::InvalidInput(format!("Failed to read {}: {}", file.display(), e))
            })?;
            let records = DraftStore::import_json(&text)?;
            let count = records.len();
            app.drafts.replace_with_live(records);
            report(Status::Ok, &format!("Imported {} record(s).", count));
            print_drafts(app);
        }
    }
    Ok(())
}

fn print_drafts(app: &App) {
    println!(
        "{}",
        render::draft_list(
            app.drafts.items(),
            app.drafts.unsaved_count(),
            app.drafts.unsorted_count(),
        )
    );
}

#[tokio::main]
async fn main() {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    let outcome = match App::open(config) {
        Ok(mut app) => run(cli, &mut app).await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        match e.log_level() {
            LogLevel::Error => report(Status::Bad, &e.client_message()),
            _ => report(Status::Warn, &e.client_message()),
        }
        std::process::exit(1);
    }
}
