//! CampusDesk CLI - terminal front end for the CampusDesk dashboard client
//!
//! Drives the same session, theme, navigation and entity flows as the
//! dashboard, persisting client state under the configured data directory.

use campusdesk_core::{
    init_logging, CampusError, CampusResult, ErrorContext, PortalConfig,
};
use campusdesk_portal::{
    ApiClient, Batch, College, Course, Credentials, Curriculum, DashboardShell, Department,
    DocumentRoot, Entity, EntityPage, EntityService, Faculty, FileStorage, HttpAuthApi,
    NoticeLevel, Portal, Route, Section, SessionGateway, ShellOutcome, Student, Term, ThemeMode,
    NAV_ITEMS,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "campusdesk")]
#[command(about = "University administration dashboard client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and open your home page
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Sign out (local session is always cleared)
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Reload the profile from the backend first
        #[arg(long)]
        refresh: bool,
    },

    /// List the navigation entries visible to the signed-in user
    Nav,

    /// Open a page by path, e.g. /courses
    Open { path: String },

    /// Show or change the light/dark theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// List records of an entity
    List { entity: EntityKind },

    /// Delete a record by id
    Delete { entity: EntityKind, id: String },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set { mode: ThemeMode },
}

#[derive(Clone, Copy, ValueEnum)]
enum EntityKind {
    Colleges,
    Departments,
    Courses,
    Curricula,
    Batches,
    Sections,
    Terms,
    Faculty,
    Students,
}

/// Run `$body` with `$ty` bound to the entity type selected by `$kind`
macro_rules! with_entity {
    ($kind:expr, $ty:ident => $body:expr) => {
        match $kind {
            EntityKind::Colleges => { type $ty = College; $body }
            EntityKind::Departments => { type $ty = Department; $body }
            EntityKind::Courses => { type $ty = Course; $body }
            EntityKind::Curricula => { type $ty = Curriculum; $body }
            EntityKind::Batches => { type $ty = Batch; $body }
            EntityKind::Sections => { type $ty = Section; $body }
            EntityKind::Terms => { type $ty = Term; $body }
            EntityKind::Faculty => { type $ty = Faculty; $body }
            EntityKind::Students => { type $ty = Student; $body }
        }
    };
}

#[tokio::main]
async fn main() -> CampusResult<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;

    let mut logging_config = config.logging.clone();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config).map_err(|e| CampusError::Config {
        message: format!("Failed to initialize logging: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("cli")
            .with_operation("init_logging")
            .with_suggestion("Check the [logging] section of the configuration"),
    })?;

    info!("Starting CampusDesk CLI v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Login { email, password } => {
            let (mut portal, client) = open_portal(&config)?;
            let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(client)));
            let credentials = Credentials::new(email, password);
            let home = gateway
                .login(&mut portal.session, &mut portal.router, &credentials)
                .await?;
            println!("Signed in. Home page: {}", home.path());
        }
        Commands::Logout => {
            let (mut portal, client) = open_portal(&config)?;
            let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(client)));
            gateway.logout(&mut portal.session, &mut portal.router).await;
            println!("Signed out.");
        }
        Commands::Whoami { refresh } => {
            let (mut portal, client) = open_portal(&config)?;
            if refresh {
                let gateway = SessionGateway::new(Arc::new(HttpAuthApi::new(client)));
                gateway
                    .refresh_profile(&mut portal.session, &mut portal.router)
                    .await?;
            }
            match portal.session.user() {
                Some(user) => {
                    println!("{} ({})", user.email, user.role.label());
                    if let Some(name) = &user.name {
                        println!("Name: {}", name);
                    }
                }
                None => println!("Not signed in."),
            }
        }
        Commands::Nav => {
            let (portal, _) = open_portal(&config)?;
            let role = portal.session.role();
            let current = portal.router.current_path();
            for entry in campusdesk_portal::render_nav(NAV_ITEMS, role, current) {
                let marker = if entry.active { "*" } else { " " };
                println!("{} {:<14} {}", marker, entry.item.label, entry.item.path);
            }
        }
        Commands::Open { path } => {
            let (mut portal, _) = open_portal(&config)?;
            portal.open(Route::from_path(&path));
            render(&mut portal)?;
        }
        Commands::Theme { action } => {
            let (mut portal, _) = open_portal(&config)?;
            let mode = match action {
                ThemeAction::Show => portal.theme.mode(),
                ThemeAction::Toggle => portal.toggle_theme(),
                ThemeAction::Set { mode } => {
                    portal.theme.set_theme(mode);
                    mode
                }
            };
            println!("Theme: {}", mode);
        }
        Commands::List { entity } => {
            let (mut portal, client) = open_portal(&config)?;
            with_entity!(entity, E => list_records::<E>(&mut portal, client).await)
        }
        Commands::Delete { entity, id } => {
            let (mut portal, client) = open_portal(&config)?;
            with_entity!(entity, E => delete_record::<E>(&mut portal, client, &id).await)
        }
        Commands::Config {
            show,
            init,
            validate,
        } => {
            handle_config(&config, cli.config.as_ref(), show, init, validate)?;
        }
    }

    Ok(())
}

/// Rehydrate client state from the data directory and build the API client
fn open_portal(config: &PortalConfig) -> CampusResult<(Portal, Arc<ApiClient>)> {
    let storage = Arc::new(FileStorage::new(&config.storage.data_dir)?);
    let portal = Portal::init(storage, Arc::new(DocumentRoot::new()), &config.storage);
    let client = Arc::new(ApiClient::new(&config.api)?);
    Ok((portal, client))
}

fn load_config(config_path: Option<&PathBuf>) -> CampusResult<PortalConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from {:?}", path);
        return PortalConfig::from_file(path);
    }

    for path in PortalConfig::default_paths() {
        if path.exists() {
            info!("Loading configuration from {:?}", path);
            return PortalConfig::from_file(path);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(PortalConfig::default())
}

fn handle_config(
    config: &PortalConfig,
    config_path: Option<&PathBuf>,
    show: bool,
    init: bool,
    validate: bool,
) -> CampusResult<()> {
    if init {
        let path = match config_path {
            Some(path) => path.clone(),
            None => default_config_path()?,
        };
        PortalConfig::default().save_to_file(&path)?;
        println!("Configuration initialized at: {:?}", path);
    }

    if show {
        let rendered = toml::to_string_pretty(config).map_err(|e| CampusError::Config {
            message: format!("Failed to render configuration: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("cli").with_operation("show_config"),
        })?;
        println!("{}", rendered);
    }

    if validate {
        match config.validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                println!("Configuration validation failed: {}", e);
                return Err(e);
            }
        }
    }

    Ok(())
}

fn default_config_path() -> CampusResult<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|d| d.join(".config")))
        .map(|d| d.join("campusdesk").join("config.toml"))
        .ok_or_else(|| {
            campusdesk_core::config_error!("Could not determine a configuration directory", "cli")
        })
}

fn render(portal: &mut Portal) -> CampusResult<()> {
    match DashboardShell::render(portal) {
        ShellOutcome::Redirect(to) => {
            println!("Redirected to {}", to.path());
            if let ShellOutcome::Page(view) = DashboardShell::render(portal) {
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        }
        ShellOutcome::Page(view) => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}

fn print_notices(portal: &mut Portal) {
    for notice in portal.notifications.drain() {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }
}

/// Open the resource's page through the route guard; false when sent elsewhere
fn enter_resource<E: Entity>(portal: &mut Portal) -> bool {
    let route = Route::from_path(&format!("/{}", E::RESOURCE));
    match DashboardShell::enter(portal, route) {
        ShellOutcome::Redirect(to) => {
            println!("Redirected to {}", to.path());
            false
        }
        ShellOutcome::Page(_) => true,
    }
}

async fn list_records<E: Entity>(portal: &mut Portal, client: Arc<ApiClient>) {
    if !enter_resource::<E>(portal) {
        return;
    }
    let mut page = EntityPage::new(EntityService::<E>::new(client));
    if page
        .refresh(&portal.session, &mut portal.notifications)
        .await
    {
        for record in page.items() {
            println!("{:<26} {}", record.id, record.fields.display_name());
        }
        println!("{} {}", page.items().len(), E::RESOURCE);
    }
    print_notices(portal);
}

async fn delete_record<E: Entity>(portal: &mut Portal, client: Arc<ApiClient>, id: &str) {
    if !enter_resource::<E>(portal) {
        return;
    }
    let mut page = EntityPage::new(EntityService::<E>::new(client));
    page.remove(&portal.session, &mut portal.notifications, id)
        .await;
    print_notices(portal);
}
