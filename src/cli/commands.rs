use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use crate::cli::error::validate_id;
use crate::cli::output::{
    format_board_table, format_department_table, format_stage_table, format_timestamp,
    format_user_table, is_tty, to_json,
};
use crate::config::Config;
use crate::db::DbConnection;
use crate::models::{DepartmentPatch, NewUser, UserLevel, UserPatch};
use crate::pipeline::{SqliteStore, StageEngine};
use crate::service::{
    bootstrap_admin, require_admin, BoardService, DepartmentService, UserService,
};
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "crm")]
#[command(about = "CRM backend - departments, users, boards and pipeline stages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Email of the acting user (overrides CRM_USER and auth.user)
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    pub acting_user: Option<String>,
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the first administrator of an empty installation
    Init {
        /// Administrator name
        #[arg(long)]
        name: String,
        /// Administrator email
        #[arg(long)]
        email: String,
        /// Mobile number, e.g. "(11) 99999-9999"
        #[arg(long)]
        mobile: String,
        /// Optional internal code
        #[arg(long)]
        code: Option<String>,
    },
    /// Board management commands
    Boards {
        #[command(subcommand)]
        subcommand: BoardCommands,
    },
    /// Pipeline stage commands
    Stages {
        #[command(subcommand)]
        subcommand: StageCommands,
    },
    /// Department management commands
    Departments {
        #[command(subcommand)]
        subcommand: DepartmentCommands,
    },
    /// User management commands
    Users {
        #[command(subcommand)]
        subcommand: UserCommands,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Active,
    Inactive,
}

impl StatusArg {
    fn is_active(self) -> bool {
        self == StatusArg::Active
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Admin,
    User,
}

impl From<LevelArg> for UserLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Admin => UserLevel::Admin,
            LevelArg::User => UserLevel::User,
        }
    }
}

#[derive(Subcommand)]
pub enum BoardCommands {
    /// Create a new board
    Add {
        /// Board name
        name: String,
        /// Create the board inactive
        #[arg(long)]
        inactive: bool,
    },
    /// List boards (active by default)
    List {
        /// List inactive boards instead
        #[arg(long)]
        inactive: bool,
    },
    /// Show a board
    Show {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
    /// Rename a board
    Rename {
        #[arg(value_parser = validate_id)]
        id: i64,
        /// New name
        name: String,
    },
    /// Set a board's status
    Status {
        #[arg(value_parser = validate_id)]
        id: i64,
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Deactivate a board
    Deactivate {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum StageCommands {
    /// Create a stage at a position, shifting later stages back
    Add {
        /// Board ID
        #[arg(value_parser = validate_id)]
        board_id: i64,
        /// 1-based position
        position: i64,
        /// Stage name
        name: String,
    },
    /// List all stages of a board, inactive ones included
    List {
        /// Board ID
        #[arg(value_parser = validate_id)]
        board_id: i64,
    },
    /// Rename a stage
    Rename {
        #[arg(value_parser = validate_id)]
        id: i64,
        /// New name
        name: String,
    },
    /// Deactivate a stage and close the gap it leaves
    Deactivate {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
    /// Reactivate a stage at its stored position
    Reactivate {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
    /// Move a stage to a new position
    Move {
        #[arg(value_parser = validate_id)]
        id: i64,
        /// Target 1-based position
        position: i64,
    },
}

#[derive(Subcommand)]
pub enum DepartmentCommands {
    /// Create a department
    Add {
        /// Department name
        name: String,
        /// Icon identifier
        #[arg(long)]
        icon: Option<String>,
        /// Create the department inactive
        #[arg(long)]
        inactive: bool,
    },
    /// List active departments
    List,
    /// Show a department
    Show {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
    /// Update department fields
    Update {
        #[arg(value_parser = validate_id)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Deactivate a department
    Deactivate {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Mobile number, e.g. "(11) 99999-9999"
        #[arg(long)]
        mobile: String,
        #[arg(long, value_enum, default_value = "user")]
        level: LevelArg,
        /// Photo URL
        #[arg(long)]
        photo: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// List users
    List,
    /// Show a user
    Show {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
    /// Update user fields
    Update {
        #[arg(value_parser = validate_id)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long, value_enum)]
        level: Option<LevelArg>,
        #[arg(long)]
        photo: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// Permanently delete a user
    Delete {
        #[arg(value_parser = validate_id)]
        id: i64,
    },
}

/// Parse arguments, load configuration, and run one command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config);
    handle_command(cli, &config)
}

fn init_logging(config: &Config) {
    let default_level = config.log_level.as_deref().unwrap_or("warn");
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A second init (e.g. from tests) is harmless
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Acting user: `--as`, then `CRM_USER`, then `auth.user`
fn resolve_acting_user(cli_value: Option<String>, config: &Config) -> Option<String> {
    cli_value
        .or_else(|| std::env::var("CRM_USER").ok())
        .or_else(|| config.acting_user.clone())
}

pub fn handle_command(cli: Cli, config: &Config) -> Result<()> {
    let conn = DbConnection::connect(config)
        .context("Failed to connect to database")?;
    let result = dispatch(&conn, cli, config);
    DbConnection::disconnect(conn)?;
    result
}

fn dispatch(conn: &Connection, cli: Cli, config: &Config) -> Result<()> {
    let json = cli.json;
    let acting = cli.acting_user;
    match cli.command {
        Commands::Init { name, email, mobile, code } => {
            handle_init(conn, name, email, mobile, code, json)
        }
        Commands::Boards { subcommand } => {
            authorize(conn, acting, config)?;
            handle_boards(conn, subcommand, json)
        }
        Commands::Stages { subcommand } => {
            authorize(conn, acting, config)?;
            handle_stages(conn, subcommand, json)
        }
        Commands::Departments { subcommand } => {
            authorize(conn, acting, config)?;
            handle_departments(conn, subcommand, json)
        }
        Commands::Users { subcommand } => {
            authorize(conn, acting, config)?;
            handle_users(conn, subcommand, json)
        }
    }
}

/// Every resource command is admin-only
fn authorize(conn: &Connection, acting: Option<String>, config: &Config) -> Result<()> {
    let acting = resolve_acting_user(acting, config);
    let admin = require_admin(conn, acting.as_deref())?;
    log::debug!("Acting as {} <{}>", admin.id, admin.email);
    Ok(())
}

fn print_message(message: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(&serde_json::json!({ "message": message }))?);
    } else {
        println!("{}", message);
    }
    Ok(())
}

fn handle_init(
    conn: &Connection,
    name: String,
    email: String,
    mobile: String,
    code: Option<String>,
    json: bool,
) -> Result<()> {
    let admin = bootstrap_admin(
        conn,
        NewUser {
            name,
            photo: None,
            email,
            mobile,
            level: UserLevel::Admin,
            code,
        },
    )?;
    if json {
        println!("{}", to_json(&admin)?);
    } else {
        println!("Created administrator '{}' <{}> (id: {})", admin.name, admin.email, admin.id);
    }
    Ok(())
}

fn handle_boards(conn: &Connection, cmd: BoardCommands, json: bool) -> Result<()> {
    let service = BoardService::new(conn);

    match cmd {
        BoardCommands::Add { name, inactive } => {
            let board = service.create(&name, !inactive)
                .context("Failed to create board")?;
            if json {
                println!("{}", to_json(&board)?);
            } else {
                println!("Created board '{}' (id: {})", board.name, board.id);
            }
        }
        BoardCommands::List { inactive } => {
            let boards = service.list(Some(!inactive))?;
            if json {
                println!("{}", to_json(&boards)?);
            } else {
                print!("{}", format_board_table(&boards, is_tty()));
            }
        }
        BoardCommands::Show { id } => {
            let board = service.get(id)?;
            if json {
                println!("{}", to_json(&board)?);
            } else {
                println!("Board {}: {}", board.id, board.name);
                println!("  Status:   {}", if board.is_active { "active" } else { "inactive" });
                println!("  Created:  {}", format_timestamp(board.created_ts));
                println!("  Modified: {}", format_timestamp(board.modified_ts));
            }
        }
        BoardCommands::Rename { id, name } => {
            let board = service.rename(id, &name)
                .context("Failed to rename board")?;
            if json {
                println!("{}", to_json(&board)?);
            } else {
                println!("Renamed board {} to '{}'", board.id, board.name);
            }
        }
        BoardCommands::Status { id, status } => {
            let board = service.set_status(id, status.is_active())?;
            if json {
                println!("{}", to_json(&board)?);
            } else {
                println!(
                    "Board {} is now {}",
                    board.id,
                    if board.is_active { "active" } else { "inactive" }
                );
            }
        }
        BoardCommands::Deactivate { id } => {
            let message = service.deactivate(id)?;
            print_message(message, json)?;
        }
    }
    Ok(())
}

fn handle_stages(conn: &Connection, cmd: StageCommands, json: bool) -> Result<()> {
    let engine = StageEngine::new(SqliteStore::new(conn));

    match cmd {
        StageCommands::Add { board_id, position, name } => {
            let stage = engine.create_stage(&name, position, board_id)
                .context("Failed to create stage")?;
            if json {
                println!("{}", to_json(&stage)?);
            } else {
                println!(
                    "Created stage '{}' (id: {}) at position {} on board {}",
                    stage.name, stage.id, stage.position, stage.board_id
                );
            }
        }
        StageCommands::List { board_id } => {
            let stages = engine.list_stages_by_board(board_id)?;
            if json {
                println!("{}", to_json(&stages)?);
            } else {
                print!("{}", format_stage_table(&stages, is_tty()));
            }
        }
        StageCommands::Rename { id, name } => {
            let stage = engine.update_stage_name(id, &name)
                .context("Failed to rename stage")?;
            if json {
                println!("{}", to_json(&stage)?);
            } else {
                println!("Renamed stage {} to '{}'", stage.id, stage.name);
            }
        }
        StageCommands::Deactivate { id } => {
            let stage = engine.deactivate_stage(id)
                .context("Failed to deactivate stage")?;
            if json {
                println!("{}", to_json(&stage)?);
            } else {
                println!("Deactivated stage {} '{}'", stage.id, stage.name);
            }
        }
        StageCommands::Reactivate { id } => {
            let stage = engine.reactivate_stage(id)
                .context("Failed to reactivate stage")?;
            if json {
                println!("{}", to_json(&stage)?);
            } else {
                println!(
                    "Reactivated stage {} '{}' at position {}",
                    stage.id, stage.name, stage.position
                );
            }
        }
        StageCommands::Move { id, position } => {
            let outcome = engine.reorder_stage(id, position)
                .context("Failed to reorder stage")?;
            if json {
                println!("{}", to_json(&outcome)?);
            } else {
                println!("{}", outcome.message);
                print!("{}", format_stage_table(&outcome.stages, is_tty()));
            }
        }
    }
    Ok(())
}

fn handle_departments(conn: &Connection, cmd: DepartmentCommands, json: bool) -> Result<()> {
    let service = DepartmentService::new(conn);

    match cmd {
        DepartmentCommands::Add { name, icon, inactive } => {
            let dept = service.create(&name, icon.as_deref(), !inactive)
                .context("Failed to create department")?;
            if json {
                println!("{}", to_json(&dept)?);
            } else {
                println!("Created department '{}' (id: {})", dept.name, dept.id);
            }
        }
        DepartmentCommands::List => {
            let departments = service.list()?;
            if json {
                println!("{}", to_json(&departments)?);
            } else {
                print!("{}", format_department_table(&departments, is_tty()));
            }
        }
        DepartmentCommands::Show { id } => {
            let dept = service.get(id)?;
            if json {
                println!("{}", to_json(&dept)?);
            } else {
                print!("{}", format_department_table(std::slice::from_ref(&dept), is_tty()));
            }
        }
        DepartmentCommands::Update { id, name, icon, status } => {
            let patch = DepartmentPatch {
                name,
                icon,
                is_active: status.map(StatusArg::is_active),
            };
            let dept = service.update(id, patch)
                .context("Failed to update department")?;
            if json {
                println!("{}", to_json(&dept)?);
            } else {
                println!("Updated department {} '{}'", dept.id, dept.name);
            }
        }
        DepartmentCommands::Deactivate { id } => {
            let message = service.deactivate(id)?;
            print_message(message, json)?;
        }
    }
    Ok(())
}

fn handle_users(conn: &Connection, cmd: UserCommands, json: bool) -> Result<()> {
    let service = UserService::new(conn);

    match cmd {
        UserCommands::Add { name, email, mobile, level, photo, code } => {
            let user = service
                .create(NewUser {
                    name,
                    photo,
                    email,
                    mobile,
                    level: level.into(),
                    code,
                })
                .context("Failed to create user")?;
            if json {
                println!("{}", to_json(&user)?);
            } else {
                println!("Created user '{}' <{}> (id: {})", user.name, user.email, user.id);
            }
        }
        UserCommands::List => {
            let users = service.list()?;
            if json {
                println!("{}", to_json(&users)?);
            } else {
                print!("{}", format_user_table(&users, is_tty()));
            }
        }
        UserCommands::Show { id } => {
            let user = service.get(id)?;
            if json {
                println!("{}", to_json(&user)?);
            } else {
                print!("{}", format_user_table(std::slice::from_ref(&user), is_tty()));
            }
        }
        UserCommands::Update { id, name, email, mobile, level, photo, code } => {
            let patch = UserPatch {
                name,
                photo,
                email,
                mobile,
                level: level.map(UserLevel::from),
                code,
            };
            let user = service.update(id, patch)
                .context("Failed to update user")?;
            if json {
                println!("{}", to_json(&user)?);
            } else {
                println!("Updated user {} <{}>", user.id, user.email);
            }
        }
        UserCommands::Delete { id } => {
            let message = service.delete(id)?;
            print_message(message, json)?;
        }
    }
    Ok(())
}
