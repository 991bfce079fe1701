//! Operator CLI for timekeeper projects and tasks.
//!
//! Usage:
//!
//! ```text
//! timekeeper --user <uuid> project create <name>
//! timekeeper --user <uuid> project list
//! timekeeper --user <uuid> task create --project <id> [--name <name>] [--duration HH:MM:SS]
//! timekeeper --user <uuid> task toggle|close|restart|continue <task-id>
//! timekeeper --user <uuid> task list [--state running|paused|closed]
//! ```
//!
//! Results are printed as JSON on stdout; logs go to stderr. The database is
//! configured through `TIMEKEEPER_DATABASE_URL` (see [`timekeeper::config`]).

use clap::{Parser, Subcommand};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::WrapErr;
use mockable::DefaultClock;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use timekeeper::config::TrackerConfig;
use timekeeper::tracking::{
    adapters::postgres::PostgresTrackingStore,
    domain::{ProjectOverview, SpendTime, Task, TaskId, TaskSummary, UserId},
    services::{
        ContinueTaskRequest, CreateTaskRequest, ProjectCatalogService, TaskLifecycleService,
    },
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "timekeeper")]
#[command(about = "Track time spent on project tasks")]
struct Cli {
    /// Identifier of the acting user
    #[arg(long, env = "TIMEKEEPER_USER")]
    user: Uuid,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project
    Create {
        /// Globally unique project name
        name: String,
    },
    /// List projects with spend time roll-ups
    List,
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Start a task in a project
    Create {
        /// Project identifier
        #[arg(long)]
        project: Option<String>,
        /// Task name
        #[arg(long)]
        name: Option<String>,
        /// Duration as HH:MM:SS; closes the task immediately
        #[arg(long)]
        duration: Option<String>,
    },
    /// Pause a running task or resume a paused one
    Toggle {
        /// Task identifier
        task: Uuid,
    },
    /// Close a task
    Close {
        /// Task identifier
        task: Uuid,
    },
    /// Restart an open task from now
    Restart {
        /// Task identifier
        task: Uuid,
    },
    /// Start a new task continuing a closed one
    Continue {
        /// Task identifier
        task: String,
    },
    /// List tasks, most recently started first
    List {
        /// Only show tasks in this state
        #[arg(long)]
        state: Option<String>,
    },
}

/// JSON shape of a task, including derived fields.
#[derive(Serialize)]
struct TaskView {
    id: TaskId,
    name: String,
    started_at: chrono::DateTime<chrono::Utc>,
    ended_at: Option<chrono::DateTime<chrono::Utc>>,
    spend_time: SpendTime,
    is_paused: bool,
    seconds_paused: u64,
    is_closed: bool,
    cloned_from: Option<TaskId>,
}

impl TaskView {
    fn from_task(task: &Task, clock: &DefaultClock) -> Self {
        Self {
            id: task.id(),
            name: task.name().to_owned(),
            started_at: task.started_at(),
            ended_at: task.ended_at(),
            spend_time: task.spend_time(clock),
            is_paused: task.is_paused(),
            seconds_paused: task.seconds_paused(),
            is_closed: task.is_closed(),
            cloned_from: task.cloned_from(),
        }
    }
}

/// JSON shape of a project overview.
#[derive(Serialize)]
struct ProjectView {
    id: String,
    name: String,
    total_spend_time: SpendTime,
    project_tasks: Vec<TaskSummary>,
}

impl From<&ProjectOverview> for ProjectView {
    fn from(overview: &ProjectOverview) -> Self {
        Self {
            id: overview.project().id().to_string(),
            name: overview.project().name().to_string(),
            total_spend_time: overview.total_spend_time(),
            project_tasks: overview.task_summaries().to_vec(),
        }
    }
}

type Lifecycle = TaskLifecycleService<PostgresTrackingStore, DefaultClock>;
type Catalog = ProjectCatalogService<PostgresTrackingStore, DefaultClock>;

fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::from_env().wrap_err("read timekeeper configuration")?;
    init_tracing(config.log_filter());

    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    let pool = Pool::builder()
        .max_size(config.pool_size())
        .build(manager)
        .wrap_err("build database connection pool")?;
    let store = Arc::new(PostgresTrackingStore::new(pool));
    let clock = Arc::new(DefaultClock);
    let owner = UserId::from_uuid(cli.user);

    let output = match cli.command {
        Command::Project(command) => {
            run_project(&Catalog::new(store, clock), owner, command).await?
        }
        Command::Task(command) => run_task(&Lifecycle::new(store, clock), owner, command).await?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}").wrap_err("write command output")?;
    Ok(())
}

async fn run_project(
    catalog: &Catalog,
    owner: UserId,
    command: ProjectCommand,
) -> eyre::Result<String> {
    match command {
        ProjectCommand::Create { name } => {
            let project = catalog.create_project(owner, name).await?;
            Ok(serde_json::to_string_pretty(&project)?)
        }
        ProjectCommand::List => {
            let overviews = catalog.list_projects(owner).await?;
            let views: Vec<ProjectView> = overviews.iter().map(ProjectView::from).collect();
            Ok(serde_json::to_string_pretty(&views)?)
        }
    }
}

async fn run_task(lifecycle: &Lifecycle, owner: UserId, command: TaskCommand) -> eyre::Result<String> {
    let clock = DefaultClock;
    let tasks = match command {
        TaskCommand::Create {
            project,
            name,
            duration,
        } => {
            let mut request = CreateTaskRequest::new(owner);
            if let Some(project_id) = project {
                request = request.with_project_id(project_id);
            }
            if let Some(task_name) = name {
                request = request.with_name(task_name);
            }
            if let Some(span) = duration {
                request = request.with_duration(span);
            }
            vec![lifecycle.create_task(request).await?]
        }
        TaskCommand::Toggle { task } => {
            vec![lifecycle.pause_or_resume_task(owner, TaskId::from_uuid(task)).await?]
        }
        TaskCommand::Close { task } => {
            vec![lifecycle.close_task(owner, TaskId::from_uuid(task)).await?]
        }
        TaskCommand::Restart { task } => {
            vec![lifecycle.restart_task(owner, TaskId::from_uuid(task)).await?]
        }
        TaskCommand::Continue { task } => {
            let request = ContinueTaskRequest::new(owner).with_task_id(task);
            vec![lifecycle.continue_task(request).await?]
        }
        TaskCommand::List { state: None } => lifecycle.list_tasks(owner).await?,
        TaskCommand::List { state: Some(state) } => {
            lifecycle.list_tasks_in_state(owner, &state).await?
        }
    };

    let views: Vec<TaskView> = tasks
        .iter()
        .map(|task| TaskView::from_task(task, &clock))
        .collect();
    Ok(serde_json::to_string_pretty(&views)?)
}
