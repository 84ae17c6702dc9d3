use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::selection::EntityKind;

#[derive(Parser)]
#[command(name = "wp", about = concat!("workplan v", env!("CARGO_PKG_VERSION"), " - a three-step workplan builder"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workplan project in the current directory
    Init(InitArgs),
    /// Unlock the plan with the access password
    Login(LoginArgs),
    /// Lock the plan again
    Logout,
    /// Show the plan outline and current selection
    Show,
    /// Set the active step (1 = workstreams, 2 = milestones, 3 = tasks)
    Step(StepArgs),
    /// Add a workstream, milestone, or task
    Add(AddCmd),
    /// Remove an entity (workstreams and milestones cascade)
    Rm(IdArgs),
    /// Set a field on an entity
    Set(SetArgs),
    /// Move an entity (and any selected siblings) to a new position
    Mv(MvArgs),
    /// Change the selection
    Select(SelectCmd),
    /// Undo the last change
    Undo,
    /// Redo the last undone change
    Redo,
    /// Send a message to the plan assistant
    Chat(ChatArgs),
    /// Export the plan to a spreadsheet via the backend
    Export(ExportArgs),
}

/// Entity kind argument shared by rm/set/mv/select
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "ws")]
    Workstream,
    #[value(alias = "ms")]
    Milestone,
    Task,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> EntityKind {
        match kind {
            KindArg::Workstream => EntityKind::Workstream,
            KindArg::Milestone => EntityKind::Milestone,
            KindArg::Task => EntityKind::Task,
        }
    }
}

// ---------------------------------------------------------------------------
// Command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Reinitialize even if workplan.toml already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    /// The access password
    pub password: String,
}

#[derive(Args)]
pub struct StepArgs {
    /// Step number (1-3)
    pub step: u8,
}

#[derive(Args)]
pub struct AddCmd {
    #[command(subcommand)]
    pub target: AddTarget,
}

#[derive(Subcommand)]
pub enum AddTarget {
    /// Add a workstream
    #[command(alias = "ws")]
    Workstream {
        /// Name (default: "Workstream <id>")
        name: Option<String>,
    },
    /// Add a milestone under a workstream
    #[command(alias = "ms")]
    Milestone {
        /// Parent workstream ID
        workstream_id: u32,
        /// Name (default: "Milestone <id>")
        name: Option<String>,
    },
    /// Add a task under a milestone
    Task {
        /// Parent milestone ID
        milestone_id: u32,
        /// Name (default: "Task <id>")
        name: Option<String>,
    },
}

#[derive(Args)]
pub struct IdArgs {
    /// Entity kind
    pub kind: KindArg,
    /// Entity ID
    pub id: u32,
}

#[derive(Args)]
pub struct SetArgs {
    /// Entity kind
    pub kind: KindArg,
    /// Entity ID
    pub id: u32,
    /// Field: name, description, owner (tasks), start-date, end-date
    pub field: String,
    /// New value (empty clears a date)
    pub value: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Entity kind
    pub kind: KindArg,
    /// The entity being dragged; a selected one drags the whole selection
    pub id: u32,
    /// Drop position: gaps between siblings, 0 = before the first
    pub index: usize,
}

#[derive(Args)]
pub struct SelectCmd {
    #[command(subcommand)]
    pub action: SelectAction,
}

#[derive(Subcommand)]
pub enum SelectAction {
    /// Context-sensitive select-all (escalates by step)
    All,
    /// Clear the selection
    None,
    /// Select one entity, or toggle it into the selection
    #[command(name = "set")]
    Set {
        /// Entity kind
        kind: KindArg,
        /// Entity ID
        id: u32,
        /// Toggle instead of replace (shift-click)
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Args)]
pub struct ChatArgs {
    /// The message for the assistant
    pub message: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output path (default: the backend-suggested filename)
    #[arg(long)]
    pub out: Option<String>,
}
