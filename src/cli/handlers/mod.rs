mod init;

pub use init::cmd_init;

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::{
    AddTarget, ChatArgs, Cli, Commands, ExportArgs, IdArgs, LoginArgs, MvArgs, SelectAction,
    SelectCmd, SetArgs, StepArgs,
};
use crate::cli::output::{render_outline, ShowJson};
use crate::io::config_io::{read_config, StoreError};
use crate::io::store::{read_state, write_state, PersistedState};
use crate::model::config::AppConfig;
use crate::model::selection::{EntityKind, PlanStep};
use crate::ops::plan_ops::PlanError;
use crate::remote::client::{BackendClient, RemoteError};
use crate::remote::protocol::ExportRequest;

/// Error type for CLI command handling
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("export failed: {0}")]
    Remote(#[from] RemoteError),
    #[error("locked; run `wp login <password>` first")]
    NotAuthenticated,
    #[error("incorrect password")]
    BadPassword,
    #[error("{0}")]
    Usage(String),
}

/// Everything loaded for one invocation.
struct ProjectContext {
    root: PathBuf,
    config: AppConfig,
    state: PersistedState,
}

impl ProjectContext {
    fn load(root: &Path) -> Result<Self, AppError> {
        let config = read_config(root)?;
        let state = read_state(root, &config)?;
        Ok(ProjectContext {
            root: root.to_path_buf(),
            config,
            state,
        })
    }

    fn require_auth(&self) -> Result<(), AppError> {
        if self.state.authed {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    fn save(&self) -> Result<(), AppError> {
        write_state(&self.root, &self.state)?;
        Ok(())
    }
}

pub fn dispatch(cli: Cli) -> Result<(), AppError> {
    let root = cli
        .project_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Init(args) => cmd_init(&root, args),
        Commands::Login(args) => cmd_login(&root, args),
        Commands::Logout => cmd_logout(&root),
        Commands::Show => cmd_show(&root, cli.json),
        Commands::Step(args) => cmd_step(&root, args),
        Commands::Add(cmd) => cmd_add(&root, cmd.target),
        Commands::Rm(args) => cmd_rm(&root, args),
        Commands::Set(args) => cmd_set(&root, args),
        Commands::Mv(args) => cmd_mv(&root, args),
        Commands::Select(cmd) => cmd_select(&root, cmd),
        Commands::Undo => cmd_undo(&root),
        Commands::Redo => cmd_redo(&root),
        Commands::Chat(args) => cmd_chat(&root, args, cli.json),
        Commands::Export(args) => cmd_export(&root, args),
    }
}

// ---------------------------------------------------------------------------
// Auth gate
// ---------------------------------------------------------------------------

fn cmd_login(root: &Path, args: LoginArgs) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    if args.password != ctx.config.access_password {
        return Err(AppError::BadPassword);
    }
    ctx.state.authed = true;
    ctx.save()?;
    println!("unlocked");
    Ok(())
}

fn cmd_logout(root: &Path) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.state.authed = false;
    ctx.save()?;
    println!("locked");
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(root: &Path, json: bool) -> Result<(), AppError> {
    let ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    if json {
        let out = ShowJson::from_session(&ctx.state.session);
        println!("{}", serde_json::to_string_pretty(&out).expect("plan serializes"));
    } else {
        print!("{}", render_outline(&ctx.state.session));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_step(root: &Path, args: StepArgs) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    let step = PlanStep::from_number(args.step)
        .ok_or_else(|| AppError::Usage(format!("step must be 1-3, got {}", args.step)))?;
    ctx.state.session.step = step;
    ctx.save()
}

fn cmd_add(root: &Path, target: AddTarget) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    let session = &mut ctx.state.session;
    match target {
        AddTarget::Workstream { name } => {
            let id = session.add_workstream(name);
            println!("added workstream {}", id);
        }
        AddTarget::Milestone {
            workstream_id,
            name,
        } => {
            let id = session.add_milestone(workstream_id, name)?;
            println!("added milestone {}", id);
        }
        AddTarget::Task { milestone_id, name } => {
            let id = session.add_task(milestone_id, name)?;
            println!("added task {}", id);
        }
    }
    ctx.save()
}

fn cmd_rm(root: &Path, args: IdArgs) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    let session = &mut ctx.state.session;
    match args.kind.into() {
        EntityKind::Workstream => session.remove_workstream(args.id)?,
        EntityKind::Milestone => session.remove_milestone(args.id)?,
        EntityKind::Task => session.remove_task(args.id)?,
    }
    ctx.save()
}

fn cmd_set(root: &Path, args: SetArgs) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    ctx.state
        .session
        .set_field(args.kind.into(), args.id, &args.field, &args.value)?;
    ctx.save()
}

fn cmd_mv(root: &Path, args: MvArgs) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    let session = &mut ctx.state.session;
    let moved = match args.kind.into() {
        EntityKind::Workstream => session.move_workstreams(args.id, args.index),
        EntityKind::Milestone => session.move_milestones(args.id, args.index),
        EntityKind::Task => session.move_tasks(args.id, args.index),
    };
    if !moved {
        return Err(AppError::Usage(format!(
            "nothing to move for {:?} {}",
            args.kind, args.id
        )));
    }
    ctx.save()
}

fn cmd_select(root: &Path, cmd: SelectCmd) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    let session = &mut ctx.state.session;
    match cmd.action {
        SelectAction::All => session.select_all(),
        SelectAction::None => session.select_none(),
        SelectAction::Set { kind, id, toggle } => {
            if toggle {
                session.select_toggle(kind.into(), id);
            } else {
                session.select_replace(kind.into(), id);
            }
        }
    }
    ctx.save()
}

fn cmd_undo(root: &Path) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    if !ctx.state.session.undo() {
        println!("nothing to undo");
        return Ok(());
    }
    ctx.save()
}

fn cmd_redo(root: &Path) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;
    if !ctx.state.session.redo() {
        println!("nothing to redo");
        return Ok(());
    }
    ctx.save()
}

// ---------------------------------------------------------------------------
// Remote commands
// ---------------------------------------------------------------------------

fn cmd_chat(root: &Path, args: ChatArgs, json: bool) -> Result<(), AppError> {
    let mut ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;

    let Some((request, captured)) = ctx.state.session.begin_chat(&args.message) else {
        return Err(AppError::Usage("message is empty".to_string()));
    };

    let client = BackendClient::new(&ctx.config.api_base);
    match client.chat(&request) {
        Ok(response) => ctx.state.session.apply_chat_response(&response, &captured),
        // A failed request is not fatal: it becomes a scripted reply.
        Err(_) => ctx.state.session.chat_failed(),
    }

    let reply = ctx.state.session.chat.last().cloned();
    ctx.save()?;

    if let Some(message) = reply {
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&message).expect("message serializes")
            );
        } else {
            println!("{}", message.text);
        }
    }
    Ok(())
}

fn cmd_export(root: &Path, args: ExportArgs) -> Result<(), AppError> {
    let ctx = ProjectContext::load(root)?;
    ctx.require_auth()?;

    let client = BackendClient::new(&ctx.config.api_base);
    let file = client.export(&ExportRequest::from_plan(&ctx.state.session.plan))?;

    let path = args
        .out
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&file.filename));
    fs::write(&path, &file.bytes).map_err(|e| {
        AppError::Store(StoreError::Write {
            path: path.clone(),
            source: e,
        })
    })?;
    println!("exported {}", path.display());
    Ok(())
}
