//! Command dispatch

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, EditMode, EditSession};
use crate::cli::args::{Cli, Commands, ConfigCommands, EditOp, LeafKindArg};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, render};
use crate::config::{global_config_path, Settings};
use crate::domain::{
    codec, query, DomainError, GiftId, GuardLevel, LeafKind, NodeId, TimeRange, WireCondition,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::SessionRedirect;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { file }) => cmd_show(file),
        Some(Commands::Check { file }) => cmd_check(file),
        Some(Commands::Normalize { file }) => cmd_normalize(file),
        Some(Commands::New) => cmd_new(),
        Some(Commands::Has { file, kind }) => cmd_has(file, *kind),
        Some(Commands::Edit { file, in_place, op }) => cmd_edit(file, *in_place, op),
        Some(Commands::Pull { id, json }) => cmd_pull(cli, *id, *json),
        Some(Commands::Push { file, name, reward }) => cmd_push(cli, file, name, reward),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `condtree --help`".into(),
        )),
    }
}

/// Prints a login hint instead of navigating anywhere.
struct CliRedirect {
    base_url: String,
}

impl SessionRedirect for CliRedirect {
    fn redirect(&self, target: &str) {
        output::warning(&format!(
            "session expired, log in again at {}{}",
            self.base_url.trim_end_matches('/'),
            target
        ));
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = load_settings(cli)?;
    let redirect = Arc::new(CliRedirect {
        base_url: settings.base_url.clone(),
    });
    Ok(ServiceContainer::new(settings, redirect)?)
}

fn read_session(file: &Path, mode: EditMode) -> CliResult<EditSession> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| InfraError::io(format!("read {}", file.display()), e))?;
    Ok(EditSession::from_json(&content, mode)?)
}

fn wire_json(wire: &WireCondition) -> CliResult<String> {
    codec::to_json(wire).map_err(|e| {
        CliError::from(ApplicationError::OperationFailed {
            context: "serialize rule".into(),
            source: Box::new(e),
        })
    })
}

fn rule_json(session: &EditSession) -> CliResult<String> {
    wire_json(&session.to_wire())
}

#[instrument]
fn cmd_show(file: &Path) -> CliResult<()> {
    let session = read_session(file, EditMode::ReadOnly)?;
    let root = session.root();
    output::info(&render::to_tree(root));
    if let Some(end) = query::latest_end_time(root) {
        output::detail(&format!(
            "{} conditions, evaluated after {}",
            query::leaf_count(root),
            end
        ));
    }
    for (kind, window) in query::kind_windows(root) {
        output::detail(&format!("{}: {} .. {}", kind, window.start, window.end));
    }
    Ok(())
}

#[instrument]
fn cmd_check(file: &Path) -> CliResult<()> {
    let session = read_session(file, EditMode::ReadOnly)?;
    match session.validate() {
        Ok(()) => {
            output::success(&format!(
                "rule is valid ({} conditions)",
                query::leaf_count(session.root())
            ));
            Ok(())
        }
        Err(e) => {
            output::failure(&e);
            Err(DomainError::from(e).into())
        }
    }
}

#[instrument]
fn cmd_normalize(file: &Path) -> CliResult<()> {
    let session = read_session(file, EditMode::ReadOnly)?;
    output::info(&rule_json(&session)?);
    Ok(())
}

fn cmd_new() -> CliResult<()> {
    let session = EditSession::new_campaign(EditMode::Editable);
    output::info(&rule_json(&session)?);
    Ok(())
}

#[instrument]
fn cmd_has(file: &Path, kind: LeafKindArg) -> CliResult<()> {
    let session = read_session(file, EditMode::ReadOnly)?;
    let found = query::has_kind(session.root(), LeafKind::from(kind));
    output::info(&found);
    Ok(())
}

#[instrument]
fn cmd_edit(file: &Path, in_place: bool, op: &EditOp) -> CliResult<()> {
    let mut session = read_session(file, EditMode::Editable)?;
    apply_edit(&mut session, op)?;

    let json = rule_json(&session)?;
    if in_place {
        std::fs::write(file, format!("{json}\n"))
            .map_err(|e| InfraError::io(format!("write {}", file.display()), e))?;
        output::success(&format!("updated {}", file.display()));
    } else {
        output::info(&json);
    }
    Ok(())
}

/// Look up `id` and check it has the shape the operation needs.
fn require_node(session: &EditSession, id: u64, want_group: bool) -> CliResult<NodeId> {
    let id = NodeId(id);
    let node = query::find(session.root(), id)
        .ok_or_else(|| CliError::InvalidArgs(format!("no node {}", id)))?;
    if node.is_group() != want_group {
        let want = if want_group { "group" } else { "condition" };
        return Err(CliError::InvalidArgs(format!("{} is not a {}", id, want)));
    }
    Ok(id)
}

fn apply_edit(session: &mut EditSession, op: &EditOp) -> CliResult<()> {
    debug!("apply_edit: {:?}", op);
    match op {
        EditOp::AddCondition { group, kind } => {
            let id = require_node(session, *group, true)?;
            session.edit_node(id, |ed, node| ed.add_condition(node, (*kind).into()));
        }
        EditOp::AddGroup { group } => {
            let id = require_node(session, *group, true)?;
            session.edit_node(id, |ed, node| ed.add_subgroup(node));
        }
        EditOp::Delete { node } => {
            let id = NodeId(*node);
            if id == session.root().id() {
                return Err(CliError::InvalidArgs("the root cannot be deleted".into()));
            }
            if query::find(session.root(), id).is_none() {
                return Err(CliError::InvalidArgs(format!("no node {}", id)));
            }
            session.edit(|ed, root| ed.delete_node(root, id));
        }
        EditOp::SetKind { group, kind } => {
            let id = require_node(session, *group, true)?;
            session.edit_node(id, |ed, node| ed.set_group_kind(node, (*kind).into()));
        }
        EditOp::SetThreshold { node, threshold } => {
            let id = require_node(session, *node, false)?;
            session.edit_node(id, |ed, node| ed.set_threshold(node, *threshold));
        }
        EditOp::SetAggregation { node, aggregation } => {
            let id = require_node(session, *node, false)?;
            session.edit_node(id, |ed, node| ed.set_aggregation(node, (*aggregation).into()));
        }
        EditOp::SetGift { node, gift } => {
            let id = require_node(session, *node, false)?;
            let gift_ref = GiftId::new(*gift);
            session.edit_node(id, |ed, node| ed.set_gift_ref(node, gift_ref));
        }
        EditOp::SetGuard {
            node,
            level,
            enabled,
        } => {
            let id = require_node(session, *node, false)?;
            let level = GuardLevel::from_number(i64::from(*level))
                .ok_or_else(|| CliError::InvalidArgs(format!("guard level {}", level)))?;
            session.edit_node(id, |ed, node| ed.set_guard_level(node, level, *enabled));
        }
        EditOp::SetTime { node, start, end } => {
            let id = require_node(session, *node, false)?;
            let parse = |value: &str| {
                codec::parse_timestamp(value).ok_or_else(|| {
                    CliError::InvalidArgs(format!("expected YYYYMMDDHHmmss, got {:?}", value))
                })
            };
            let range = TimeRange::new(parse(start.as_str())?, parse(end.as_str())?);
            session.edit_node(id, |ed, node| ed.set_time_range(node, range));
        }
    }
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_pull(cli: &Cli, id: i64, json: bool) -> CliResult<()> {
    let container = container(cli)?;
    let detail = container.campaigns.load(id)?;
    if json {
        output::info(&wire_json(&detail.conditions)?);
        return Ok(());
    }
    let session =
        EditSession::from_wire(&detail.conditions, EditMode::ReadOnly).map_err(DomainError::from)?;
    output::header(&format!("{} (#{})", detail.name, detail.id));
    if !detail.reward.is_empty() {
        output::detail(&detail.reward);
    }
    output::info(&render::to_tree(session.root()));
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_push(cli: &Cli, file: &Path, name: &str, reward: &str) -> CliResult<()> {
    let session = read_session(file, EditMode::ReadOnly)?;
    let container = container(cli)?;
    container.campaigns.create(name, reward, &session)?;
    output::success(&format!("created campaign {:?}", name));
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::warning("no global config location on this platform"),
            }
            if let Some(local) = &cli.config {
                output::info(&format!("local:  {}", local.display()));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
