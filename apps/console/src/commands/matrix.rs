//! Permission matrix commands.

use tracing::warn;

use clavis_application::{PermissionMatrix, ToggleOutcome};
use clavis_core::AppResult;
use clavis_domain::{CrudIntent, RoleId};

use crate::cli::MatrixCommands;
use crate::commands::ConsoleContext;
use crate::output::{MatrixReport, MatrixRowReport, OutputFormat, ToggleReport, emit_json, mark};

pub async fn run(context: &ConsoleContext, command: MatrixCommands) -> AppResult<()> {
    match command {
        MatrixCommands::Show { role_id } => show(context, RoleId::from_i64(role_id)).await,
        MatrixCommands::Toggle {
            role_id,
            entity,
            action,
        } => {
            toggle(
                context,
                RoleId::from_i64(role_id),
                entity.as_str(),
                action.as_str(),
            )
            .await
        }
    }
}

async fn show(context: &ConsoleContext, role_id: RoleId) -> AppResult<()> {
    let matrix = context.reconciler.load(role_id).await?;
    warn_unclassified(&matrix);

    match context.output {
        OutputFormat::Json => emit_json(&MatrixReport::from(&matrix)),
        OutputFormat::Table => {
            if matrix.is_empty() {
                println!("no permissions found for role {role_id}");
                return Ok(());
            }
            print_header();
            for row in matrix.rows() {
                print_row(&MatrixRowReport::from(row));
            }
            Ok(())
        }
    }
}

async fn toggle(
    context: &ConsoleContext,
    role_id: RoleId,
    entity: &str,
    action: &str,
) -> AppResult<()> {
    let intent = action.trim().to_lowercase().parse::<CrudIntent>()?;

    let mut matrix = context.reconciler.load(role_id).await?;
    warn_unclassified(&matrix);

    let outcome = match context.reconciler.toggle(&mut matrix, entity, intent).await {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(
                role_id = %role_id,
                entity,
                action = intent.as_str(),
                error = %error,
                "toggle rolled back, showing backend state"
            );
            let refreshed = context.reconciler.load(role_id).await?;
            if let Some(row) = refreshed.row(entity) {
                match context.output {
                    OutputFormat::Json => emit_json(&MatrixRowReport::from(row))?,
                    OutputFormat::Table => {
                        print_header();
                        print_row(&MatrixRowReport::from(row));
                    }
                }
            }
            return Err(error);
        }
    };
    let report = ToggleReport {
        entity: entity.to_owned(),
        action: intent.as_str().to_owned(),
        changed: !matches!(outcome, ToggleOutcome::NoOp),
        granted: match outcome {
            ToggleOutcome::NoOp => None,
            ToggleOutcome::Applied { target, .. } => Some(target),
        },
        calls: match outcome {
            ToggleOutcome::NoOp => 0,
            ToggleOutcome::Applied { calls, .. } => calls,
        },
    };

    match context.output {
        OutputFormat::Json => emit_json(&report),
        OutputFormat::Table => {
            match outcome {
                ToggleOutcome::NoOp => {
                    println!("nothing to change: '{entity}' has no {action} permissions");
                }
                ToggleOutcome::Applied { target, calls } => {
                    let verb = if target { "granted" } else { "revoked" };
                    println!("{verb} {calls} permission(s) on '{entity}'");
                }
            }
            if let Some(row) = matrix.row(entity) {
                print_header();
                print_row(&MatrixRowReport::from(row));
            }
            Ok(())
        }
    }
}

/// Flags catalog entries the matrix cannot place in any action column.
fn warn_unclassified(matrix: &PermissionMatrix) {
    for row in matrix.rows() {
        for member in row.unclassified_permissions() {
            warn!(
                entity = row.entity(),
                permission_id = %member.permission().id(),
                method = member.permission().method().as_str(),
                url = member.permission().url(),
                "permission does not map to a CRUD column"
            );
        }
    }
}

fn print_header() {
    println!(
        "{:<24} {:^6} {:^6} {:^8} {:^8} {:^8}",
        "ENTITY", "VIEW", "LIST", "CREATE", "UPDATE", "DELETE"
    );
}

fn print_row(report: &MatrixRowReport) {
    println!(
        "{:<24} {:^6} {:^6} {:^8} {:^8} {:^8}",
        report.entity,
        mark(report.view),
        mark(report.list),
        mark(report.create),
        mark(report.update),
        mark(report.delete)
    );
}
