//! User administration commands.

use chrono::{DateTime, Utc};

use clavis_application::{AssignRoleInput, CreateUserInput, UpdateUserInput};
use clavis_core::{AppError, AppResult};
use clavis_domain::{RoleId, UserAccount, UserId};

use crate::cli::UserCommands;
use crate::commands::ConsoleContext;
use crate::output::{AssignmentReport, OutputFormat, UserReport, emit_json};

pub async fn run(context: &ConsoleContext, command: UserCommands) -> AppResult<()> {
    match command {
        UserCommands::List => list(context).await,
        UserCommands::Show { id } => show(context, UserId::from_i64(id)).await,
        UserCommands::Create {
            username,
            email,
            disabled,
        } => {
            let created = context
                .users
                .create_user(CreateUserInput {
                    username,
                    email,
                    enabled: !disabled,
                })
                .await?;
            emit_one(context.output, &created)
        }
        UserCommands::Update {
            id,
            username,
            email,
            disabled,
        } => {
            let updated = context
                .users
                .update_user(
                    UserId::from_i64(id),
                    UpdateUserInput {
                        username,
                        email,
                        enabled: !disabled,
                    },
                )
                .await?;
            emit_one(context.output, &updated)
        }
        UserCommands::Delete { id } => delete(context, UserId::from_i64(id)).await,
        UserCommands::Roles { id } => assignments(context, UserId::from_i64(id)).await,
        UserCommands::Assign {
            id,
            role,
            valid_from,
            valid_until,
        } => {
            assign(
                context,
                UserId::from_i64(id),
                RoleId::from_i64(role),
                valid_from.as_deref(),
                valid_until.as_deref(),
            )
            .await
        }
        UserCommands::Unassign { id, role } => {
            context
                .users
                .unassign_role(UserId::from_i64(id), RoleId::from_i64(role))
                .await?;
            if context.output == OutputFormat::Table {
                println!("removed role {role} from user {id}");
            }
            Ok(())
        }
    }
}

async fn list(context: &ConsoleContext) -> AppResult<()> {
    let users = context.users.list_users().await?;

    match context.output {
        OutputFormat::Json => {
            let reports: Vec<UserReport> = users.iter().map(UserReport::from).collect();
            emit_json(&reports)
        }
        OutputFormat::Table => {
            println!("{:<6} {:<20} {:<30} ENABLED", "ID", "USERNAME", "EMAIL");
            for user in &users {
                print_row(user);
            }
            Ok(())
        }
    }
}

async fn show(context: &ConsoleContext, id: UserId) -> AppResult<()> {
    let user = context.users.get_user(id).await?;
    emit_one(context.output, &user)
}

async fn delete(context: &ConsoleContext, id: UserId) -> AppResult<()> {
    context.users.delete_user(id).await?;
    if context.output == OutputFormat::Table {
        println!("deleted user {id}");
    }
    Ok(())
}

async fn assignments(context: &ConsoleContext, id: UserId) -> AppResult<()> {
    let assignments = context.users.list_role_assignments(id).await?;
    let reports: Vec<AssignmentReport> = assignments.iter().map(AssignmentReport::from).collect();

    match context.output {
        OutputFormat::Json => emit_json(&reports),
        OutputFormat::Table => {
            println!("{:<6} {:<24} {:<26} VALID UNTIL", "ROLE", "NAME", "VALID FROM");
            for report in &reports {
                println!(
                    "{:<6} {:<24} {:<26} {}",
                    report.role_id,
                    report.role_name,
                    report.valid_from,
                    report.valid_until.as_deref().unwrap_or("open-ended")
                );
            }
            Ok(())
        }
    }
}

async fn assign(
    context: &ConsoleContext,
    user_id: UserId,
    role_id: RoleId,
    valid_from: Option<&str>,
    valid_until: Option<&str>,
) -> AppResult<()> {
    let assignment = context
        .users
        .assign_role(
            user_id,
            AssignRoleInput {
                role_id,
                valid_from: parse_timestamp("--valid-from", valid_from)?,
                valid_until: parse_timestamp("--valid-until", valid_until)?,
            },
        )
        .await?;

    match context.output {
        OutputFormat::Json => emit_json(&AssignmentReport::from(&assignment)),
        OutputFormat::Table => {
            println!(
                "assigned role '{}' to user {} from {}",
                assignment.role_name,
                assignment.user_id,
                assignment.valid_from.to_rfc3339()
            );
            Ok(())
        }
    }
}

fn parse_timestamp(name: &str, value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| Some(parsed.with_timezone(&Utc)))
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
}

fn emit_one(output: OutputFormat, user: &UserAccount) -> AppResult<()> {
    match output {
        OutputFormat::Json => emit_json(&UserReport::from(user)),
        OutputFormat::Table => {
            println!("{:<6} {:<20} {:<30} ENABLED", "ID", "USERNAME", "EMAIL");
            print_row(user);
            Ok(())
        }
    }
}

fn print_row(user: &UserAccount) {
    println!(
        "{:<6} {:<20} {:<30} {}",
        user.id(),
        user.username(),
        user.email().map_or("-", |email| email.as_str()),
        if user.is_enabled() { "yes" } else { "no" }
    );
}
