//! Role administration commands.

use clavis_application::{CreateRoleInput, UpdateRoleInput};
use clavis_core::AppResult;
use clavis_domain::{RoleDefinition, RoleId};

use crate::cli::RoleCommands;
use crate::commands::ConsoleContext;
use crate::output::{OutputFormat, RoleReport, emit_json};

pub async fn run(context: &ConsoleContext, command: RoleCommands) -> AppResult<()> {
    match command {
        RoleCommands::List => list(context).await,
        RoleCommands::Show { id } => show(context, RoleId::from_i64(id)).await,
        RoleCommands::Create { name, description } => {
            let created = context
                .roles
                .create_role(CreateRoleInput { name, description })
                .await?;
            emit_one(context.output, &created)
        }
        RoleCommands::Update {
            id,
            name,
            description,
        } => {
            let updated = context
                .roles
                .update_role(RoleId::from_i64(id), UpdateRoleInput { name, description })
                .await?;
            emit_one(context.output, &updated)
        }
        RoleCommands::Delete { id } => delete(context, RoleId::from_i64(id)).await,
    }
}

async fn list(context: &ConsoleContext) -> AppResult<()> {
    let roles = context.roles.list_roles().await?;

    match context.output {
        OutputFormat::Json => {
            let reports: Vec<RoleReport> = roles.iter().map(RoleReport::from).collect();
            emit_json(&reports)
        }
        OutputFormat::Table => {
            println!("{:<6} {:<24} DESCRIPTION", "ID", "NAME");
            for role in &roles {
                print_row(role);
            }
            Ok(())
        }
    }
}

async fn show(context: &ConsoleContext, id: RoleId) -> AppResult<()> {
    let role = context.roles.get_role(id).await?;
    emit_one(context.output, &role)
}

async fn delete(context: &ConsoleContext, id: RoleId) -> AppResult<()> {
    context.roles.delete_role(id).await?;
    if context.output == OutputFormat::Table {
        println!("deleted role {id}");
    }
    Ok(())
}

fn emit_one(output: OutputFormat, role: &RoleDefinition) -> AppResult<()> {
    match output {
        OutputFormat::Json => emit_json(&RoleReport::from(role)),
        OutputFormat::Table => {
            println!("{:<6} {:<24} DESCRIPTION", "ID", "NAME");
            print_row(role);
            Ok(())
        }
    }
}

fn print_row(role: &RoleDefinition) {
    println!("{:<6} {:<24} {}", role.id(), role.name(), role.description());
}
