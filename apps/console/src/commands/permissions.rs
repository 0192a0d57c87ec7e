//! Permission catalog commands.

use clavis_application::{CreatePermissionInput, UpdatePermissionInput};
use clavis_core::AppResult;
use clavis_domain::{HttpMethod, PermissionDefinition, PermissionId};

use crate::cli::PermissionCommands;
use crate::commands::ConsoleContext;
use crate::output::{OutputFormat, PermissionReport, emit_json};

pub async fn run(context: &ConsoleContext, command: PermissionCommands) -> AppResult<()> {
    match command {
        PermissionCommands::List => list(context).await,
        PermissionCommands::Show { id } => show(context, PermissionId::from_i64(id)).await,
        PermissionCommands::Create { url, method } => create(context, url, method.as_str()).await,
        PermissionCommands::Update { id, url, method } => {
            update(context, PermissionId::from_i64(id), url, method.as_str()).await
        }
        PermissionCommands::Delete { id } => delete(context, PermissionId::from_i64(id)).await,
    }
}

async fn list(context: &ConsoleContext) -> AppResult<()> {
    let permissions = context.catalog.list_permissions().await?;

    match context.output {
        OutputFormat::Json => {
            let reports: Vec<PermissionReport> =
                permissions.iter().map(PermissionReport::from).collect();
            emit_json(&reports)
        }
        OutputFormat::Table => {
            println!("{:<6} {:<8} URL", "ID", "METHOD");
            for permission in &permissions {
                print_row(permission);
            }
            Ok(())
        }
    }
}

async fn show(context: &ConsoleContext, id: PermissionId) -> AppResult<()> {
    let permission = context.catalog.get_permission(id).await?;
    emit_one(context.output, &permission)
}

async fn create(context: &ConsoleContext, url: String, method: &str) -> AppResult<()> {
    let created = context
        .catalog
        .create_permission(CreatePermissionInput {
            url,
            method: HttpMethod::parse(method),
        })
        .await?;
    emit_one(context.output, &created)
}

async fn update(
    context: &ConsoleContext,
    id: PermissionId,
    url: String,
    method: &str,
) -> AppResult<()> {
    let updated = context
        .catalog
        .update_permission(
            id,
            UpdatePermissionInput {
                url,
                method: HttpMethod::parse(method),
            },
        )
        .await?;
    emit_one(context.output, &updated)
}

async fn delete(context: &ConsoleContext, id: PermissionId) -> AppResult<()> {
    context.catalog.delete_permission(id).await?;
    if context.output == OutputFormat::Table {
        println!("deleted permission {id}");
    }
    Ok(())
}

fn emit_one(output: OutputFormat, permission: &PermissionDefinition) -> AppResult<()> {
    match output {
        OutputFormat::Json => emit_json(&PermissionReport::from(permission)),
        OutputFormat::Table => {
            println!("{:<6} {:<8} URL", "ID", "METHOD");
            print_row(permission);
            Ok(())
        }
    }
}

fn print_row(permission: &PermissionDefinition) {
    println!(
        "{:<6} {:<8} {}",
        permission.id(),
        permission.method().as_str(),
        permission.url()
    );
}
