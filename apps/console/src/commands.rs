//! Command handlers.

mod matrix;
mod permissions;
mod roles;
mod users;

use clavis_application::{CatalogService, GrantReconciler, RoleAdminService, UserAdminService};
use clavis_core::AppResult;

use crate::cli::Commands;
use crate::output::OutputFormat;

/// Everything a command handler needs, wired once at startup.
pub struct ConsoleContext {
    pub catalog: CatalogService,
    pub roles: RoleAdminService,
    pub users: UserAdminService,
    pub reconciler: GrantReconciler,
    pub output: OutputFormat,
}

/// Routes a parsed command to its handler.
pub async fn dispatch(context: &ConsoleContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Permissions(command) => permissions::run(context, command).await,
        Commands::Roles(command) => roles::run(context, command).await,
        Commands::Users(command) => users::run(context, command).await,
        Commands::Matrix(command) => matrix::run(context, command).await,
    }
}
