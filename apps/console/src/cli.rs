//! Command-line surface of the console.

use clap::{Parser, Subcommand};

/// Administration console for the Clavis IAM backend.
#[derive(Debug, Parser)]
#[command(name = "clavis", version, about)]
pub struct Cli {
    /// Emit machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a seeded in-memory backend instead of the REST API.
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect and edit the permission catalog.
    #[command(subcommand)]
    Permissions(PermissionCommands),

    /// Inspect and edit roles.
    #[command(subcommand)]
    Roles(RoleCommands),

    /// Administer user accounts and their role assignments.
    #[command(subcommand)]
    Users(UserCommands),

    /// Work with the per-role permission matrix.
    #[command(subcommand)]
    Matrix(MatrixCommands),
}

/// Permission catalog subcommands.
#[derive(Debug, Subcommand)]
pub enum PermissionCommands {
    /// List every permission in the catalog.
    #[command(alias = "ls")]
    List,

    /// Show one permission.
    Show {
        /// Permission identifier.
        id: i64,
    },

    /// Register a new permission.
    Create {
        /// URL pattern, rooted at `/`.
        #[arg(long)]
        url: String,

        /// HTTP method the permission addresses.
        #[arg(long)]
        method: String,
    },

    /// Replace a permission's URL pattern and method.
    Update {
        /// Permission identifier.
        id: i64,

        /// URL pattern, rooted at `/`.
        #[arg(long)]
        url: String,

        /// HTTP method the permission addresses.
        #[arg(long)]
        method: String,
    },

    /// Delete a permission.
    Delete {
        /// Permission identifier.
        id: i64,
    },
}

/// Role subcommands.
#[derive(Debug, Subcommand)]
pub enum RoleCommands {
    /// List every role.
    #[command(alias = "ls")]
    List,

    /// Show one role.
    Show {
        /// Role identifier.
        id: i64,
    },

    /// Create a role.
    Create {
        /// Unique role name.
        #[arg(long)]
        name: String,

        /// Free-form description.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Replace a role's name and description.
    Update {
        /// Role identifier.
        id: i64,

        /// Unique role name.
        #[arg(long)]
        name: String,

        /// Free-form description.
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a role.
    Delete {
        /// Role identifier.
        id: i64,
    },
}

/// User administration subcommands.
#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// List every user account.
    #[command(alias = "ls")]
    List,

    /// Show one user account.
    Show {
        /// User identifier.
        id: i64,
    },

    /// Create a user account.
    Create {
        /// Unique login name.
        #[arg(long)]
        username: String,

        /// Contact email.
        #[arg(long)]
        email: Option<String>,

        /// Create the account disabled.
        #[arg(long)]
        disabled: bool,
    },

    /// Replace a user account's editable attributes.
    Update {
        /// User identifier.
        id: i64,

        /// Unique login name.
        #[arg(long)]
        username: String,

        /// Contact email.
        #[arg(long)]
        email: Option<String>,

        /// Leave the account disabled.
        #[arg(long)]
        disabled: bool,
    },

    /// Delete a user account.
    Delete {
        /// User identifier.
        id: i64,
    },

    /// List a user's role assignments.
    Roles {
        /// User identifier.
        id: i64,
    },

    /// Assign a role to a user.
    Assign {
        /// User identifier.
        id: i64,

        /// Role to assign.
        #[arg(long)]
        role: i64,

        /// Start of the validity window, RFC 3339. Backend clock when absent.
        #[arg(long)]
        valid_from: Option<String>,

        /// End of the validity window, RFC 3339. Open-ended when absent.
        #[arg(long)]
        valid_until: Option<String>,
    },

    /// Remove a role assignment from a user.
    Unassign {
        /// User identifier.
        id: i64,

        /// Role to remove.
        #[arg(long)]
        role: i64,
    },
}

/// Permission matrix subcommands.
#[derive(Debug, Subcommand)]
pub enum MatrixCommands {
    /// Show the permission matrix of a role.
    Show {
        /// Role identifier.
        role_id: i64,
    },

    /// Flip one action flag for an entity, granting or revoking as needed.
    Toggle {
        /// Role identifier.
        role_id: i64,

        /// Entity row to change.
        entity: String,

        /// Action column: view, list, create, update or delete.
        action: String,
    },
}
