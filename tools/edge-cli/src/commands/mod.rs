//! CLI command implementations.

pub mod config;
pub mod functions;
pub mod services;

use std::path::PathBuf;

use clap::{value_parser, ArgAction, ArgGroup, Args, Subcommand};
use edge_api::{SortOrder, DEFAULT_PAGE_SIZE};

/// Arguments for the edge-functions command.
#[derive(Args)]
pub struct FunctionsArgs {
    #[command(subcommand)]
    pub command: FunctionsCommand,
}

#[derive(Subcommand)]
pub enum FunctionsCommand {
    /// List the edge functions of your account.
    List(FunctionListArgs),
    /// Show the details of an edge function.
    Describe(FunctionDescribeArgs),
    /// Create a new edge function.
    Create(FunctionCreateArgs),
    /// Update an existing edge function.
    Update(FunctionUpdateArgs),
    /// Delete an edge function.
    Delete(DeleteArgs),
}

/// Arguments for `edge-functions list`.
#[derive(Args, Debug)]
pub struct FunctionListArgs {
    /// Page of results to fetch.
    #[arg(long, default_value_t = 1, value_parser = value_parser!(u32).range(1..))]
    pub page: u32,

    /// Number of items per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Sort direction (asc or desc).
    #[arg(long, default_value = "asc")]
    pub sort: SortOrder,

    /// Field to order the results by.
    #[arg(long, default_value = "name")]
    pub order_by: String,

    /// Show more fields when listing.
    #[arg(long)]
    pub details: bool,
}

/// Arguments for `edge-functions describe`.
#[derive(Args, Debug)]
pub struct FunctionDescribeArgs {
    /// Edge function ID.
    #[arg(value_parser = value_parser!(i64).range(1..))]
    pub id: i64,

    /// Also print the function's code.
    #[arg(long)]
    pub with_code: bool,
}

/// Arguments for `edge-functions create`.
#[derive(Args, Debug)]
pub struct FunctionCreateArgs {
    /// Name of the edge function.
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    pub name: Option<String>,

    /// Path to the file holding the function's code.
    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    pub code: Option<PathBuf>,

    /// Whether the function is active.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub active: bool,

    /// Path to a JSON file with the function's arguments.
    #[arg(long, conflicts_with = "input")]
    pub args: Option<PathBuf>,

    /// Initiator type of the function. Also used when an `--in` file omits it.
    #[arg(long, default_value = "edge_application")]
    pub initiator_type: String,

    /// Path to a JSON file with the whole request body.
    #[arg(long = "in", id = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Arguments for `edge-functions update`.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("fields")
        .required(true)
        .multiple(true)
        .args(["name", "code", "active", "args", "initiator_type", "input"])
))]
pub struct FunctionUpdateArgs {
    /// Edge function ID.
    #[arg(value_parser = value_parser!(i64).range(1..))]
    pub id: i64,

    /// New name.
    #[arg(long, conflicts_with = "input")]
    pub name: Option<String>,

    /// Path to the file holding the new code.
    #[arg(long, conflicts_with = "input")]
    pub code: Option<PathBuf>,

    /// Whether the function is active.
    #[arg(long, conflicts_with = "input")]
    pub active: Option<bool>,

    /// Path to a JSON file with the new arguments.
    #[arg(long, conflicts_with = "input")]
    pub args: Option<PathBuf>,

    /// New initiator type.
    #[arg(long, conflicts_with = "input")]
    pub initiator_type: Option<String>,

    /// Path to a JSON file with the whole request body.
    #[arg(long = "in", id = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// Arguments for the delete subcommands.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// ID of the entity to delete.
    #[arg(value_parser = value_parser!(i64).range(1..))]
    pub id: i64,
}

/// Arguments for the edge-services command.
#[derive(Args)]
pub struct ServicesArgs {
    #[command(subcommand)]
    pub command: ServicesCommand,
}

#[derive(Subcommand)]
pub enum ServicesCommand {
    /// List the edge services of your account.
    List(ServiceListArgs),
    /// Show the details of an edge service.
    Describe(ServiceDescribeArgs),
    /// Create a new edge service.
    Create(ServiceCreateArgs),
    /// Update an existing edge service.
    Update(ServiceUpdateArgs),
    /// Delete an edge service.
    Delete(DeleteArgs),
}

/// Arguments for `edge-services list`.
#[derive(Args, Debug)]
pub struct ServiceListArgs {
    /// Maximum number of items to fetch.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = value_parser!(u32).range(1..))]
    pub limit: u32,

    /// Page of results to fetch.
    #[arg(long, default_value_t = 1, value_parser = value_parser!(u32).range(1..))]
    pub page: u32,

    /// Filter results by their name.
    #[arg(long)]
    pub filter: Option<String>,

    /// Show more fields when listing.
    #[arg(long)]
    pub details: bool,
}

/// Arguments for `edge-services describe`.
#[derive(Args, Debug)]
pub struct ServiceDescribeArgs {
    /// Edge service ID.
    #[arg(value_parser = value_parser!(i64).range(1..))]
    pub id: i64,

    /// Also print the service's variables.
    #[arg(long)]
    pub with_variables: bool,
}

/// Arguments for `edge-services create`.
#[derive(Args, Debug)]
pub struct ServiceCreateArgs {
    /// Name of the edge service.
    #[arg(long)]
    pub name: String,
}

/// Arguments for `edge-services update`.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("fields")
        .required(true)
        .multiple(true)
        .args(["name", "active", "variables"])
))]
pub struct ServiceUpdateArgs {
    /// Edge service ID.
    #[arg(value_parser = value_parser!(i64).range(1..))]
    pub id: i64,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// Whether the service is active.
    #[arg(long)]
    pub active: Option<bool>,

    /// Path to a file of KEY=VALUE lines replacing the service's variables.
    #[arg(long)]
    pub variables: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
