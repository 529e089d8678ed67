pub mod site;

use crate::config::site::SiteUrls;
use crate::domain::model::Credentials;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Flags shared by every command.
#[derive(Debug, Clone, Args)]
pub struct SiteArgs {
    /// Username for Server
    #[arg(short = 'u', long)]
    pub username: String,

    /// Password for Server
    #[arg(short = 'p', long)]
    pub password: String,

    /// URL for admin Server
    #[arg(short = 's', long)]
    pub site: String,

    /// HTTP request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates (self-signed sites)
    #[arg(long)]
    pub insecure: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub log_json: bool,
}

impl SiteArgs {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// Validates the credentials and derives the admin and REST roots from `--site`.
    pub fn site_urls(&self) -> Result<SiteUrls> {
        self.validate()?;
        SiteUrls::from_site(&self.site)
    }
}

impl Validate for SiteArgs {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("username", &self.username)?;
        validate_non_empty_string("password", &self.password)?;
        validate_url("site", &self.site)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(about = "Creates a service")]
pub struct CreateServiceArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Name of cluster to act on
    #[arg(short = 'c', long)]
    pub cluster: Option<String>,

    /// Filename of local Service Definition file
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub sdfile: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceOperation {
    Status,
    Start,
    Stop,
    Delete,
}

impl fmt::Display for ServiceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Parser)]
#[command(about = "Manages/modifies a service")]
pub struct ManageServiceArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Service name, as name, name.Type or folder/name.Type
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Operation to perform on specified service. If -l or --list is specified, used as a
    /// status filter instead.
    #[arg(short = 'o', long, value_enum, required_unless_present = "list")]
    pub operation: Option<ServiceOperation>,

    /// List services on server
    #[arg(short = 'l', long)]
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClusterOperation {
    Chkstatus,
    Start,
    Stop,
}

#[derive(Debug, Clone, Parser)]
#[command(about = "Manages/modifies a site")]
pub struct ManageSiteArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Machines to add to cluster
    #[arg(short = 'A', long, num_args = 1.., value_name = "MACHINE")]
    pub add_machines: Vec<String>,

    /// Machines to remove from cluster
    #[arg(short = 'R', long, num_args = 1.., value_name = "MACHINE")]
    pub remove_machines: Vec<String>,

    /// List machines on a site
    #[arg(short = 'l', long)]
    pub list: bool,

    /// List clusters on a site
    #[arg(long, visible_alias = "lc")]
    pub list_clusters: bool,

    /// Operation to perform on cluster
    #[arg(short = 'o', long, value_enum)]
    pub operation: Option<ClusterOperation>,

    /// Name of cluster to act on
    #[arg(short = 'c', long)]
    pub cluster: Option<String>,

    /// Delete cluster specified with -c
    #[arg(short = 'D', long)]
    pub delete_cluster: bool,

    /// Create cluster specified with -c if it does not exist
    #[arg(long, visible_alias = "cr")]
    pub create_cluster: bool,
}

impl ManageSiteArgs {
    pub fn has_action(&self) -> bool {
        !self.add_machines.is_empty()
            || !self.remove_machines.is_empty()
            || self.delete_cluster
            || self.create_cluster
            || self.list
            || self.list_clusters
            || self.operation.is_some()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminCommand {
    /// Creates a service from one or more service definition files
    CreateService(CreateServiceArgs),

    /// Manages/modifies a service
    ManageService(ManageServiceArgs),

    /// Manages/modifies a site
    ManageSite(ManageSiteArgs),
}

impl AdminCommand {
    pub fn site_args(&self) -> &SiteArgs {
        match self {
            Self::CreateService(args) => &args.site,
            Self::ManageService(args) => &args.site,
            Self::ManageSite(args) => &args.site,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "gis-admin")]
#[command(about = "Command-line administration for a GIS server site")]
pub struct GisAdminCli {
    #[command(subcommand)]
    pub command: AdminCommand,
}
