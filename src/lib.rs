pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{ArcGisAdmin, HttpConnector};
pub use config::{AdminCommand, CreateServiceArgs, GisAdminCli, ManageServiceArgs, ManageSiteArgs};
pub use core::{ActionNarrator, NarratedError};
pub use utils::error::{AdminError, Result};
