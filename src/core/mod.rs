pub mod create_service;
pub mod manage_service;
pub mod manage_site;
pub mod narrator;

pub use crate::domain::model::{ClusterInfo, PublishJob, ServiceCatalog, ServiceRef};
pub use crate::domain::ports::{SiteAdmin, SiteConnector};
pub use crate::utils::error::Result;
pub use narrator::{ActionNarrator, NarratedError};
