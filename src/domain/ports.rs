use crate::config::site::SiteUrls;
use crate::domain::model::{
    ClusterInfo, Credentials, PublishJob, PublishTool, ServiceCatalog, ServiceRef, ServiceStatus,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Opens an authenticated session against a site.
#[async_trait]
pub trait SiteConnector: Send + Sync {
    type Site: SiteAdmin;

    async fn connect(&self, urls: &SiteUrls, credentials: &Credentials) -> Result<Self::Site>;
}

/// Administrative operations on one connected site.
#[async_trait]
pub trait SiteAdmin: Send + Sync {
    // REST catalog / publishing
    async fn check_rest_catalog(&self) -> Result<()>;
    async fn publish_tool(&self) -> Result<PublishTool>;
    async fn upload_item(&self, path: &Path) -> Result<String>;
    async fn submit_publish(
        &self,
        tool: &PublishTool,
        item_id: &str,
        cluster: Option<&str>,
    ) -> Result<PublishJob>;
    async fn publish_job(&self, tool: &PublishTool, job_id: &str) -> Result<PublishJob>;

    // services
    async fn list_services(&self) -> Result<ServiceCatalog>;
    async fn service_status(&self, service: &ServiceRef) -> Result<ServiceStatus>;
    async fn start_service(&self, service: &ServiceRef) -> Result<()>;
    async fn stop_service(&self, service: &ServiceRef) -> Result<()>;
    async fn delete_service(&self, service: &ServiceRef) -> Result<()>;

    // clusters / machines
    /// `Ok(None)` when the site has no cluster with that name.
    async fn cluster(&self, name: &str) -> Result<Option<ClusterInfo>>;
    async fn cluster_names(&self) -> Result<Vec<String>>;
    async fn create_cluster(&self, name: &str) -> Result<ClusterInfo>;
    async fn delete_cluster(&self, name: &str) -> Result<()>;
    async fn start_cluster(&self, name: &str) -> Result<()>;
    async fn stop_cluster(&self, name: &str) -> Result<()>;
    async fn add_machine(&self, cluster: &str, machine: &str) -> Result<()>;
    async fn remove_machine(&self, cluster: &str, machine: &str) -> Result<()>;
    async fn cluster_machines(&self, cluster: &str) -> Result<Vec<String>>;
    async fn site_machines(&self) -> Result<Vec<String>>;
}
