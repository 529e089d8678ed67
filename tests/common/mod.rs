#![allow(dead_code)]

use async_trait::async_trait;
use gis_admin::config::site::SiteUrls;
use gis_admin::domain::model::{
    ClusterInfo, Credentials, JobStatus, PublishJob, PublishTool, ServiceCatalog, ServiceFolder,
    ServiceRef, ServiceStatus,
};
use gis_admin::domain::ports::{SiteAdmin, SiteConnector};
use gis_admin::{AdminError, Result};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// In-memory site that records every call it receives.
#[derive(Clone, Default)]
pub struct MockSite {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub clusters: Arc<Mutex<BTreeMap<String, Vec<String>>>>,
    pub site_machines: Vec<String>,
    pub catalog: ServiceCatalog,
    pub statuses: BTreeMap<String, ServiceStatus>,
    pub job_states: Arc<Mutex<VecDeque<JobStatus>>>,
}

impl MockSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(self, name: &str, machines: &[&str]) -> Self {
        self.clusters.lock().unwrap().insert(
            name.to_string(),
            machines.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn with_site_machines(mut self, machines: &[&str]) -> Self {
        self.site_machines = machines.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_service(mut self, folder: Option<&str>, name: &str, service_type: &str, state: &str) -> Self {
        let service = ServiceRef {
            folder: folder.map(str::to_string),
            name: name.to_string(),
            service_type: service_type.to_string(),
        };
        let mut status = ServiceStatus::default();
        status
            .fields
            .insert("realTimeState".to_string(), serde_json::json!(state));
        status
            .fields
            .insert("configuredState".to_string(), serde_json::json!("STARTED"));
        self.statuses.insert(service.qualified_name(), status);

        match folder {
            None => self.catalog.services.push(service),
            Some(folder_name) => {
                if let Some(existing) = self
                    .catalog
                    .folders
                    .iter_mut()
                    .find(|f| f.name == folder_name)
                {
                    existing.services.push(service);
                } else {
                    self.catalog.folders.push(ServiceFolder {
                        name: folder_name.to_string(),
                        services: vec![service],
                    });
                }
            }
        }
        self
    }

    pub fn with_job_states(self, states: &[JobStatus]) -> Self {
        self.job_states.lock().unwrap().extend(states.iter().copied());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_job(&self, job_id: &str) -> PublishJob {
        let status = self
            .job_states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JobStatus::Succeeded);
        PublishJob {
            job_id: job_id.to_string(),
            status,
            messages: if status == JobStatus::Failed {
                vec!["ERROR 001369".to_string()]
            } else {
                vec![]
            },
        }
    }

    fn cluster_exists(&self, name: &str) -> Result<()> {
        if self.clusters.lock().unwrap().contains_key(name) {
            Ok(())
        } else {
            Err(AdminError::not_found("Cluster", name))
        }
    }
}

#[async_trait]
impl SiteAdmin for MockSite {
    async fn check_rest_catalog(&self) -> Result<()> {
        self.record("check_rest_catalog".to_string());
        Ok(())
    }

    async fn publish_tool(&self) -> Result<PublishTool> {
        self.record("publish_tool".to_string());
        Ok(PublishTool {
            name: "Publish Service Definition".to_string(),
            url: "http://mock/arcgis/rest/services/System/PublishingTools/GPServer/Publish%20Service%20Definition".to_string(),
        })
    }

    async fn upload_item(&self, path: &Path) -> Result<String> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.record(format!("upload_item {}", name));
        Ok(format!("item-{}", name))
    }

    async fn submit_publish(
        &self,
        _tool: &PublishTool,
        item_id: &str,
        cluster: Option<&str>,
    ) -> Result<PublishJob> {
        self.record(format!("submit_publish {} {}", item_id, cluster.unwrap_or("-")));
        Ok(self.next_job(&format!("job-{}", item_id)))
    }

    async fn publish_job(&self, _tool: &PublishTool, job_id: &str) -> Result<PublishJob> {
        self.record(format!("publish_job {}", job_id));
        Ok(self.next_job(job_id))
    }

    async fn list_services(&self) -> Result<ServiceCatalog> {
        self.record("list_services".to_string());
        Ok(self.catalog.clone())
    }

    async fn service_status(&self, service: &ServiceRef) -> Result<ServiceStatus> {
        self.record(format!("service_status {}", service.qualified_name()));
        self.statuses
            .get(&service.qualified_name())
            .cloned()
            .ok_or_else(|| AdminError::not_found("Service", service.qualified_name()))
    }

    async fn start_service(&self, service: &ServiceRef) -> Result<()> {
        self.record(format!("start_service {}", service.qualified_name()));
        Ok(())
    }

    async fn stop_service(&self, service: &ServiceRef) -> Result<()> {
        self.record(format!("stop_service {}", service.qualified_name()));
        Ok(())
    }

    async fn delete_service(&self, service: &ServiceRef) -> Result<()> {
        self.record(format!("delete_service {}", service.qualified_name()));
        Ok(())
    }

    async fn cluster(&self, name: &str) -> Result<Option<ClusterInfo>> {
        self.record(format!("cluster {}", name));
        Ok(self
            .clusters
            .lock()
            .unwrap()
            .get(name)
            .map(|machines| ClusterInfo {
                name: name.to_string(),
                configured_state: Some("STARTED".to_string()),
                machines: machines.clone(),
            }))
    }

    async fn cluster_names(&self) -> Result<Vec<String>> {
        self.record("cluster_names".to_string());
        Ok(self.clusters.lock().unwrap().keys().cloned().collect())
    }

    async fn create_cluster(&self, name: &str) -> Result<ClusterInfo> {
        self.record(format!("create_cluster {}", name));
        self.clusters
            .lock()
            .unwrap()
            .insert(name.to_string(), Vec::new());
        Ok(ClusterInfo {
            name: name.to_string(),
            configured_state: Some("STARTED".to_string()),
            machines: Vec::new(),
        })
    }

    async fn delete_cluster(&self, name: &str) -> Result<()> {
        self.record(format!("delete_cluster {}", name));
        self.cluster_exists(name)?;
        self.clusters.lock().unwrap().remove(name);
        Ok(())
    }

    async fn start_cluster(&self, name: &str) -> Result<()> {
        self.record(format!("start_cluster {}", name));
        self.cluster_exists(name)
    }

    async fn stop_cluster(&self, name: &str) -> Result<()> {
        self.record(format!("stop_cluster {}", name));
        self.cluster_exists(name)
    }

    async fn add_machine(&self, cluster: &str, machine: &str) -> Result<()> {
        self.record(format!("add_machine {} {}", cluster, machine));
        self.cluster_exists(cluster)?;
        if let Some(machines) = self.clusters.lock().unwrap().get_mut(cluster) {
            machines.push(machine.to_string());
        }
        Ok(())
    }

    async fn remove_machine(&self, cluster: &str, machine: &str) -> Result<()> {
        self.record(format!("remove_machine {} {}", cluster, machine));
        let mut clusters = self.clusters.lock().unwrap();
        let machines = clusters
            .get_mut(cluster)
            .ok_or_else(|| AdminError::not_found("Cluster", cluster))?;
        let before = machines.len();
        machines.retain(|m| m != machine);
        if machines.len() == before {
            return Err(AdminError::not_found("Machine", machine));
        }
        Ok(())
    }

    async fn cluster_machines(&self, cluster: &str) -> Result<Vec<String>> {
        self.record(format!("cluster_machines {}", cluster));
        self.cluster_exists(cluster)?;
        Ok(self.clusters.lock().unwrap()[cluster].clone())
    }

    async fn site_machines(&self) -> Result<Vec<String>> {
        self.record("site_machines".to_string());
        Ok(self.site_machines.clone())
    }
}

/// Hands out a clone of the wrapped site and counts connection attempts.
#[derive(Clone, Default)]
pub struct MockConnector {
    pub site: MockSite,
    pub connects: Arc<Mutex<usize>>,
    pub fail_with: Option<String>,
}

impl MockConnector {
    pub fn new(site: MockSite) -> Self {
        Self {
            site,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap()
    }
}

#[async_trait]
impl SiteConnector for MockConnector {
    type Site = MockSite;

    async fn connect(&self, _urls: &SiteUrls, _credentials: &Credentials) -> Result<MockSite> {
        *self.connects.lock().unwrap() += 1;
        match &self.fail_with {
            Some(message) => Err(AdminError::AuthError {
                message: message.clone(),
            }),
            None => Ok(self.site.clone()),
        }
    }
}

pub fn site_flags() -> Vec<String> {
    ["-u", "admin", "-p", "secret", "-s", "https://gis.example.com:6443"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn argv(bin: &str, extra: &[&str]) -> Vec<String> {
    let mut args = vec![bin.to_string()];
    args.extend(site_flags());
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}

pub fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}
