use crate::config::site::{endpoint, ClientSettings, SiteUrls};
use crate::domain::model::{
    ClusterInfo, Credentials, JobStatus, PublishJob, PublishTool, ServiceCatalog, ServiceFolder,
    ServiceRef, ServiceStatus,
};
use crate::domain::ports::{SiteAdmin, SiteConnector};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::file_name_of;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use url::Url;

const TOKEN_EXPIRATION_MINUTES: &str = "60";
const PUBLISH_TOOL_PATH: [&str; 5] = [
    "services",
    "System",
    "PublishingTools",
    "GPServer",
    "Publish Service Definition",
];
const DEFAULT_CLUSTER_PROTOCOL: &str = r#"{"tcpClusterPort":"4014"}"#;
const ROOT_FOLDER: &str = "/";

/// Connects to a site over HTTP by generating an admin token.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    settings: ClientSettings,
}

impl HttpConnector {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<Client> {
        let mut builder =
            Client::builder().danger_accept_invalid_certs(self.settings.accept_invalid_certs);
        if let Some(timeout) = self.settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl SiteConnector for HttpConnector {
    type Site = ArcGisAdmin;

    async fn connect(&self, urls: &SiteUrls, credentials: &Credentials) -> Result<ArcGisAdmin> {
        let client = self.build_client()?;
        ArcGisAdmin::connect(client, urls.clone(), credentials).await
    }
}

/// Admin REST client for one site, holding the session token.
#[derive(Debug, Clone)]
pub struct ArcGisAdmin {
    client: Client,
    urls: SiteUrls,
    token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceEntry {
    service_name: String,
    #[serde(rename = "type")]
    service_type: String,
}

#[derive(Debug, Deserialize)]
struct FolderListing {
    #[serde(default)]
    folders: Vec<String>,
    #[serde(default)]
    services: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    item: UploadedItem,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedItem {
    #[serde(rename = "itemID")]
    item_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobResponse {
    job_id: String,
    job_status: String,
    #[serde(default)]
    messages: Vec<JobMessage>,
}

#[derive(Debug, Deserialize)]
struct JobMessage {
    #[serde(rename = "type", default)]
    message_type: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterEntry {
    cluster_name: String,
    #[serde(default)]
    configured_state: Option<String>,
    #[serde(default)]
    machine_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ClusterListing {
    #[serde(default)]
    clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineEntry {
    machine_name: String,
}

#[derive(Debug, Deserialize)]
struct MachineListing {
    #[serde(default)]
    machines: Vec<MachineEntry>,
}

impl From<ClusterEntry> for ClusterInfo {
    fn from(entry: ClusterEntry) -> Self {
        Self {
            name: entry.cluster_name,
            configured_state: entry.configured_state,
            machines: entry.machine_names,
        }
    }
}

impl JobResponse {
    fn into_job(self) -> Result<PublishJob> {
        let status = JobStatus::from_esri(&self.job_status).ok_or_else(|| {
            AdminError::ServerError {
                code: None,
                message: format!("Unknown job status {}", self.job_status),
            }
        })?;
        // 只保留錯誤與警告訊息
        let messages = self
            .messages
            .into_iter()
            .filter(|m| m.message_type != "esriJobMessageTypeInformative")
            .map(|m| m.description)
            .collect();
        Ok(PublishJob {
            job_id: self.job_id,
            status,
            messages,
        })
    }
}

/// Turns `{"status":"error","messages":[..],"code":N}` bodies into errors.
pub fn check_status(value: Value) -> Result<Value> {
    if value.get("status").and_then(Value::as_str) != Some("error") {
        return Ok(value);
    }

    let message = value
        .get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| "Server reported an error".to_string());
    let code = value
        .get("code")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok());

    Err(AdminError::ServerError { code, message })
}

impl ArcGisAdmin {
    pub async fn connect(client: Client, urls: SiteUrls, credentials: &Credentials) -> Result<Self> {
        let url = urls.admin_endpoint(&["generateToken"])?;
        tracing::debug!("Requesting admin token from: {}", url);

        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("client", "requestip"),
            ("expiration", TOKEN_EXPIRATION_MINUTES),
            ("f", "json"),
        ];
        let response = client.post(url).form(&form).send().await?.error_for_status()?;
        let body: Value = response.json().await?;
        let body = check_status(body).map_err(|e| AdminError::AuthError {
            message: e.to_string(),
        })?;
        let token: TokenResponse = serde_json::from_value(body)?;

        tracing::info!("🔑 Authenticated as {}", credentials.username);
        Ok(Self {
            client,
            urls,
            token: token.token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(&[("f", "json"), ("token", self.token.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let body = check_status(response.json().await?)?;
        Ok(serde_json::from_value(body)?)
    }

    async fn post_form<T: DeserializeOwned>(&self, url: Url, params: &[(&str, &str)]) -> Result<T> {
        tracing::debug!("POST {}", url);
        let mut form: Vec<(&str, &str)> = vec![("f", "json"), ("token", self.token.as_str())];
        form.extend_from_slice(params);
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        let body = check_status(response.json().await?)?;
        Ok(serde_json::from_value(body)?)
    }

    async fn post_action(&self, url: Url, params: &[(&str, &str)]) -> Result<()> {
        let _: Value = self.post_form(url, params).await?;
        Ok(())
    }

    fn service_url(&self, service: &ServiceRef, action: Option<&str>) -> Result<Url> {
        let mut segments = vec!["services".to_string()];
        segments.extend(service.path_segments());
        if let Some(action) = action {
            segments.push(action.to_string());
        }
        self.urls.admin_endpoint(segments.as_slice())
    }

    fn folder_services(folder: Option<&str>, entries: Vec<ServiceEntry>) -> Vec<ServiceRef> {
        entries
            .into_iter()
            .map(|entry| ServiceRef {
                folder: folder.map(str::to_string),
                name: entry.service_name,
                service_type: entry.service_type,
            })
            .collect()
    }
}

#[async_trait]
impl SiteAdmin for ArcGisAdmin {
    async fn check_rest_catalog(&self) -> Result<()> {
        let url = self.urls.rest_endpoint(&["services"])?;
        let _: Value = self.get_json(url).await?;
        Ok(())
    }

    async fn publish_tool(&self) -> Result<PublishTool> {
        let url = self.urls.rest_endpoint(&PUBLISH_TOOL_PATH)?;
        let name = PUBLISH_TOOL_PATH[PUBLISH_TOOL_PATH.len() - 1];
        match self.get_json::<Value>(url.clone()).await {
            Ok(_) => Ok(PublishTool {
                name: name.to_string(),
                url: url.to_string(),
            }),
            Err(AdminError::ServerError { .. }) => Err(AdminError::not_found("Tool", name)),
            Err(e) => Err(e),
        }
    }

    async fn upload_item(&self, path: &Path) -> Result<String> {
        let url = self.urls.admin_endpoint(&["uploads", "upload"])?;
        tracing::debug!("Uploading {} to {}", path.display(), url);

        let data = tokio::fs::read(path).await?;
        let part = Part::bytes(data)
            .file_name(file_name_of(path))
            .mime_str("application/octet-stream")?;
        let form = Form::new()
            .text("f", "json")
            .text("token", self.token.clone())
            .part("itemFile", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body = check_status(response.json().await?)?;
        let upload: UploadResponse = serde_json::from_value(body)?;
        Ok(upload.item.item_id)
    }

    async fn submit_publish(
        &self,
        tool: &PublishTool,
        item_id: &str,
        cluster: Option<&str>,
    ) -> Result<PublishJob> {
        let url = endpoint(&Url::parse(&tool.url)?, &["submitJob"])?;
        let overwrite = cluster.map(|name| serde_json::json!({ "clusterName": name }).to_string());

        let mut params = vec![("in_sdp_id", item_id)];
        if let Some(overwrite) = overwrite.as_deref() {
            params.push(("in_config_overwrite", overwrite));
        }
        let job: JobResponse = self.post_form(url, &params).await?;
        job.into_job()
    }

    async fn publish_job(&self, tool: &PublishTool, job_id: &str) -> Result<PublishJob> {
        let url = endpoint(&Url::parse(&tool.url)?, &["jobs", job_id])?;
        let job: JobResponse = self.get_json(url).await?;
        job.into_job()
    }

    async fn list_services(&self) -> Result<ServiceCatalog> {
        let root: FolderListing = self
            .get_json(self.urls.admin_endpoint(&["services"])?)
            .await?;

        let mut folders = Vec::with_capacity(root.folders.len());
        for folder in root.folders.into_iter().filter(|f| f != ROOT_FOLDER) {
            let listing: FolderListing = self
                .get_json(self.urls.admin_endpoint(&["services", folder.as_str()])?)
                .await?;
            folders.push(ServiceFolder {
                services: Self::folder_services(Some(folder.as_str()), listing.services),
                name: folder,
            });
        }

        Ok(ServiceCatalog {
            services: Self::folder_services(None, root.services),
            folders,
        })
    }

    async fn service_status(&self, service: &ServiceRef) -> Result<ServiceStatus> {
        let fields = self
            .get_json(self.service_url(service, Some("status"))?)
            .await?;
        Ok(ServiceStatus { fields })
    }

    async fn start_service(&self, service: &ServiceRef) -> Result<()> {
        self.post_action(self.service_url(service, Some("start"))?, &[])
            .await
    }

    async fn stop_service(&self, service: &ServiceRef) -> Result<()> {
        self.post_action(self.service_url(service, Some("stop"))?, &[])
            .await
    }

    async fn delete_service(&self, service: &ServiceRef) -> Result<()> {
        self.post_action(self.service_url(service, Some("delete"))?, &[])
            .await
    }

    async fn cluster(&self, name: &str) -> Result<Option<ClusterInfo>> {
        let url = self.urls.admin_endpoint(&["clusters", name])?;
        match self.get_json::<ClusterEntry>(url).await {
            Ok(entry) => Ok(Some(entry.into())),
            Err(e) if e.server_code() == Some(404) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn cluster_names(&self) -> Result<Vec<String>> {
        let listing: ClusterListing = self
            .get_json(self.urls.admin_endpoint(&["clusters"])?)
            .await?;
        Ok(listing
            .clusters
            .into_iter()
            .map(|cluster| cluster.cluster_name)
            .collect())
    }

    async fn create_cluster(&self, name: &str) -> Result<ClusterInfo> {
        let url = self.urls.admin_endpoint(&["clusters", "create"])?;
        self.post_action(
            url,
            &[
                ("clusterName", name),
                ("clusterProtocol", DEFAULT_CLUSTER_PROTOCOL),
                ("machineNames", ""),
            ],
        )
        .await?;
        tracing::info!("✅ Created cluster {}", name);

        self.cluster(name)
            .await?
            .ok_or_else(|| AdminError::not_found("Cluster", name))
    }

    async fn delete_cluster(&self, name: &str) -> Result<()> {
        self.post_action(self.urls.admin_endpoint(&["clusters", name, "delete"])?, &[])
            .await
    }

    async fn start_cluster(&self, name: &str) -> Result<()> {
        self.post_action(self.urls.admin_endpoint(&["clusters", name, "start"])?, &[])
            .await
    }

    async fn stop_cluster(&self, name: &str) -> Result<()> {
        self.post_action(self.urls.admin_endpoint(&["clusters", name, "stop"])?, &[])
            .await
    }

    async fn add_machine(&self, cluster: &str, machine: &str) -> Result<()> {
        let url = self
            .urls
            .admin_endpoint(&["clusters", cluster, "machines", "add"])?;
        self.post_action(url, &[("machineNames", machine)]).await
    }

    async fn remove_machine(&self, cluster: &str, machine: &str) -> Result<()> {
        let url = self
            .urls
            .admin_endpoint(&["clusters", cluster, "machines", "remove"])?;
        self.post_action(url, &[("machineNames", machine)]).await
    }

    async fn cluster_machines(&self, cluster: &str) -> Result<Vec<String>> {
        let listing: MachineListing = self
            .get_json(self.urls.admin_endpoint(&["clusters", cluster, "machines"])?)
            .await?;
        Ok(listing.machines.into_iter().map(|m| m.machine_name).collect())
    }

    async fn site_machines(&self) -> Result<Vec<String>> {
        let listing: MachineListing = self
            .get_json(self.urls.admin_endpoint(&["machines"])?)
            .await?;
        Ok(listing.machines.into_iter().map(|m| m.machine_name).collect())
    }
}
