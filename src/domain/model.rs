use crate::utils::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// 密碼不可出現在 debug log
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRef {
    pub folder: Option<String>,
    pub name: String,
    pub service_type: String,
}

impl ServiceRef {
    /// `[folder/]name.Type`
    pub fn qualified_name(&self) -> String {
        match &self.folder {
            Some(folder) => format!("{}/{}.{}", folder, self.name, self.service_type),
            None => format!("{}.{}", self.name, self.service_type),
        }
    }

    /// Path segments under the admin `services` resource.
    pub fn path_segments(&self) -> Vec<String> {
        let mut segments = Vec::with_capacity(2);
        if let Some(folder) = &self.folder {
            segments.push(folder.clone());
        }
        segments.push(format!("{}.{}", self.name, self.service_type));
        segments
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFolder {
    pub name: String,
    pub services: Vec<ServiceRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    pub services: Vec<ServiceRef>,
    pub folders: Vec<ServiceFolder>,
}

impl ServiceCatalog {
    /// Root services first, then each folder's services in listing order.
    pub fn all_services(&self) -> impl Iterator<Item = &ServiceRef> {
        self.services
            .iter()
            .chain(self.folders.iter().flat_map(|folder| folder.services.iter()))
    }

    /// Resolves `name`, `name.Type`, `folder/name` or `folder/name.Type`.
    pub fn find(&self, name: &str) -> Result<&ServiceRef> {
        let (folder, rest) = match name.split_once('/') {
            Some((folder, rest)) => (Some(folder), rest),
            None => (None, name),
        };
        let (service_name, service_type) = match rest.rsplit_once('.') {
            Some((service_name, service_type)) => (service_name, Some(service_type)),
            None => (rest, None),
        };

        let matches: Vec<&ServiceRef> = self
            .all_services()
            .filter(|service| service.folder.as_deref() == folder)
            .filter(|service| service.name.eq_ignore_ascii_case(service_name))
            .filter(|service| {
                service_type
                    .map(|t| service.service_type.eq_ignore_ascii_case(t))
                    .unwrap_or(true)
            })
            .collect();

        match matches.as_slice() {
            [] => Err(AdminError::not_found("Service", name)),
            [service] => Ok(*service),
            many => Err(AdminError::precondition(format!(
                "Service name {} is ambiguous, use one of: {}",
                name,
                many.iter()
                    .map(|service| service.qualified_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl ServiceStatus {
    pub fn real_time_state(&self) -> Option<&str> {
        self.fields.get("realTimeState").and_then(|v| v.as_str())
    }

    /// `key: value` lines sorted by key.
    pub fn lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => format!("{}: {}", key, s),
                other => format!("{}: {}", key, other),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTool {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    New,
    Submitted,
    Waiting,
    Executing,
    Succeeded,
    Failed,
    TimedOut,
    Cancelling,
    Cancelled,
}

impl JobStatus {
    pub fn from_esri(code: &str) -> Option<Self> {
        match code {
            "esriJobNew" => Some(Self::New),
            "esriJobSubmitted" => Some(Self::Submitted),
            "esriJobWaiting" => Some(Self::Waiting),
            "esriJobExecuting" => Some(Self::Executing),
            "esriJobSucceeded" => Some(Self::Succeeded),
            "esriJobFailed" => Some(Self::Failed),
            "esriJobTimedOut" => Some(Self::TimedOut),
            "esriJobCancelling" => Some(Self::Cancelling),
            "esriJobCancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_esri(&self) -> &'static str {
        match self {
            Self::New => "esriJobNew",
            Self::Submitted => "esriJobSubmitted",
            Self::Waiting => "esriJobWaiting",
            Self::Executing => "esriJobExecuting",
            Self::Succeeded => "esriJobSucceeded",
            Self::Failed => "esriJobFailed",
            Self::TimedOut => "esriJobTimedOut",
            Self::Cancelling => "esriJobCancelling",
            Self::Cancelled => "esriJobCancelled",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Self::New | Self::Submitted | Self::Waiting | Self::Executing | Self::Cancelling
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_esri())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishJob {
    pub job_id: String,
    pub status: JobStatus,
    pub messages: Vec<String>,
}

impl PublishJob {
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// 非成功的結束狀態轉成錯誤
    pub fn into_outcome(self) -> Result<PublishJob> {
        match self.status {
            JobStatus::Succeeded => Ok(self),
            status => Err(AdminError::JobFailedError {
                job_id: self.job_id,
                status: status.to_string(),
                message: if self.messages.is_empty() {
                    "no messages reported".to_string()
                } else {
                    self.messages.join("; ")
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub name: String,
    pub configured_state: Option<String>,
    pub machines: Vec<String>,
}
