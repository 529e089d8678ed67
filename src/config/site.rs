use crate::config::SiteArgs;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_url;
use std::time::Duration;
use url::Url;

const ADMIN_PATH: &str = "/arcgis/admin/";
const REST_PATH: &str = "/arcgis/rest/";

/// Admin and REST roots of a site. The path of the `--site` URL is replaced, so
/// `https://host:6443/anything` and `https://host:6443` both map to the same roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    pub admin: Url,
    pub rest: Url,
}

impl SiteUrls {
    pub fn from_site(site: &str) -> Result<Self> {
        let base = validate_url("site", site)?;
        let admin = base.join(ADMIN_PATH)?;
        let rest = admin.join(REST_PATH)?;
        Ok(Self { admin, rest })
    }

    pub fn admin_endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        endpoint(&self.admin, segments)
    }

    pub fn rest_endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        endpoint(&self.rest, segments)
    }
}

/// Appends percent-encoded path segments to `base`.
pub fn endpoint<S: AsRef<str>>(base: &Url, segments: &[S]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AdminError::InvalidArgumentError {
            field: "site".to_string(),
            value: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments.iter().map(|s| s.as_ref()));
    Ok(url)
}

/// HTTP client knobs derived from the shared flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout: Option<Duration>,
    pub accept_invalid_certs: bool,
}

impl From<&SiteArgs> for ClientSettings {
    fn from(args: &SiteArgs) -> Self {
        Self {
            timeout: args.timeout.map(Duration::from_secs),
            accept_invalid_certs: args.insecure,
        }
    }
}
