use crate::config::CreateServiceArgs;
use crate::core::narrator::{ActionNarrator, NarratedError};
use crate::domain::model::{PublishJob, PublishTool};
use crate::domain::ports::{SiteAdmin, SiteConnector};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{file_name_of, validate_definition_files};
use std::io::Write;
use std::time::Duration;

/// Publish jobs are polled at this fixed interval until they leave the running states.
pub const PUBLISH_POLL_INTERVAL: Duration = Duration::from_millis(125);

pub async fn run<C, W>(
    args: &CreateServiceArgs,
    connector: &C,
    narrator: &mut ActionNarrator,
    out: &mut W,
) -> std::result::Result<(), NarratedError>
where
    C: SiteConnector,
    W: Write,
{
    let urls = narrator.check("checking site arguments", || args.site.site_urls())?;
    let credentials = args.site.credentials();

    let site = narrator
        .step(
            format!("connecting to admin site {}", urls.admin),
            connector.connect(&urls, &credentials),
        )
        .await?;
    narrator
        .step(
            format!("connecting to REST services {}", urls.rest),
            site.check_rest_catalog(),
        )
        .await?;
    let tool = narrator
        .step("looking up Publish Tool", site.publish_tool())
        .await?;

    let cluster = narrator
        .step(
            "looking up cluster",
            resolve_cluster(&site, args.cluster.as_deref()),
        )
        .await?;

    let files = narrator.check("verifying service definition file exists", || {
        validate_definition_files(&args.sdfile)
    })?;

    for file in &files {
        let item_id = narrator
            .step(format!("uploading {}", file.display()), site.upload_item(file))
            .await?;

        let file_name = file_name_of(file);
        let job = narrator
            .step(
                format!("publishing {}", file_name),
                publish(&site, &tool, &item_id, cluster.as_deref()),
            )
            .await?;

        tracing::info!("✅ Published {} (job {})", file_name, job.job_id);
        narrator.check("reporting result", || -> Result<()> {
            writeln!(out, "Published {}", file_name)?;
            Ok(())
        })?;
    }

    Ok(())
}

async fn resolve_cluster<S: SiteAdmin>(site: &S, name: Option<&str>) -> Result<Option<String>> {
    let Some(name) = name else {
        return Ok(None);
    };
    match site.cluster(name).await? {
        Some(cluster) => Ok(Some(cluster.name)),
        None => Err(AdminError::not_found("Cluster", name)),
    }
}

/// Submits the publish job and waits for it to leave the running states.
pub async fn publish<S: SiteAdmin>(
    site: &S,
    tool: &PublishTool,
    item_id: &str,
    cluster: Option<&str>,
) -> Result<PublishJob> {
    let mut job = site.submit_publish(tool, item_id, cluster).await?;
    tracing::debug!("Publish job {} submitted ({})", job.job_id, job.status);

    while job.is_running() {
        tokio::time::sleep(PUBLISH_POLL_INTERVAL).await;
        job = site.publish_job(tool, &job.job_id).await?;
        tracing::debug!("Publish job {} is {}", job.job_id, job.status);
    }

    job.into_outcome()
}
