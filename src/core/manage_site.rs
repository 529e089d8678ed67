use crate::config::{ClusterOperation, ManageSiteArgs};
use crate::core::narrator::{ActionNarrator, NarratedError};
use crate::domain::ports::{SiteAdmin, SiteConnector};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::ensure;
use std::io::Write;

const NO_CLUSTER: &str = "No cluster specified";

/// Runs the requested site actions in a fixed order: cluster operation, delete cluster, add
/// machines, remove machines, list machines, list clusters.
pub async fn run<C, W>(
    args: &ManageSiteArgs,
    connector: &C,
    narrator: &mut ActionNarrator,
    out: &mut W,
) -> std::result::Result<(), NarratedError>
where
    C: SiteConnector,
    W: Write,
{
    narrator.check("determining actions to perform", || {
        ensure(
            args.has_action(),
            "No action specified (use --help for options)",
        )?;
        ensure(
            !args.create_cluster || args.cluster.is_some(),
            NO_CLUSTER,
        )
    })?;

    let urls = narrator.check("checking site arguments", || args.site.site_urls())?;
    let site = narrator
        .step(
            format!("connecting to admin site {}", urls.admin),
            connector.connect(&urls, &args.site.credentials()),
        )
        .await?;

    let mut cluster = narrator
        .step("looking up cluster", lookup_cluster(&site, args))
        .await?;

    if cluster.is_none() && args.create_cluster {
        if let Some(name) = args.cluster.as_deref() {
            let created = narrator
                .step(format!("creating cluster {}", name), site.create_cluster(name))
                .await?;
            cluster = Some(created.name);
        }
    }

    if let Some(operation) = args.operation {
        let label = match operation {
            ClusterOperation::Chkstatus => "checking cluster status",
            ClusterOperation::Start => "starting cluster",
            ClusterOperation::Stop => "stopping cluster",
        };
        narrator
            .step(label, async {
                let name = require(cluster.as_deref())?;
                match operation {
                    ClusterOperation::Chkstatus => {
                        let info = site
                            .cluster(name)
                            .await?
                            .ok_or_else(|| AdminError::not_found("Cluster", name))?;
                        writeln!(
                            out,
                            "Cluster {}: {}",
                            info.name,
                            info.configured_state.as_deref().unwrap_or("UNKNOWN")
                        )?;
                        for machine in &info.machines {
                            writeln!(out, "- {}", machine)?;
                        }
                    }
                    ClusterOperation::Start => site.start_cluster(name).await?,
                    ClusterOperation::Stop => site.stop_cluster(name).await?,
                }
                Ok::<_, AdminError>(())
            })
            .await?;
    }

    if args.delete_cluster {
        narrator
            .step("deleting cluster", async {
                let name = cluster.as_deref().ok_or_else(|| {
                    AdminError::precondition("Asked to delete a cluster when none was specified")
                })?;
                site.delete_cluster(name).await
            })
            .await?;
        // 已刪除的 cluster 不再作為後續動作的對象
        cluster = None;
    }

    if !args.add_machines.is_empty() {
        let name = narrator.check("adding machines to cluster", || {
            require(cluster.as_deref()).map(str::to_string)
        })?;
        for machine in &args.add_machines {
            narrator
                .step(
                    format!("adding {} to cluster", machine),
                    site.add_machine(&name, machine),
                )
                .await?;
        }
    }

    if !args.remove_machines.is_empty() {
        let name = narrator.check("removing machines from cluster", || {
            require(cluster.as_deref()).map(str::to_string)
        })?;
        for machine in &args.remove_machines {
            narrator
                .step(
                    format!("removing {} from cluster", machine),
                    site.remove_machine(&name, machine),
                )
                .await?;
        }
    }

    if args.list {
        narrator
            .step(
                "listing machines",
                list_machines(&site, cluster.as_deref(), out),
            )
            .await?;
    }

    if args.list_clusters {
        narrator
            .step("listing clusters", list_clusters(&site, out))
            .await?;
    }

    Ok(())
}

fn require(cluster: Option<&str>) -> Result<&str> {
    cluster.ok_or_else(|| AdminError::precondition(NO_CLUSTER))
}

/// A named cluster that does not exist is an error unless it is about to be created.
async fn lookup_cluster<S: SiteAdmin>(site: &S, args: &ManageSiteArgs) -> Result<Option<String>> {
    let Some(name) = args.cluster.as_deref() else {
        return Ok(None);
    };
    match site.cluster(name).await? {
        Some(info) => Ok(Some(info.name)),
        None if args.create_cluster => Ok(None),
        None => Err(AdminError::not_found("Cluster", name)),
    }
}

async fn list_machines<S: SiteAdmin, W: Write>(
    site: &S,
    cluster: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let (scope, machines) = match cluster {
        Some(name) => ("cluster", site.cluster_machines(name).await?),
        None => ("site", site.site_machines().await?),
    };
    writeln!(out, "===Machines on this {}===", scope)?;
    for machine in machines {
        writeln!(out, "- {}", machine)?;
    }
    writeln!(out)?;
    Ok(())
}

async fn list_clusters<S: SiteAdmin, W: Write>(site: &S, out: &mut W) -> Result<()> {
    writeln!(out, "===Clusters on this site===")?;
    for name in site.cluster_names().await? {
        writeln!(out, "- {}", name)?;
    }
    writeln!(out)?;
    Ok(())
}
