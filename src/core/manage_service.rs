use crate::config::{ManageServiceArgs, ServiceOperation};
use crate::core::narrator::{ActionNarrator, NarratedError};
use crate::domain::model::{ServiceCatalog, ServiceRef, ServiceStatus};
use crate::domain::ports::{SiteAdmin, SiteConnector};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::ensure;
use std::io::Write;

/// Which services are printed in list mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Started,
    Stopped,
}

impl StatusFilter {
    pub fn from_operation(operation: Option<ServiceOperation>) -> Result<Self> {
        match operation {
            None | Some(ServiceOperation::Status) => Ok(Self::All),
            Some(ServiceOperation::Start) => Ok(Self::Started),
            Some(ServiceOperation::Stop) => Ok(Self::Stopped),
            Some(ServiceOperation::Delete) => Err(AdminError::precondition(
                "delete cannot be used as a status filter when listing services",
            )),
        }
    }

    pub fn matches(&self, status: &ServiceStatus) -> bool {
        match self {
            Self::All => true,
            Self::Started => status.real_time_state() == Some("STARTED"),
            Self::Stopped => status.real_time_state() == Some("STOPPED"),
        }
    }
}

pub async fn run<C, W>(
    args: &ManageServiceArgs,
    connector: &C,
    narrator: &mut ActionNarrator,
    out: &mut W,
) -> std::result::Result<(), NarratedError>
where
    C: SiteConnector,
    W: Write,
{
    if args.list {
        list(args, connector, narrator, out).await
    } else {
        operate(args, connector, narrator, out).await
    }
}

async fn list<C, W>(
    args: &ManageServiceArgs,
    connector: &C,
    narrator: &mut ActionNarrator,
    out: &mut W,
) -> std::result::Result<(), NarratedError>
where
    C: SiteConnector,
    W: Write,
{
    let filter = narrator.check("checking arguments", || {
        ensure(args.name.is_none(), "name cannot be set if listing services")?;
        StatusFilter::from_operation(args.operation)
    })?;

    let urls = narrator.check("checking site arguments", || args.site.site_urls())?;
    let site = narrator
        .step(
            format!("connecting to admin site {}", urls.admin),
            connector.connect(&urls, &args.site.credentials()),
        )
        .await?;

    let catalog = narrator
        .step("listing services", site.list_services())
        .await?;

    narrator
        .step(
            "printing services",
            print_services(&site, &catalog, filter, out),
        )
        .await
}

async fn print_services<S: SiteAdmin, W: Write>(
    site: &S,
    catalog: &ServiceCatalog,
    filter: StatusFilter,
    out: &mut W,
) -> Result<()> {
    for service in catalog.all_services() {
        let status = site.service_status(service).await?;
        if filter.matches(&status) {
            writeln!(
                out,
                "{} {}",
                service.qualified_name(),
                status.real_time_state().unwrap_or("UNKNOWN")
            )?;
        }
    }
    Ok(())
}

async fn operate<C, W>(
    args: &ManageServiceArgs,
    connector: &C,
    narrator: &mut ActionNarrator,
    out: &mut W,
) -> std::result::Result<(), NarratedError>
where
    C: SiteConnector,
    W: Write,
{
    let (name, operation) = narrator.check("checking arguments", || {
        let name = args
            .name
            .as_deref()
            .ok_or_else(|| AdminError::precondition("Service name not specified"))?;
        let operation = args
            .operation
            .ok_or_else(|| AdminError::precondition("Operation not specified"))?;
        Ok::<_, AdminError>((name, operation))
    })?;

    let urls = narrator.check("checking site arguments", || args.site.site_urls())?;
    let site = narrator
        .step(
            format!("connecting to admin site {}", urls.admin),
            connector.connect(&urls, &args.site.credentials()),
        )
        .await?;

    let catalog = narrator
        .step("listing services", site.list_services())
        .await?;
    let service: ServiceRef = narrator
        .check(format!("searching for service {}", name), || {
            catalog.find(name).cloned()
        })?;

    match operation {
        ServiceOperation::Status => {
            narrator
                .step("checking service status", async {
                    let status = site.service_status(&service).await?;
                    for line in status.lines() {
                        writeln!(out, "{}", line)?;
                    }
                    Ok::<_, AdminError>(())
                })
                .await
        }
        ServiceOperation::Start => {
            narrator
                .step("starting service", site.start_service(&service))
                .await?;
            confirm(narrator, out, "Started", &service)
        }
        ServiceOperation::Stop => {
            narrator
                .step("stopping service", site.stop_service(&service))
                .await?;
            confirm(narrator, out, "Stopped", &service)
        }
        ServiceOperation::Delete => {
            narrator
                .step("deleting service", site.delete_service(&service))
                .await?;
            confirm(narrator, out, "Deleted", &service)
        }
    }
}

fn confirm<W: Write>(
    narrator: &mut ActionNarrator,
    out: &mut W,
    verb: &str,
    service: &ServiceRef,
) -> std::result::Result<(), NarratedError> {
    tracing::info!("✅ {} {}", verb, service.qualified_name());
    narrator.check("reporting result", || -> Result<()> {
        writeln!(out, "{} {}", verb, service.qualified_name())?;
        Ok(())
    })
}
