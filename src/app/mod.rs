use crate::adapters::HttpConnector;
use crate::config::site::ClientSettings;
use crate::config::AdminCommand;
use crate::core::{create_service, manage_service, manage_site, ActionNarrator};
use crate::utils::logger;
use std::process::ExitCode;

/// Runs one command against a live site and maps the outcome to a process exit code.
pub async fn run(command: AdminCommand) -> ExitCode {
    let site_args = command.site_args();
    if site_args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(site_args.verbose);
    }
    tracing::debug!("Site: {}, user: {}", site_args.site, site_args.username);

    let connector = HttpConnector::new(ClientSettings::from(site_args));
    let mut narrator = ActionNarrator::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let outcome = match &command {
        AdminCommand::CreateService(args) => {
            create_service::run(args, &connector, &mut narrator, &mut out).await
        }
        AdminCommand::ManageService(args) => {
            manage_service::run(args, &connector, &mut narrator, &mut out).await
        }
        AdminCommand::ManageSite(args) => {
            manage_site::run(args, &connector, &mut narrator, &mut out).await
        }
    };

    match outcome {
        Ok(()) => {
            tracing::debug!("Completed {} steps", narrator.history().len());
            ExitCode::SUCCESS
        }
        Err(e) => e.report(),
    }
}
