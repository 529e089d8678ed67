use clap::Parser;
use gis_admin::{AdminCommand, ManageSiteArgs};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ManageSiteArgs::parse();
    gis_admin::app::run(AdminCommand::ManageSite(args)).await
}
