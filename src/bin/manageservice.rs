use clap::Parser;
use gis_admin::{AdminCommand, ManageServiceArgs};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ManageServiceArgs::parse();
    gis_admin::app::run(AdminCommand::ManageService(args)).await
}
