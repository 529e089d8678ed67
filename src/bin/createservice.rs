use clap::Parser;
use gis_admin::{AdminCommand, CreateServiceArgs};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CreateServiceArgs::parse();
    gis_admin::app::run(AdminCommand::CreateService(args)).await
}
