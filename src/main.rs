use clap::Parser;
use gis_admin::GisAdminCli;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = GisAdminCli::parse();
    gis_admin::app::run(cli.command).await
}
