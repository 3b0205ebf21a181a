use ipconsensus_client::run_cli;
use ipconsensus_client::util::shutdown::cancel_on_ctrl_c;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cancel_on_ctrl_c();

    run_cli().await
}
