//! Session relay binary: forwards JSON messages among peers that joined
//! the same session id (§4.9). Listens on `0.0.0.0:8765` by default.

use clap::Parser;
use handpilot::config::RelayConfig;

#[derive(Parser, Debug)]
#[command(name = "handpilot-relay", about = "Session-keyed websocket clipboard relay")]
struct Args {
    /// Address to bind the websocket listener on.
    #[arg(long, default_value = "0.0.0.0:8765")]
    bind: std::net::SocketAddr,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = RelayConfig { bind_addr: args.bind };

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(handpilot::relay::serve(config.bind_addr))?;
    Ok(())
}
