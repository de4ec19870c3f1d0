//! `lander serve`: static site plus checkout proxy

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use lander_web::WebServerConfig;

use crate::output::print_info;

#[derive(Args)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, env = "LANDER_WEB_ADDR", default_value = "127.0.0.1:8888")]
    pub addr: SocketAddr,

    /// Directory holding the built site
    #[arg(long, env = "LANDER_SITE_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Pool server base URL
    #[arg(long, env = "LANDER_POOL_SERVER", default_value = "http://127.0.0.1:10000")]
    pub pool_server: String,
}

pub async fn execute(args: ServeArgs) -> anyhow::Result<i32> {
    print_info(&format!(
        "Serving {} at http://{} (Ctrl+C to stop)",
        args.root.display(),
        args.addr
    ));
    lander_web::serve(WebServerConfig {
        addr: args.addr,
        pool_server: args.pool_server,
        site_root: args.root,
    })
    .await?;
    Ok(0)
}
