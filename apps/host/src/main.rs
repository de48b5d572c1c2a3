use anyhow::Context;
use canopy_host::Host;
use canopy_kernel::config::load_config;
use canopy_kernel::domain::config::HostConfig;
use canopy_logger::Logger;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);

    let cfg: HostConfig = load_config(path).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Host::builder().config(cfg).build()?.run()
}
