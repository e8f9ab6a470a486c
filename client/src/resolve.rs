use {
    anyhow::{anyhow, Context, Result},
    std::net::SocketAddr,
    tokio::net,
};

/// Resolves `host` and returns the first address the resolver offers. Only
/// one address per host joins the connection race.
pub async fn first_addr(host: &str, port: u16) -> Result<SocketAddr> {
    net::lookup_host((host, port))
        .await
        .with_context(|| format!("unable to resolve {host:?}"))?
        .next()
        .ok_or_else(|| anyhow!("no addresses for {host:?}"))
}
