#![deny(warnings)]

//! Races TCP connections across candidate hosts and relays stdin/stdout to
//! whichever one connects first.

pub mod race;
pub mod relay;
pub mod resolve;

use {
    anyhow::{anyhow, bail, Context, Result},
    tracing::log,
};

/// The validated command-line surface: one port shared by every candidate
/// host.
pub struct Config {
    pub port: u16,
    pub hosts: Vec<String>,
}

impl Config {
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let program = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").into());

        let port = args
            .next()
            .ok_or_else(|| anyhow!("usage: {program} <port> <host> [host...]"))?;
        let port = port
            .parse::<u16>()
            .with_context(|| format!("invalid port {port:?}"))?;

        let hosts = args.collect::<Vec<_>>();
        if hosts.is_empty() {
            return Err(anyhow!("usage: {program} <port> <host> [host...]"));
        }

        Ok(Self { port, hosts })
    }
}

/// Runs one full session: race the hosts, then relay until the peer closes
/// the connection or the process is interrupted.
pub async fn run(config: Config) -> Result<()> {
    let Some((stream, addr)) = race::connect_any(config.hosts, config.port).await else {
        bail!("unable to reach any host");
    };

    if let Err(e) = stream.set_nodelay(true) {
        log::debug!("unable to set TCP_NODELAY on {addr}: {e}");
    }

    tokio::select! {
        received = relay::relay(stream) => {
            log::debug!("session with {addr} ended after {received} bytes received");
        }
        _ = shutdown_signal() => {
            log::debug!("interrupted, dropping session with {addr}");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        if let Ok(mut terminate) = signal(SignalKind::terminate()) {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
            return;
        }
    }

    if tokio::signal::ctrl_c().await.is_err() {
        // No handler could be installed; the session must not be torn down
        // for that.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_port_and_hosts() {
        let config = Config::from_args(args(&["racecat", "9000", "a.example", "b.example"]))
            .expect("two hosts and a port should parse");
        assert_eq!(config.port, 9000);
        assert_eq!(config.hosts, ["a.example", "b.example"]);
    }

    #[test]
    fn rejects_missing_hosts() {
        assert!(Config::from_args(args(&["racecat", "9000"])).is_err());
        assert!(Config::from_args(args(&["racecat"])).is_err());
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::from_args(args(&["racecat", "teapot", "a.example"])).is_err());
        assert!(Config::from_args(args(&["racecat", "65536", "a.example"])).is_err());
    }
}
