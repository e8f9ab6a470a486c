use {
    crate::resolve,
    std::{io, net::SocketAddr, time::Duration},
    tokio::{net::TcpStream, sync::mpsc, task, time},
    tracing::log,
};

/// Upper bound on a single dial; a host that never answers becomes an
/// ordinary failed attempt instead of stalling the race forever.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

enum Outcome<S> {
    Connected(S, SocketAddr),
    Failed(SocketAddr, io::Error),
}

/// Dials every host concurrently and returns the first connection to
/// complete, along with its address. Returns `None` once every attempt has
/// failed to resolve or connect.
pub async fn connect_any(hosts: Vec<String>, port: u16) -> Option<(TcpStream, SocketAddr)> {
    let (outcomes, results) = mpsc::channel(hosts.len().max(1));

    for host in hosts {
        task::spawn(attempt(host, port, outcomes.clone()));
    }
    drop(outcomes);

    arbitrate(results).await
}

async fn attempt(host: String, port: u16, outcomes: mpsc::Sender<Outcome<TcpStream>>) {
    let addr = match resolve::first_addr(&host, port).await {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Failed to resolve {host}: {e:#}");
            return;
        }
    };

    log::debug!("dialing {addr} for {host}");

    let outcome = match time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Outcome::Connected(stream, addr),
        Ok(Err(e)) => Outcome::Failed(addr, e),
        Err(_) => Outcome::Failed(addr, io::ErrorKind::TimedOut.into()),
    };

    // A closed channel means the race already has a winner; whatever this
    // attempt produced is dropped here, exactly once.
    let _ = outcomes.send(outcome).await;
}

/// Winner-take-all over attempt completions, in delivery order. The first
/// success is returned and the receiver dropped, which silently disposes of
/// every attempt still in flight; failures seen before that are reported.
async fn arbitrate<S>(mut results: mpsc::Receiver<Outcome<S>>) -> Option<(S, SocketAddr)> {
    while let Some(outcome) = results.recv().await {
        match outcome {
            Outcome::Connected(stream, addr) => {
                eprintln!("Connected to {addr}");
                return Some((stream, addr));
            }
            Outcome::Failed(addr, e) => eprintln!("Failed to connect to {addr}: {e}"),
        }
    }

    None
}
