#![deny(warnings)]

//! Local TCP fixtures for exercising the client end to end.

use {
    anyhow::{Context, Result},
    futures::FutureExt,
    std::net::SocketAddr,
    tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::{self, JoinHandle},
    },
    tracing::log,
};

/// Echoes every connection's bytes back to it until the client closes.
/// Returns the bound address and the accept loop's handle.
pub async fn echo(address: SocketAddr) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("unable to listen on {address}"))?;
    let address = listener.local_addr()?;

    let handle = task::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    task::spawn(echo_connection(stream).map(move |result| {
                        if let Err(e) = result {
                            log::warn!("error echoing to {peer}: {e:?}");
                        }
                    }));
                }
                Err(e) => {
                    log::warn!("accept failed: {e:?}");
                    break;
                }
            }
        }
    });

    Ok((address, handle))
}

async fn echo_connection(mut stream: TcpStream) -> Result<()> {
    let mut buffer = vec![0; 512];
    loop {
        let count = stream.read(&mut buffer).await?;
        if count == 0 {
            break Ok(());
        }

        stream.write_all(&buffer[..count]).await?;
    }
}

/// Accepts a single connection, sends `farewell`, and closes it without
/// reading anything.
pub async fn hangup(
    address: SocketAddr,
    farewell: &'static [u8],
) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("unable to listen on {address}"))?;
    let address = listener.local_addr()?;

    let handle = task::spawn(async move {
        match listener.accept().await {
            Ok((mut stream, peer)) => {
                if let Err(e) = stream.write_all(farewell).await {
                    log::warn!("error waving {peer} goodbye: {e:?}");
                }
            }
            Err(e) => log::warn!("accept failed: {e:?}"),
        }
    });

    Ok((address, handle))
}

/// Mints an address that actively refuses connections: the port was bound a
/// moment ago, so nothing else should be listening on it.
pub async fn refused(address: SocketAddr) -> Result<SocketAddr> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("unable to bind {address}"))?;
    let address = listener.local_addr()?;
    drop(listener);

    Ok(address)
}
