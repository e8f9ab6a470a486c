use {
    tokio::{
        io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
        net::TcpStream,
        task,
    },
    tracing::log,
};

const BUFFER_SIZE: usize = 512;

/// Relays bytes between the process's stdin/stdout and the winning
/// connection until the peer closes it. Returns the number of bytes
/// received from the peer.
pub async fn relay(stream: TcpStream) -> u64 {
    let (sock_rx, sock_tx) = stream.into_split();
    shuttle(sock_rx, sock_tx, io::stdin(), io::stdout()).await
}

/// Pairs the two one-directional pumps. The session ends when the socket →
/// output direction ends; the end of input alone only stops the input pump.
async fn shuttle<SR, SW, I, O>(sock_rx: SR, mut sock_tx: SW, input: I, output: O) -> u64
where
    SR: AsyncRead + Unpin,
    SW: AsyncWrite + Unpin + Send + 'static,
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin,
{
    let upload = task::spawn(async move {
        let sent = pump(input, &mut sock_tx).await;
        log::debug!("input closed after {sent} bytes sent");
        // Keep the write half out of scope's reach: input EOF must not shut
        // the socket down.
        sock_tx
    });

    let received = pump(sock_rx, output).await;

    // The peer is done; stop reading input as well.
    upload.abort();

    received
}

/// Copies `src` to `dst` one fixed-size chunk at a time until either side
/// ends. The single buffer is reused only after the previous chunk's write
/// has completed, so at most one transfer is in flight per direction.
async fn pump<R, W>(mut src: R, mut dst: W) -> u64
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0; BUFFER_SIZE];
    let mut total = 0;

    loop {
        let count = match src.read(&mut buffer).await {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) => {
                log::debug!("read ended: {e}");
                break;
            }
        };

        if let Err(e) = dst.write_all(&buffer[..count]).await {
            log::debug!("write ended: {e}");
            break;
        }
        if let Err(e) = dst.flush().await {
            log::debug!("flush failed: {e}");
            break;
        }

        total += count as u64;
    }

    total
}
