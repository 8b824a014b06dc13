//! Summer storage host
//!
//! The UI shell spawns this process and talks to it over stdio:
//! one JSON request per line in, one JSON event per line out.

use anyhow::Context;
use summer_core::{App, Bridge, Config, Event, Request, RequestKind};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

const CHANNEL_CAPACITY: usize = 32;

pub async fn run() -> anyhow::Result<()> {
    summer_core::init_logging();

    let config = Config::default();
    let app = App::open(config).context("failed to open storage")?;

    tracing::info!("Summer host started");

    serve_lines(app, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Serve requests read line by line from `reader` until EOF.
///
/// The bridge is shut down whether the loop ends at EOF or on an error.
pub async fn serve_lines<R, W>(app: App, reader: R, writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut bridge = Bridge::spawn(app, CHANNEL_CAPACITY);

    let result = pump(&mut bridge, reader, writer).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Request loop failed");
    }

    bridge.shutdown().await;
    tracing::info!("Summer host stopped");

    result
}

async fn pump<R, W>(bridge: &mut Bridge, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<Request>(line) {
            Ok(request) => bridge.call(request).await?,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable request");
                Event::failed(RequestKind::Unknown, e)
            }
        };

        let mut out = serde_json::to_string(&event)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
