//! NodeKit CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: the optional JSON file named by `NODEKIT_CONFIG`
//!    plus the command line (`nodekit <url> [--method <METHOD>] [--blocking]`).
//! 2. **Wire observability**: a `tracing-subscriber` JSON or pretty layer, and
//!    an OpenTelemetry OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//! 3. **Construct the chain**: `RequestSenderNode` over a `ReqwestTransport`,
//!    then `ResponseProcessorNode`, `HttpErrorProcessorNode` and a JSON
//!    `ResponseDataParserNode`.
//! 4. **Select dispatch mode**: `make` awaited on the Tokio runtime (default),
//!    or `process` on a dedicated thread with `--blocking`.
//!
//! The parsed JSON goes to stdout; the diagnostic log goes to stderr.

mod config;
mod observability;

use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use nodes::{
    HttpErrorProcessorNode, RequestSenderNode, ResponseDataParserNode, ResponseProcessorNode,
};
use pipeline::{Context, Node, Outcome, TransportRequest};
use tracing::info;
use transport::ReqwestTransport;

use crate::config::{Args, CliConfig, DispatchMode};

type Chain = RequestSenderNode<serde_json::Value>;

fn build_chain(config: &CliConfig) -> anyhow::Result<Chain> {
    let transport = ReqwestTransport::new(config.transport.clone())
        .context("failed to construct the http transport")?;
    Ok(RequestSenderNode::new(
        Arc::new(transport),
        ResponseProcessorNode::new(HttpErrorProcessorNode::new(ResponseDataParserNode::<
            serde_json::Value,
        >::new())),
    ))
}

fn build_request(args: &Args, config: &CliConfig) -> TransportRequest {
    config
        .headers
        .iter()
        .fold(TransportRequest::new(args.method, &args.url), |request, (name, value)| {
            request.with_header(name, value)
        })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never cancel.
        std::future::pending::<()>().await;
    }
}

fn report(ctx: Context<serde_json::Value>) -> anyhow::Result<()> {
    ctx.on_log(|log| eprintln!("{log}"));
    match ctx.into_parts().0 {
        Outcome::Value(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Outcome::Error(e) => Err(anyhow!(e).context("request chain failed")),
        Outcome::Cancelled => Err(anyhow!("request chain cancelled")),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    let config = CliConfig::load()?;
    let mode = if args.blocking {
        DispatchMode::Blocking
    } else {
        config.mode
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start the tokio runtime")?;
    let _telemetry = runtime.block_on(async {
        observability::init(config.log_format, config.otlp_endpoint.as_deref())
    })?;

    let chain = build_chain(&config)?;
    let request = build_request(&args, &config);
    info!(method = %args.method, url = %args.url, ?mode, "dispatching request");

    let ctx = match mode {
        DispatchMode::Async => {
            runtime.block_on(chain.make(request).with_cancellation(shutdown_signal()))
        }
        // reqwest's blocking client must not run on a runtime thread.
        DispatchMode::Blocking => std::thread::spawn(move || chain.process(request))
            .join()
            .map_err(|_| anyhow!("blocking dispatch thread panicked"))?,
    };

    report(ctx)
}
