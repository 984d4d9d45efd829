use std::{sync::Arc, time::Duration};

use anyhow::Context;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use requeue_core::{
    DispatchHandle, Dispatcher, InboundEnvelope, Pipeline, RetryConfig, RetryStage, TokioScheduler,
};
use requeue_model::{HttpMethod, HttpRequest, Request, RetryPolicy};
use requeue_observe::{LoggerConfig, init_logger};
use requeue_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

mod report;
mod transport;

use report::{Report, ReportStage};
use transport::{ChannelDispatcher, FlakyTransport, Script};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // 1) logger
    let cfg = LoggerConfig::from_env()?;
    init_logger(&cfg)?;
    info!(format = %cfg.format, level = cfg.level.as_str(), "logger initialized");

    // 2) retry config: `requeue-demo [config.json] [policy-kind]`
    let mut args = std::env::args().skip(1);
    let mut retry_cfg = match args.next().filter(|p| p != "-") {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading retry config {path}"))?;
            RetryConfig::from_json(&raw)?
        }
        None => RetryConfig::default(),
    };
    if let Some(kind) = args.next() {
        retry_cfg.default_policy = kind
            .parse::<RetryPolicy>()
            .with_context(|| format!("default policy override {kind:?}"))?;
    }
    info!(
        default_policy = retry_cfg.default_policy.kind(),
        methods = ?retry_cfg.retry_methods,
        "retry config loaded"
    );

    // 3) metrics + pipeline
    let metrics = PrometheusMetrics::new()?;
    let (report_tx, mut report_rx) = mpsc::unbounded_channel::<Report>();
    let retry = RetryStage::from_config(retry_cfg, Arc::new(TokioScheduler::current()?))?
        .with_metrics(Arc::new(metrics.clone()));
    let pipeline = Arc::new(
        Pipeline::new()
            .with_retry(retry)
            .with_stage(Arc::new(ReportStage::new(report_tx))),
    );
    info!(stages = ?pipeline.stage_names(), "pipeline ready");

    // 4) transport
    let transport = Arc::new(
        FlakyTransport::new(Duration::from_millis(50))
            .with_script("/sites", Script::FailTimes(2))
            .with_script("/projects", Script::AlwaysFail)
            .with_script("/dashboard", Script::FailTimes(1))
            .with_script("/health", Script::AlwaysFail)
            .with_script("/uploads", Script::AlwaysFail),
    );

    // 5) submission loop: every request, first or resubmitted, goes through here
    let (submit_tx, mut submit_rx) = mpsc::unbounded_channel::<Request>();
    let store: DispatchHandle = Arc::new(ChannelDispatcher::new(submit_tx));
    {
        let store = store.clone();
        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            while let Some(request) = submit_rx.recv().await {
                let transport = transport.clone();
                let pipeline = pipeline.clone();
                let store = store.clone();
                tokio::spawn(async move {
                    let inbound = match transport.execute(&request).await {
                        Ok(data) => InboundEnvelope::success(request, data, store),
                        Err(error) => InboundEnvelope::failure(request, error, store),
                    };
                    pipeline.run(inbound.shared());
                });
            }
        });
    }

    // 6) lineages
    let lineages: Vec<Request> = vec![
        HttpRequest::get("/sites").into(),
        HttpRequest::get("/projects")
            .with_policy(RetryPolicy::exponential_backoff(200, 3))
            .into(),
        Request::from(HttpRequest::get("/dashboard"))
            .wrap("loadDashboard", json!({ "widget": "sites" })),
        HttpRequest::get("/health")
            .with_policy(RetryPolicy::no_retry())
            .into(),
        HttpRequest::new(HttpMethod::Post, "/uploads")
            .with_body(json!({ "name": "site.zip" }))
            .into(),
    ];
    let expected = lineages.len();
    for request in lineages {
        store.dispatch(request);
    }

    // 7) wait for every lineage to settle
    let mut settled = 0;
    while settled < expected {
        match tokio::time::timeout(Duration::from_secs(30), report_rx.recv()).await {
            Ok(Some(report)) => {
                settled += 1;
                info!(
                    path = %report.path,
                    retries = report.retries,
                    succeeded = report.succeeded,
                    "lineage settled ({settled}/{expected})"
                );
            }
            Ok(None) => break,
            Err(_) => {
                warn!(settled, expected, "timed out waiting for lineages");
                break;
            }
        }
    }

    // 8) metrics snapshot
    let mut buf = Vec::new();
    TextEncoder::new().encode(&metrics.gather(), &mut buf)?;
    println!("{}", String::from_utf8_lossy(&buf));
    Ok(())
}
