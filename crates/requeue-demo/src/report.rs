use std::sync::Arc;

use requeue_core::{InboundEnvelope, Stage};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Final outcome of one lineage.
#[derive(Debug, Clone)]
pub struct Report {
    pub path: String,
    pub retries: u32,
    pub succeeded: bool,
}

/// Terminal stage: everything reaching it is an outcome the caller would render.
pub struct ReportStage {
    tx: mpsc::UnboundedSender<Report>,
}

impl ReportStage {
    pub fn new(tx: mpsc::UnboundedSender<Report>) -> Self {
        Self { tx }
    }
}

impl Stage for ReportStage {
    fn name(&self) -> &'static str {
        "report"
    }

    fn process(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope> {
        let request = &inbound.original_request;
        let report = Report {
            path: request.innermost().path.clone(),
            retries: request.retry_count(),
            succeeded: !inbound.outcome.is_error(),
        };

        match (inbound.next_data(), inbound.next_error()) {
            (Some(data), _) => {
                info!(path = %report.path, retries = report.retries, %data, "request succeeded")
            }
            (_, Some(error)) => {
                warn!(path = %report.path, retries = report.retries, %error, "request failed")
            }
            _ => {}
        }

        let _ = self.tx.send(report);
        inbound
    }
}
