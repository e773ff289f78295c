use crate::labelprinter::config::PrinterConfig;
use label_core::{ConnectionSettings, PrintClient, PrintError, PrintPayload, PrintResponse};
use reqwest::{header, Client, StatusCode};
use tracing::{error, info};

/// Posts print jobs with reqwest. A fresh `Client` is built per call so the
/// connection pool never outlives a single submission.
#[derive(Clone, Debug, Default)]
pub struct HttpPrintClient {
    cfg: PrinterConfig,
}

impl HttpPrintClient {
    pub fn new(cfg: PrinterConfig) -> Self {
        Self { cfg }
    }

    fn build_http(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().use_rustls_tls();
        if let Some(t) = self.cfg.timeout {
            builder = builder.timeout(t);
        }
        if let Some(p) = &self.cfg.proxy {
            builder = builder.proxy(reqwest::Proxy::all(p)?);
        }
        builder.build()
    }
}

#[allow(async_fn_in_trait)]
impl PrintClient for HttpPrintClient {
    async fn send_print(
        &self,
        settings: &ConnectionSettings,
        payload: &PrintPayload,
    ) -> Result<PrintResponse, PrintError> {
        let http = self.build_http().map_err(map_reqwest_err)?;
        info!(target:"providers::labelprinter","post print job url={} items={}", settings.endpoint, payload.items.len());
        let resp = http
            .post(settings.endpoint.as_str())
            .header(header::AUTHORIZATION, settings.auth_token.as_str())
            .json(payload)
            .send()
            .await
            .map_err(map_reqwest_err)?;
        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.ok();
            error!(target:"providers::labelprinter","print non-200 status={} body={:?}", status, body);
        }
        Ok(PrintResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
        })
    }
}

fn map_reqwest_err(e: reqwest::Error) -> PrintError {
    let detail = error_chain(&e);
    if e.is_timeout() {
        PrintError::Timeout(detail)
    } else if e.is_request() || e.is_connect() {
        PrintError::Network(detail)
    } else {
        PrintError::Other(detail)
    }
}

// reqwest's Display stops at the outer message; the cause (refused, DNS, TLS)
// lives further down the source chain.
fn error_chain(e: &reqwest::Error) -> String {
    let mut detail = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.ends_with(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}
