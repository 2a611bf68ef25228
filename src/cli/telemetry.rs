//! Log output plus optional OTLP trace export.
//!
//! Logs always go to stdout. Spans are additionally exported over gRPC when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set; page handlers then show up as
//! `http.request` spans carrying the request id.

use anyhow::{anyhow, Result};
use base64ct::{Base64, Encoding};
use once_cell::sync::OnceCell;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{Compression, SpanExporter, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    propagation::{BaggagePropagator, TraceContextPropagator},
    trace::{SdkTracerProvider, Tracer},
    Resource,
};
use std::{collections::HashMap, env::var, time::Duration};
use tonic::{
    metadata::{Ascii, Binary, MetadataKey, MetadataMap, MetadataValue},
    transport::ClientTlsConfig,
};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use ulid::Ulid;

const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

/// Where and how spans are exported, read from the standard `OTEL_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExporterConfig {
    endpoint: String,
    headers: HashMap<String, String>,
    instance_id: String,
}

impl ExporterConfig {
    /// `None` when `OTEL_EXPORTER_OTLP_ENDPOINT` is unset or blank.
    fn from_env() -> Option<Self> {
        let endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return None;
        }

        Some(Self {
            endpoint: normalize_endpoint(endpoint),
            headers: var("OTEL_EXPORTER_OTLP_HEADERS")
                .map(|headers| parse_headers_env(&headers))
                .unwrap_or_default(),
            instance_id: var("OTEL_SERVICE_INSTANCE_ID").unwrap_or_else(|_| Ulid::new().to_string()),
        })
    }

    fn exporter(&self) -> Result<SpanExporter> {
        let mut builder = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&self.endpoint)
            .with_compression(Compression::Gzip)
            .with_timeout(EXPORT_TIMEOUT);

        if let Some(host) = tls_domain(&self.endpoint) {
            builder = builder.with_tls_config(
                ClientTlsConfig::new()
                    .domain_name(host.to_string())
                    .with_native_roots(),
            );
        }
        if !self.headers.is_empty() {
            builder = builder.with_metadata(headers_to_metadata(&self.headers)?);
        }

        Ok(builder.build()?)
    }

    fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes([
                KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                KeyValue::new("service.instance.id", self.instance_id.clone()),
            ])
            .build()
    }
}

/// Parse `OTEL_EXPORTER_OTLP_HEADERS` (`key=value,key=value`); pairs without `=` are dropped.
fn parse_headers_env(headers_str: &str) -> HashMap<String, String> {
    headers_str
        .split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// gRPC metadata for the exporter. Names ending in `-bin` carry base64 values.
fn headers_to_metadata(headers: &HashMap<String, String>) -> Result<MetadataMap> {
    let mut meta = MetadataMap::with_capacity(headers.len());

    for (name, value) in headers {
        let name = name.to_ascii_lowercase();
        if name.ends_with("-bin") {
            let bytes = Base64::decode_vec(value)
                .map_err(|e| anyhow!("OTLP header {name} is not base64: {e}"))?;
            let key = MetadataKey::<Binary>::from_bytes(name.as_bytes())
                .map_err(|e| anyhow!("invalid OTLP header name {name}: {e}"))?;
            meta.insert_bin(key, MetadataValue::from_bytes(&bytes));
        } else {
            let key = MetadataKey::<Ascii>::from_bytes(name.as_bytes())
                .map_err(|e| anyhow!("invalid OTLP header name {name}: {e}"))?;
            let value: MetadataValue<Ascii> = value
                .parse()
                .map_err(|e| anyhow!("invalid OTLP header value for {name}: {e}"))?;
            meta.insert(key, value);
        }
    }

    Ok(meta)
}

/// Bare `host:port` endpoints are assumed to be TLS.
fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint.trim_end_matches('/'))
    }
}

/// Host part of an `https://` endpoint, used as the TLS domain name.
fn tls_domain(endpoint: &str) -> Option<&str> {
    endpoint
        .strip_prefix("https://")
        .and_then(|rest| rest.split('/').next())
        .and_then(|authority| authority.split(':').next())
        .filter(|host| !host.is_empty())
}

fn init_tracer(config: &ExporterConfig) -> Result<Tracer> {
    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(config.exporter()?)
        .with_resource(config.resource())
        .build();

    let _ = TRACER_PROVIDER.set(provider.clone());

    global::set_tracer_provider(provider.clone());
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));

    debug!(endpoint = %config.endpoint, "exporting traces");

    Ok(provider.tracer(env!("CARGO_PKG_NAME")))
}

/// Initialize logging, and trace export when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// # Errors
/// Returns an error if the exporter or the global subscriber cannot be installed.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false);

    // RUST_LOG still wins over the verbosity default
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?);

    let otel_layer = match ExporterConfig::from_env() {
        Some(config) => Some(tracing_opentelemetry::layer().with_tracer(init_tracer(&config)?)),
        None => None,
    };

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Flush and stop the tracer provider; no-op when export was never enabled.
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("shutting down tracer provider");
        if let Err(err) = provider.shutdown() {
            debug!("tracer provider shutdown failed: {err}");
        }
    }
}
