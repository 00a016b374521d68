//! Tracing and OpenTelemetry initialization: an `EnvFilter`-driven `fmt`
//! layer to stderr, plus an optional OTLP trace+metrics pipeline when an
//! endpoint is configured.

use opentelemetry::global as otel_global;
use opentelemetry::metrics::{Meter, MeterProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{metrics::SdkMeterProvider, runtime, trace as sdktrace, Resource};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

fn init_otel(cfg: &Config) -> Option<(SdkMeterProvider, sdktrace::Tracer, Meter)> {
    let endpoint = cfg.otel_endpoint()?;
    info!(endpoint, "initializing OpenTelemetry exporter");

    let trace_exporter = opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint);
    let trace_config = sdktrace::config().with_resource(Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", "kui-probe"),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]));
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(trace_exporter)
        .with_trace_config(trace_config)
        .install_batch(runtime::TokioCurrentThread)
        .map_err(|e| error!(error = %e, "failed to initialize OTLP trace pipeline"))
        .ok()?;

    let metrics_exporter = opentelemetry_otlp::new_exporter().tonic().with_endpoint(endpoint);
    let meter_provider = opentelemetry_otlp::new_pipeline()
        .metrics(runtime::TokioCurrentThread)
        .with_exporter(metrics_exporter)
        .build()
        .map_err(|e| error!(error = %e, "failed to initialize OTLP metrics pipeline"))
        .ok()?;

    otel_global::set_meter_provider(meter_provider.clone());
    let meter = otel_global::meter_provider().meter("kui-probe");
    info!("OpenTelemetry exporter initialized");
    Some((meter_provider, tracer, meter))
}

/// Initialize the global tracing subscriber (fmt layer + optional OTLP
/// layer). Returns the OTLP `Meter`, if OTLP was configured and came up
/// successfully, so `kui-probe` can record macro-expansion counters on it.
pub fn init_tracing(cfg: &Config) -> Option<Meter> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(cfg.verbose())
        .with_level(true);

    let filter = EnvFilter::try_new(cfg.log_filter()).unwrap_or_else(|e| {
        eprintln!("warning: invalid log filter {:?}: {e}", cfg.log_filter());
        EnvFilter::new("kui_engine=info")
    });

    let registry_base = tracing_subscriber::registry().with(fmt_layer).with(filter);

    let otel_meter = if let Some((_provider, tracer, meter)) = init_otel(cfg) {
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
        registry_base.with(otel_layer).init();
        Some(meter)
    } else {
        registry_base.init();
        None
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = option_env!("VERGEN_GIT_SHA_SHORT").unwrap_or("unknown"),
        build_ts = env!("VERGEN_BUILD_TIMESTAMP"),
        "kui-probe starting"
    );

    info!(
        terminal_timeout = %crate::util::format_duration(cfg.terminal_read_timeout()),
        user_timeout = %crate::util::format_duration(cfg.user_read_timeout()),
        lookahead_max = cfg.lookahead_max(),
        stats_json = cfg.stats_json(),
        verbose = cfg.verbose(),
        log_filter = cfg.log_filter(),
        otel_endpoint = cfg.otel_endpoint().unwrap_or("<none>"),
        "configuration loaded"
    );

    otel_meter
}
