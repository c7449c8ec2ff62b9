use tokio::time;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, EnvFilter, Registry};

/// Initializes application tracing.
///
/// in development spans and events are printed to stdout, otherwise
/// they are exported to Jaeger, in both cases filtered by `RUST_LOG`
pub fn init(service_name: &str, is_development: bool) -> Result<(), SetGlobalDefaultError> {
    if is_development {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        println!("[TRACER] initialized for development as: {}", service_name);
        return Ok(());
    }

    opentelemetry::global::set_text_map_propagator(opentelemetry_jaeger::Propagator::new());

    let tracer = opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(service_name)
        .with_auto_split_batch(true)
        .install_batch(opentelemetry::runtime::Tokio)
        .expect("failed to initialize tracer");

    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    let subscriber = Registry::default()
        .with(telemetry)
        .with(EnvFilter::from_default_env());

    tracing::subscriber::set_global_default(subscriber)?;

    println!("[TRACER] initialized as service: {}", service_name);
    Ok(())
}

/// `opentelemetry::global::shutdown_tracer_provider()` blocks and might hang forever,
/// so it is only ever called through `run_blocking_with_timeout`
///
///  see: https://github.com/open-telemetry/opentelemetry-rust/issues/868
fn shutdown_trace_provider() {
    println!("[TRACER] shutting down");
    opentelemetry::global::shutdown_tracer_provider();
}

/// Runs blocking work on the blocking thread pool, waiting for it at most `timeout`.
///
/// returns `true` when the work finished in time
async fn run_blocking_with_timeout<F>(work: F, timeout: time::Duration) -> bool
where
    F: FnOnce() + Send + 'static,
{
    tokio::select! {
        _ = time::sleep(timeout) => false,
        res = tokio::task::spawn_blocking(work) => res.is_ok(),
    }
}

/// Shutdowns tracing with a 500 millisecond timeout to export all non exported spans.
pub async fn shutdown() {
    let timeout = time::Duration::from_millis(500);

    if run_blocking_with_timeout(shutdown_trace_provider, timeout).await {
        println!("[TRACER] gracefull shutdown ok");
    } else {
        eprintln!("[TRACER] gracefull shutdown failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    #[tokio::test]
    async fn blocking_work_runs_before_the_timeout() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let finished = run_blocking_with_timeout(
            move || flag.store(true, Ordering::SeqCst),
            time::Duration::from_millis(500),
        )
        .await;

        assert!(finished);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn hanging_work_gives_up_after_the_timeout() {
        let finished = run_blocking_with_timeout(
            || std::thread::sleep(std::time::Duration::from_millis(300)),
            time::Duration::from_millis(20),
        )
        .await;

        assert!(!finished);
    }

    #[tokio::test]
    async fn shutdown_without_a_provider_finishes() {
        shutdown().await;
    }
}
