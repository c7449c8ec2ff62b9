use diagnostics_api::{
    config::app_config, database, modules::diagnostic::analyzer::DtcTable, server,
    services::s3::S3,
};
use sea_orm::DatabaseConnection;
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[tokio::main]
pub async fn main() {
    let cfg = app_config();

    shared::tracer::init(&cfg.tracer_service_name, cfg.is_development)
        .expect("failed to init tracer");

    let db = database::db::connect(&cfg.db_url).await;

    database::db::run_migrations(&db).await;

    let dtc = DtcTable::load(&cfg.dtc_data_path).unwrap_or_else(|e| {
        panic!(
            "[DTC] failed to load trouble codes from {}: {:#}",
            cfg.dtc_data_path.display(),
            e
        )
    });

    listen_to_shutdown_signals(!cfg.is_development, db.clone());

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), cfg.http_port);
    println!("[WEB] soon listening on {}", addr);

    let s3 = S3::new().await;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|_| panic!("[WEB] failed to get address {}", addr));

    axum::serve(listener, server::controller::new(db, s3, dtc))
        .await
        .unwrap_or_else(|_| panic!("[WEB] failed to serve app on address {}", addr));
}

/// Listen to shutdown signals `SIGINT` and `SIGTERM`, on a signal gracefully shutdowns down the application
#[allow(clippy::never_loop)]
fn listen_to_shutdown_signals(gracefully_shutdown: bool, db: DatabaseConnection) {
    let mut signals = Signals::new([SIGINT, SIGTERM]).expect("failed to setup signals hook");

    tokio::spawn(async move {
        for sig in signals.forever() {
            if gracefully_shutdown {
                println!("[APP] received signal: {}, shutting down", sig);

                println!("[APP] closing database connections");
                if let Err(e) = db.close().await {
                    println!("[DB] failed to close db connection: {e}")
                }

                shared::tracer::shutdown().await;
            }

            std::process::exit(sig)
        }
    });
}
