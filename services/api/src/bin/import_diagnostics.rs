use diagnostics_api::{
    config::app_config,
    database,
    modules::diagnostic::{analyzer::DtcTable, importer},
    services::s3::S3,
};

/// Imports every report file dropped on the import directory as a diagnostic session
#[tokio::main]
pub async fn main() {
    let cfg = app_config();

    shared::tracer::init("import_diagnostics", true).expect("failed to init tracer");

    let dtc = DtcTable::load(&cfg.dtc_data_path).unwrap_or_else(|e| {
        panic!(
            "[DTC] failed to load trouble codes from {}: {:#}",
            cfg.dtc_data_path.display(),
            e
        )
    });

    let files = importer::report_files(&cfg.import_dir)
        .unwrap_or_else(|e| panic!("[IMPORT] {:#}", e));

    if files.is_empty() {
        println!("[IMPORT] nothing to import on {}", cfg.import_dir.display());
        return;
    }

    let db = database::db::connect(&cfg.db_url).await;
    let s3 = S3::new().await;

    let mut imported = 0;

    for path in &files {
        match importer::import_report(&db, &s3, &dtc, path).await {
            Ok(session) => {
                imported += 1;
                println!("[IMPORT] {} imported as session {}", path.display(), session.id);
            }
            Err(e) => {
                tracing::error!("[IMPORT] failed to import {}: {:#}", path.display(), e);
            }
        }
    }

    println!("[IMPORT] imported {} of {} files", imported, files.len());

    if let Err(e) = db.close().await {
        println!("[DB] failed to close db connection: {e}")
    }
}
