#![allow(dead_code)]

use chrono::{Duration, Utc};
use diagnostics_api::{
    database,
    modules::{
        auth::session::SessionId,
        diagnostic::{
            analyzer::DtcTable,
            repository::{self, NewSession},
        },
    },
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use shared::entity::{diagnostic_session, suspension_part_type, user_profile, user_session};
use std::{
    io,
    sync::{Arc, Mutex},
};
use tracing_subscriber::fmt::MakeWriter;

pub const DTC_JSON: &str = r#"{
    "P0171": {
        "description": "System too lean (bank 1)",
        "recommendation": "Check for vacuum leaks and the MAF sensor."
    }
}"#;

/// fmt subscriber output kept in memory, to assert on the emitted events
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// a migrated in memory database, dropped with the connection
pub async fn test_db() -> DatabaseConnection {
    let db = database::db::connect("sqlite::memory:").await;

    database::db::run_migrations(&db).await;

    db
}

pub fn dtc_table() -> DtcTable {
    DtcTable::from_json(DTC_JSON).expect("invalid test DTC table")
}

pub async fn create_profile(db: &DatabaseConnection, username: &str) -> user_profile::Model {
    user_profile::ActiveModel {
        created_at: Set(Utc::now()),
        username: Set(String::from(username)),
        full_name: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to create profile")
}

pub async fn create_user_session(
    db: &DatabaseConnection,
    profile: &user_profile::Model,
    token: u128,
    expires_in: Duration,
) -> user_session::Model {
    user_session::ActiveModel {
        session_token: Set(SessionId::from(token).into_database_value()),
        created_at: Set(Utc::now()),
        expires_at: Set(Utc::now() + expires_in),
        user_profile_id: Set(profile.id),
    }
    .insert(db)
    .await
    .expect("failed to create user session")
}

pub async fn create_diagnostic_session(
    db: &DatabaseConnection,
    vin: &str,
    owner: Option<&user_profile::Model>,
) -> diagnostic_session::Model {
    let new_session = NewSession {
        vin: String::from(vin),
        vehicle_model: String::from("Lada Vesta"),
        raw_file: format!("diagnost/diagnostic_reports/{}.json", vin),
        user_profile_id: owner.map(|profile| profile.id),
    };

    repository::create_session(db, new_session, &dtc_table())
        .await
        .expect("failed to create diagnostic session")
}

pub async fn part_type_id(db: &DatabaseConnection, name: &str) -> i32 {
    suspension_part_type::Entity::find()
        .all(db)
        .await
        .expect("failed to list part types")
        .into_iter()
        .find(|part_type| part_type.name == name)
        .map(|part_type| part_type.id)
        .unwrap_or_else(|| panic!("part type {} is not seeded", name))
}
