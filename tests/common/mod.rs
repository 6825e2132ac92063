//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::MigrationHarness;
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;

use kembangku_admin::{MIGRATIONS, SERVICE_ACCESS_ROLE};

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "admin".to_string(),
        email: "admin@kembangku.id".to_string(),
        hub_id: 1,
        name: "Admin".to_string(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

pub fn customer(name: &str, email: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: email.to_string(),
        email: email.to_string(),
        hub_id: 1,
        name: name.to_string(),
        roles: Vec::new(),
        exp: 0,
    }
}
