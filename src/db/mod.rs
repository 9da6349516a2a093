use rusqlite::{functions::FunctionFlags, Connection, Error};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

mod content;
mod favorites;
mod products;
mod reviews;
mod stats;
mod users;

pub use products::MAX_PAGE_SIZE;
pub use stats::DashboardStats;

// True when a write was rejected by a UNIQUE/CHECK/FK constraint
pub fn is_constraint_violation(err: &Error) -> bool {
    matches!(err, Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation)
}

// Define a struct to represent a database connection
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    // Create a new database connection
    pub fn new(db_path: &str) -> Result<Self, Error> {
        let conn = Connection::open(db_path)?;
        // Cascading deletes rely on this being on for every connection
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        // SQLite's lower() only folds ASCII, searches over Portuguese text go through this one
        conn.create_scalar_function(
            "lower_utf8",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        info!("[DB] Database connection established at: {}", db_path);
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // Create the database schema
    pub async fn create_schema(&self) -> Result<(), Error> {
        let conn = self.conn.lock().await;

        // 1. Users table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name TEXT NOT NULL,
                is_admin INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );",
        )
        .map_err(|e| {
            error!("[DB] Failed creating users table: {}", e);
            e
        })?;

        // 2. Products table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                price REAL,
                type TEXT,
                image_url TEXT,
                video_url TEXT
            );",
        )
        .map_err(|e| {
            error!("[DB] Failed creating products table: {}", e);
            e
        })?;

        // 3. Reviews: comment and rating share one row per submission
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                product_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                rating INTEGER CHECK (rating IS NULL OR rating BETWEEN 1 AND 5),
                comment TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_reviews_product ON reviews(product_id);",
        )
        .map_err(|e| {
            error!("[DB] Failed creating reviews table: {}", e);
            e
        })?;

        // 4. Favorites junction table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                CONSTRAINT unique_user_product UNIQUE (user_id, product_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
            );",
        )
        .map_err(|e| {
            error!("[DB] Failed creating favorites table: {}", e);
            e
        })?;

        // 5. Content tables
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tips (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT,
                category TEXT
            );
            CREATE TABLE IF NOT EXISTS faqs (
                id INTEGER PRIMARY KEY,
                question TEXT NOT NULL,
                answer TEXT
            );
            CREATE TABLE IF NOT EXISTS social_media (
                id INTEGER PRIMARY KEY,
                platform TEXT NOT NULL,
                url TEXT
            );",
        )
        .map_err(|e| {
            error!("[DB] Failed creating content tables: {}", e);
            e
        })?;
        Ok(())
    }
}
