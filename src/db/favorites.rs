use super::Database;
use crate::models::product::Product;
use rusqlite::{params, Error};
use tracing::info;

impl Database {
    // Add a favorite. Returns false when the pair already existed.
    pub async fn add_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, product_id) VALUES (?, ?)",
            params![user_id, product_id],
        )?;
        if inserted > 0 {
            info!("[DB] User {} favorited product {}", user_id, product_id);
        }
        Ok(inserted > 0)
    }

    pub async fn remove_favorite(&self, user_id: i64, product_id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute(
            "DELETE FROM favorites WHERE user_id = ? AND product_id = ?",
            params![user_id, product_id],
        )?;
        Ok(deleted > 0)
    }

    // Products favorited by a user, in the order they were saved
    pub async fn favorite_products(&self, user_id: i64) -> Result<Vec<Product>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, p.description, p.price, p.type, p.image_url, p.video_url
            FROM favorites f
            JOIN products p ON p.id = f.product_id
            WHERE f.user_id = ?
            ORDER BY f.id",
        )?;
        let products = stmt.query_map([user_id], |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                price: row.get(3)?,
                kind: row.get(4)?,
                image_url: row.get(5)?,
                video_url: row.get(6)?,
            })
        })?;
        products.collect()
    }
}
