use super::Database;
use crate::models::{review::RatingBucket, user::UserGrowth};
use rusqlite::Error;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_users: i64,
    pub total_tips: i64,
    pub total_reviews: i64,
    pub total_favorites: i64,
}

impl Database {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM products),
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM tips),
                (SELECT COUNT(*) FROM reviews),
                (SELECT COUNT(*) FROM favorites)",
            [],
            |row| {
                Ok(DashboardStats {
                    total_products: row.get(0)?,
                    total_users: row.get(1)?,
                    total_tips: row.get(2)?,
                    total_reviews: row.get(3)?,
                    total_favorites: row.get(4)?,
                })
            },
        )
    }

    // Sign-ups per calendar month, oldest first
    pub async fn user_growth(&self) -> Result<Vec<UserGrowth>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT
                CAST(strftime('%Y', created_at) AS INTEGER) AS year,
                CAST(strftime('%m', created_at) AS INTEGER) AS month,
                COUNT(id) AS total
            FROM users
            WHERE created_at IS NOT NULL
            GROUP BY year, month
            ORDER BY year, month",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UserGrowth {
                year: row.get(0)?,
                month: row.get(1)?,
                total: row.get(2)?,
            })
        })?;
        rows.collect()
    }

    // How many products fall in each star bucket, using every product's
    // average rating rounded to the nearest integer. Always five buckets.
    pub async fn rating_distribution(&self) -> Result<Vec<RatingBucket>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT CAST(ROUND(avg_rating) AS INTEGER) AS bucket, COUNT(product_id)
            FROM (
                SELECT product_id, AVG(rating) AS avg_rating
                FROM reviews
                WHERE rating IS NOT NULL
                GROUP BY product_id
            )
            GROUP BY bucket",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<HashMap<i64, i64>, _>>()?;

        Ok((1..=5u8)
            .map(|rating| RatingBucket {
                rating,
                count: counts.get(&(rating as i64)).copied().unwrap_or(0),
            })
            .collect())
    }
}
