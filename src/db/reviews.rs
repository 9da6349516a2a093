use super::Database;
use crate::models::review::{RatingSummary, Review, ReviewEntry};
use chrono::NaiveDateTime;
use rusqlite::{params, Error, OptionalExtension, Row};
use tracing::info;

const REVIEW_COLUMNS: &str = "id, product_id, user_id, rating, comment, created_at";

fn review_from_row(row: &Row<'_>) -> Result<Review, Error> {
    Ok(Review {
        id: row.get(0)?,
        product_id: row.get(1)?,
        user_id: row.get(2)?,
        rating: row.get(3)?,
        comment: row.get(4)?,
        created_at: row.get(5)?,
    })
}

// "2024-03-05 14:07:09" -> "05/03/2024 14:07"
fn listing_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|ts| ts.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

impl Database {
    pub async fn insert_comment(
        &self,
        product_id: i64,
        user_id: i64,
        comment: &str,
    ) -> Result<Review, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO reviews (product_id, user_id, comment) VALUES (?, ?, ?)",
            params![product_id, user_id, comment],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] User {} commented on product {}", user_id, product_id);
        conn.query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?"),
            [id],
            review_from_row,
        )
    }

    // Comments of a product with their author's name, newest first
    pub async fn list_comments(&self, product_id: i64) -> Result<Vec<ReviewEntry>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT r.id, r.user_id, u.name, r.comment, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.product_id = ? AND r.comment IS NOT NULL AND r.comment != ''
            ORDER BY r.created_at DESC, r.id DESC",
        )?;
        let entries = stmt.query_map([product_id], |row| {
            let created_at: Option<String> = row.get(4)?;
            Ok(ReviewEntry {
                id: row.get(0)?,
                user_id: row.get(1)?,
                user_name: row.get(2)?,
                comment: row.get(3)?,
                created_at: created_at.as_deref().map(listing_timestamp),
            })
        })?;
        entries.collect()
    }

    // A review, only if it belongs to the given product
    pub async fn find_review(&self, product_id: i64, review_id: i64) -> Result<Option<Review>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ? AND product_id = ?"),
            params![review_id, product_id],
            review_from_row,
        )
        .optional()
    }

    pub async fn delete_review(&self, review_id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM reviews WHERE id = ?", [review_id])?;
        if deleted > 0 {
            info!("[DB] Review deleted: {}", review_id);
        }
        Ok(deleted > 0)
    }

    // Record a user's rating for a product, overwriting the one they already gave.
    // Returns true when a new row was created.
    pub async fn upsert_rating(&self, product_id: i64, user_id: i64, rating: u8) -> Result<bool, Error> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        // Prefer the row already holding a rating, then the oldest row of this user
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM reviews
                WHERE product_id = ? AND user_id = ?
                ORDER BY rating IS NULL, id
                LIMIT 1",
                params![product_id, user_id],
                |row| row.get(0),
            )
            .optional()?;

        let created = match existing {
            Some(review_id) => {
                tx.execute(
                    "UPDATE reviews SET rating = ?, created_at = CURRENT_TIMESTAMP WHERE id = ?",
                    params![rating, review_id],
                )?;
                info!("[DB] User {} updated rating of product {} to {}", user_id, product_id, rating);
                false
            }
            None => {
                tx.execute(
                    "INSERT INTO reviews (product_id, user_id, rating) VALUES (?, ?, ?)",
                    params![product_id, user_id, rating],
                )?;
                info!("[DB] User {} rated product {} with {}", user_id, product_id, rating);
                true
            }
        };

        tx.commit()?;
        Ok(created)
    }

    // Average rating with one decimal place, None when nobody rated
    pub async fn rating_summary(&self, product_id: i64) -> Result<RatingSummary, Error> {
        let conn = self.conn.lock().await;
        let (average, count): (Option<f64>, i64) = conn.query_row(
            "SELECT AVG(rating), COUNT(rating) FROM reviews WHERE product_id = ?",
            [product_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(RatingSummary {
            average: average.map(|avg| (avg * 10.0).round() / 10.0),
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::listing_timestamp;
    use crate::db::tests::create_test_db;
    use crate::db::Database;
    use crate::models::product::NewProduct;

    async fn seed(db: &Database) -> (i64, i64, i64) {
        let alice = db
            .insert_user("alice", "alice@example.com", "h", "Alice", false)
            .await
            .unwrap();
        let bob = db
            .insert_user("bob", "bob@example.com", "h", "Bob", false)
            .await
            .unwrap();
        let product = db
            .insert_product("Vinílico Cinza", &NewProduct::default())
            .await
            .unwrap();
        (alice.id, bob.id, product.id)
    }

    #[test]
    fn test_listing_timestamp_format() {
        assert_eq!(listing_timestamp("2024-03-05 14:07:09"), "05/03/2024 14:07");
        assert_eq!(listing_timestamp("garbage"), "garbage");
    }

    #[tokio::test]
    async fn test_rating_upsert_overwrites() {
        let db = create_test_db().await;
        let (alice, _, product) = seed(&db).await;

        assert!(db.upsert_rating(product, alice, 2).await.unwrap());
        assert!(!db.upsert_rating(product, alice, 5).await.unwrap());

        let summary = db.rating_summary(product).await.unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.average, Some(5.0));
    }

    #[tokio::test]
    async fn test_rating_attaches_to_existing_comment_row() {
        let db = create_test_db().await;
        let (alice, _, product) = seed(&db).await;

        let comment = db.insert_comment(product, alice, "Muito bom").await.unwrap();
        assert!(!db.upsert_rating(product, alice, 4).await.unwrap());

        let review = db.find_review(product, comment.id).await.unwrap().unwrap();
        assert_eq!(review.rating, Some(4));
        assert_eq!(review.comment.as_deref(), Some("Muito bom"));
    }

    #[tokio::test]
    async fn test_rating_summary_rounds_to_one_decimal() {
        let db = create_test_db().await;
        let (alice, bob, product) = seed(&db).await;
        let carol = db
            .insert_user("carol", "carol@example.com", "h", "Carol", false)
            .await
            .unwrap();

        let empty = db.rating_summary(product).await.unwrap();
        assert_eq!(empty.average, None);
        assert_eq!(empty.count, 0);

        db.upsert_rating(product, alice, 5).await.unwrap();
        db.upsert_rating(product, bob, 4).await.unwrap();
        db.upsert_rating(product, carol.id, 4).await.unwrap();
        // A comment without rating does not count
        db.insert_comment(product, bob, "Bonito").await.unwrap();

        let summary = db.rating_summary(product).await.unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Some(4.3));
    }

    #[tokio::test]
    async fn test_comment_listing_and_deletion() {
        let db = create_test_db().await;
        let (alice, bob, product) = seed(&db).await;

        let first = db.insert_comment(product, alice, "Primeiro").await.unwrap();
        let second = db.insert_comment(product, bob, "Segundo").await.unwrap();
        // Rating-only rows are not listed as comments
        let carol = db
            .insert_user("carol", "carol@example.com", "h", "Carol", false)
            .await
            .unwrap();
        db.upsert_rating(product, carol.id, 3).await.unwrap();

        let entries = db.list_comments(product).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, second.id);
        assert_eq!(entries[0].user_name, "Bob");
        assert_eq!(entries[1].id, first.id);

        // A review is only found through its own product
        assert!(db.find_review(product + 1, first.id).await.unwrap().is_none());

        assert!(db.delete_review(first.id).await.unwrap());
        assert_eq!(db.list_comments(product).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_deletion_cascades_to_reviews() {
        let db = create_test_db().await;
        let (alice, _, product) = seed(&db).await;
        db.insert_comment(product, alice, "Gostei").await.unwrap();
        db.upsert_rating(product, alice, 5).await.unwrap();

        db.delete_user(alice).await.unwrap();
        assert!(db.list_comments(product).await.unwrap().is_empty());
        assert_eq!(db.rating_summary(product).await.unwrap().count, 0);
    }
}
