use super::Database;
use crate::models::product::{NewProduct, Product, ProductPage, ProductPatch};
use rusqlite::{params, Error, OptionalExtension, Row};
use tracing::info;

pub const MAX_PAGE_SIZE: u32 = 100;

const PRODUCT_COLUMNS: &str = "id, name, description, price, type, image_url, video_url";
const SEARCH_FILTER: &str = "?1 IS NULL OR lower_utf8(name) LIKE ?1 OR lower_utf8(COALESCE(type, '')) LIKE ?1";

fn product_from_row(row: &Row<'_>) -> Result<Product, Error> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        kind: row.get(4)?,
        image_url: row.get(5)?,
        video_url: row.get(6)?,
    })
}

impl Database {
    // List products ordered by id. Without both page and per_page every match is returned.
    pub async fn list_products(
        &self,
        search: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<ProductPage, Error> {
        let conn = self.conn.lock().await;
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM products WHERE {SEARCH_FILTER}"),
            [&pattern],
            |row| row.get(0),
        )?;
        let total = total as u32;

        let result = match (page, per_page) {
            (Some(page), Some(per_page)) => {
                let page = page.max(1);
                let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
                let offset = (page - 1) as i64 * per_page as i64;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                    WHERE {SEARCH_FILTER}
                    ORDER BY id
                    LIMIT ?2 OFFSET ?3"
                ))?;
                let products = stmt
                    .query_map(params![pattern, per_page, offset], product_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                ProductPage {
                    products,
                    page,
                    per_page,
                    total,
                    pages: (total + per_page - 1) / per_page,
                }
            }
            _ => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                    WHERE {SEARCH_FILTER}
                    ORDER BY id"
                ))?;
                let products = stmt
                    .query_map([&pattern], product_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                ProductPage {
                    products,
                    page: 1,
                    per_page: total.max(1),
                    total,
                    pages: 1,
                }
            }
        };

        info!(
            "[DB] list_products | search={:?} | page={} | per_page={} | total={}",
            search, result.page, result.per_page, result.total
        );
        Ok(result)
    }

    pub async fn find_product(&self, product_id: i64) -> Result<Option<Product>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"),
            [product_id],
            product_from_row,
        )
        .optional()
    }

    // Insert a product; callers validate the name beforehand
    pub async fn insert_product(&self, name: &str, product: &NewProduct) -> Result<Product, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO products (name, description, price, type, image_url, video_url)
            VALUES (?, ?, ?, ?, ?, ?)",
            params![
                name,
                product.description,
                product.price.unwrap_or(0.0),
                product.kind,
                product.image_url,
                product.video_url
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] Product created: {} - {}", id, name);
        conn.query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"),
            [id],
            product_from_row,
        )
    }

    pub async fn update_product(
        &self,
        product_id: i64,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, Error> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                type = COALESCE(?, type),
                image_url = COALESCE(?, image_url),
                video_url = COALESCE(?, video_url)
            WHERE id = ?",
            params![
                patch.name,
                patch.description,
                patch.price,
                patch.kind,
                patch.image_url,
                patch.video_url,
                product_id
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        info!("[DB] Product updated: {}", product_id);
        conn.query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"),
            [product_id],
            product_from_row,
        )
        .optional()
    }

    // Delete a product, favorites and reviews go with it
    pub async fn delete_product(&self, product_id: i64) -> Result<bool, Error> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM favorites WHERE product_id = ?", [product_id])?;
        tx.execute("DELETE FROM reviews WHERE product_id = ?", [product_id])?;
        let deleted = tx.execute("DELETE FROM products WHERE id = ?", [product_id])?;

        tx.commit()?;
        if deleted > 0 {
            info!("[DB] Product deleted: {}", product_id);
        }
        Ok(deleted > 0)
    }

    // Lowest priced product, ties broken by id
    pub async fn cheapest_product(&self) -> Result<Option<Product>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products
                WHERE price IS NOT NULL AND price > 0
                ORDER BY price ASC, id ASC
                LIMIT 1"
            ),
            [],
            product_from_row,
        )
        .optional()
    }

    // Products whose type contains the given fragment, case-insensitive
    pub async fn products_by_type(&self, kind: &str, limit: u32) -> Result<Vec<Product>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
            WHERE lower_utf8(type) LIKE ?
            ORDER BY id
            LIMIT ?"
        ))?;
        let pattern = format!("%{}%", kind.to_lowercase());
        let products = stmt.query_map(params![pattern, limit], product_from_row)?;
        products.collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::create_test_db;
    use crate::db::Database;
    use crate::models::product::{NewProduct, ProductPatch};

    async fn seed(db: &Database) {
        let rows = [
            ("Laminado Carvalho", 89.9, "laminado"),
            ("Vinílico Cinza", 120.0, "vinilico"),
            ("Laminado Nogueira", 75.5, "Laminado"),
            ("Porcelanato Branco", 150.0, "porcelanato"),
            ("Vinílico Madeira", 99.0, "vinilico"),
        ];
        for (name, price, kind) in rows {
            let product = NewProduct {
                price: Some(price),
                kind: Some(kind.into()),
                ..Default::default()
            };
            db.insert_product(name, &product).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_unpaginated_listing_returns_all() {
        let db = create_test_db().await;
        seed(&db).await;

        let page = db.list_products(None, None, None).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.products.len(), 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 1);
        assert_eq!(page.per_page, 5);
        let ids: Vec<i64> = page.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        // A lone page parameter is not enough to paginate
        let page = db.list_products(None, Some(2), None).await.unwrap();
        assert_eq!(page.products.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_catalog_reports_per_page_one() {
        let db = create_test_db().await;
        let page = db.list_products(None, None, None).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.per_page, 1);
        assert!(page.products.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_or_type() {
        let db = create_test_db().await;
        seed(&db).await;

        let page = db.list_products(Some("LAMINADO"), None, None).await.unwrap();
        assert_eq!(page.total, 2);

        let page = db.list_products(Some("madeira"), None, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.products[0].name, "Vinílico Madeira");

        let page = db.list_products(Some("   "), None, None).await.unwrap();
        assert_eq!(page.total, 5);
    }

    #[tokio::test]
    async fn test_pagination() {
        let db = create_test_db().await;
        seed(&db).await;

        let first = db.list_products(None, Some(1), Some(2)).await.unwrap();
        assert_eq!(first.products.len(), 2);
        assert_eq!(first.pages, 3);
        assert_eq!(first.total, 5);

        let last = db.list_products(None, Some(3), Some(2)).await.unwrap();
        assert_eq!(last.products.len(), 1);
        assert_eq!(last.products[0].id, 5);

        let beyond = db.list_products(None, Some(9), Some(2)).await.unwrap();
        assert!(beyond.products.is_empty());
        assert_eq!(beyond.total, 5);

        let clamped = db.list_products(None, Some(0), Some(1000)).await.unwrap();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, 100);
        assert_eq!(clamped.products.len(), 5);
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let db = create_test_db().await;
        seed(&db).await;

        let patch = ProductPatch {
            price: Some(60.0),
            description: Some("Resistente".into()),
            ..Default::default()
        };
        let updated = db.update_product(1, &patch).await.unwrap().unwrap();
        assert_eq!(updated.price, Some(60.0));
        assert_eq!(updated.name, "Laminado Carvalho");
        assert_eq!(updated.description.as_deref(), Some("Resistente"));
        assert!(db.update_product(42, &patch).await.unwrap().is_none());

        assert!(db.delete_product(1).await.unwrap());
        assert!(db.find_product(1).await.unwrap().is_none());
        assert!(!db.delete_product(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_catalog_facts() {
        let db = create_test_db().await;
        seed(&db).await;

        let cheapest = db.cheapest_product().await.unwrap().unwrap();
        assert_eq!(cheapest.name, "Laminado Nogueira");

        let vinyl = db.products_by_type("vinilico", 3).await.unwrap();
        assert_eq!(vinyl.len(), 2);
        let laminate = db.products_by_type("laminado", 1).await.unwrap();
        assert_eq!(laminate.len(), 1);
    }

    #[tokio::test]
    async fn test_search_folds_accented_capitals() {
        let db = create_test_db().await;
        let product = NewProduct {
            kind: Some("VINÍLICO".into()),
            ..Default::default()
        };
        db.insert_product("PISO VINÍLICO ÂMBAR", &product).await.unwrap();

        for term in ["vinílico", "âmbar", "VINÍLICO", "Âmbar"] {
            let page = db.list_products(Some(term), None, None).await.unwrap();
            assert_eq!(page.total, 1, "search for {term}");
        }

        let by_type = db.products_by_type("vinílico", 3).await.unwrap();
        assert_eq!(by_type.len(), 1);
    }
}
