use super::Database;
use crate::models::content::{Faq, FaqPatch, SocialMedia, SocialMediaPatch, Tip, TipPatch};
use rusqlite::{params, Error, OptionalExtension};
use tracing::info;

impl Database {
    // Tips

    pub async fn list_tips(&self) -> Result<Vec<Tip>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, title, content, category FROM tips ORDER BY id")?;
        let tips = stmt.query_map([], |row| {
            Ok(Tip {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                category: row.get(3)?,
            })
        })?;
        tips.collect()
    }

    pub async fn insert_tip(
        &self,
        title: &str,
        content: Option<&str>,
        category: Option<&str>,
    ) -> Result<Tip, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tips (title, content, category) VALUES (?, ?, ?)",
            params![title, content, category],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] Tip created: {}", id);
        Ok(Tip {
            id,
            title: title.to_string(),
            content: content.map(str::to_string),
            category: category.map(str::to_string),
        })
    }

    pub async fn update_tip(&self, tip_id: i64, patch: &TipPatch) -> Result<Option<Tip>, Error> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tips SET
                title = COALESCE(?, title),
                content = COALESCE(?, content),
                category = COALESCE(?, category)
            WHERE id = ?",
            params![patch.title, patch.content, patch.category, tip_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        conn.query_row(
            "SELECT id, title, content, category FROM tips WHERE id = ?",
            [tip_id],
            |row| {
                Ok(Tip {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    category: row.get(3)?,
                })
            },
        )
        .optional()
    }

    pub async fn delete_tip(&self, tip_id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        Ok(conn.execute("DELETE FROM tips WHERE id = ?", [tip_id])? > 0)
    }

    // FAQs

    pub async fn list_faqs(&self) -> Result<Vec<Faq>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, question, answer FROM faqs ORDER BY id")?;
        let faqs = stmt.query_map([], |row| {
            Ok(Faq {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
            })
        })?;
        faqs.collect()
    }

    pub async fn insert_faq(&self, question: &str, answer: Option<&str>) -> Result<Faq, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO faqs (question, answer) VALUES (?, ?)",
            params![question, answer],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] FAQ created: {}", id);
        Ok(Faq {
            id,
            question: question.to_string(),
            answer: answer.map(str::to_string),
        })
    }

    pub async fn update_faq(&self, faq_id: i64, patch: &FaqPatch) -> Result<Option<Faq>, Error> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE faqs SET
                question = COALESCE(?, question),
                answer = COALESCE(?, answer)
            WHERE id = ?",
            params![patch.question, patch.answer, faq_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        conn.query_row(
            "SELECT id, question, answer FROM faqs WHERE id = ?",
            [faq_id],
            |row| {
                Ok(Faq {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                })
            },
        )
        .optional()
    }

    pub async fn delete_faq(&self, faq_id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        Ok(conn.execute("DELETE FROM faqs WHERE id = ?", [faq_id])? > 0)
    }

    // Social media links

    pub async fn list_social_media(&self) -> Result<Vec<SocialMedia>, Error> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare("SELECT id, platform, url FROM social_media ORDER BY id")?;
        let links = stmt.query_map([], |row| {
            Ok(SocialMedia {
                id: row.get(0)?,
                platform: row.get(1)?,
                url: row.get(2)?,
            })
        })?;
        links.collect()
    }

    pub async fn insert_social_media(&self, platform: &str, url: &str) -> Result<SocialMedia, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO social_media (platform, url) VALUES (?, ?)",
            params![platform, url],
        )?;
        let id = conn.last_insert_rowid();
        info!("[DB] Social media link created: {} - {}", id, platform);
        Ok(SocialMedia {
            id,
            platform: platform.to_string(),
            url: Some(url.to_string()),
        })
    }

    pub async fn update_social_media(
        &self,
        social_id: i64,
        patch: &SocialMediaPatch,
    ) -> Result<Option<SocialMedia>, Error> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE social_media SET
                platform = COALESCE(?, platform),
                url = COALESCE(?, url)
            WHERE id = ?",
            params![patch.platform, patch.url, social_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        conn.query_row(
            "SELECT id, platform, url FROM social_media WHERE id = ?",
            [social_id],
            |row| {
                Ok(SocialMedia {
                    id: row.get(0)?,
                    platform: row.get(1)?,
                    url: row.get(2)?,
                })
            },
        )
        .optional()
    }

    pub async fn delete_social_media(&self, social_id: i64) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        Ok(conn.execute("DELETE FROM social_media WHERE id = ?", [social_id])? > 0)
    }
}
