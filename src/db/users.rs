use super::Database;
use crate::models::user::{User, UserPatch};
use rusqlite::{params, Error, OptionalExtension, Row};
use tracing::info;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, name, is_admin, is_active, created_at";

fn user_from_row(row: &Row<'_>) -> Result<User, Error> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        name: row.get(4)?,
        is_admin: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl Database {
    // Insert a user, the email is expected to be lower-cased already
    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<User, Error> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (username, email, password_hash, name, is_admin)
            VALUES (?, ?, ?, ?, ?)",
            params![username, email, password_hash, name, is_admin],
        )?;
        let id = conn.last_insert_rowid();
        let user = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            [id],
            user_from_row,
        )?;
        info!("[DB] User inserted: {} - {}", user.id, user.username);
        Ok(user)
    }

    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            [user_id],
            user_from_row,
        )
        .optional()
    }

    // Look a user up by username or email, both case-insensitive
    pub async fn find_user_by_login(&self, identifier: &str) -> Result<Option<User>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!(
                "SELECT {USER_COLUMNS} FROM users
                WHERE lower_utf8(username) = lower_utf8(?1) OR lower_utf8(email) = lower_utf8(?1)
                ORDER BY id
                LIMIT 1"
            ),
            [identifier],
            user_from_row,
        )
        .optional()
    }

    // First user already holding this username or email, if any
    pub async fn find_user_conflict(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, Error> {
        let conn = self.conn.lock().await;
        conn.query_row(
            &format!(
                "SELECT {USER_COLUMNS} FROM users
                WHERE username = ? OR email = ?
                ORDER BY id
                LIMIT 1"
            ),
            params![username, email],
            user_from_row,
        )
        .optional()
    }

    // List users, optionally filtered by name, username or email
    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>, Error> {
        let conn = self.conn.lock().await;
        let pattern = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
            WHERE ?1 IS NULL
                OR lower_utf8(name) LIKE ?1
                OR lower_utf8(username) LIKE ?1
                OR lower_utf8(email) LIKE ?1
            ORDER BY id"
        ))?;
        let users = stmt.query_map([pattern], user_from_row)?;
        users.collect()
    }

    // Apply the present fields of the patch; returns None for unknown users
    pub async fn update_user(
        &self,
        user_id: i64,
        patch: &UserPatch,
    ) -> Result<Option<User>, Error> {
        let conn = self.conn.lock().await;
        let email = patch.email.as_ref().map(|e| e.to_lowercase());
        let changed = conn.execute(
            "UPDATE users SET
                name = COALESCE(?, name),
                username = COALESCE(?, username),
                email = COALESCE(?, email)
            WHERE id = ?",
            params![patch.name, patch.username, email, user_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        info!("[DB] User updated: {}", user_id);
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            [user_id],
            user_from_row,
        )
        .optional()
    }

    pub async fn set_password_hash(&self, user_id: i64, password_hash: &str) -> Result<bool, Error> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE users SET password_hash = ? WHERE id = ?",
            params![password_hash, user_id],
        )?;
        Ok(changed > 0)
    }

    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Result<Option<User>, Error> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE users SET is_active = ? WHERE id = ?",
            params![is_active, user_id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        info!(
            "[DB] User {} {}",
            user_id,
            if is_active { "activated" } else { "deactivated" }
        );
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            [user_id],
            user_from_row,
        )
        .optional()
    }

    // Delete a user together with their favorites and reviews
    pub async fn delete_user(&self, user_id: i64) -> Result<bool, Error> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM favorites WHERE user_id = ?", [user_id])?;
        tx.execute("DELETE FROM reviews WHERE user_id = ?", [user_id])?;
        let deleted = tx.execute("DELETE FROM users WHERE id = ?", [user_id])?;

        tx.commit()?;
        if deleted > 0 {
            info!("[DB] User deleted: {}", user_id);
        }
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::create_test_db;
    use crate::models::user::UserPatch;

    #[tokio::test]
    async fn test_user_lifecycle() {
        let db = create_test_db().await;

        let user = db
            .insert_user("maria", "maria@example.com", "hash", "Maria Souza", false)
            .await
            .unwrap();
        assert!(user.id > 0);
        assert!(user.is_active);
        assert!(!user.is_admin);
        assert!(user.created_at.is_some());

        let found = db.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(found.username, "maria");

        let patch = UserPatch {
            name: Some("Maria S.".into()),
            username: None,
            email: Some("MARIA.S@Example.com".into()),
        };
        let updated = db.update_user(user.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "Maria S.");
        assert_eq!(updated.username, "maria");
        assert_eq!(updated.email, "maria.s@example.com");

        assert!(db.delete_user(user.id).await.unwrap());
        assert!(db.find_user(user.id).await.unwrap().is_none());
        assert!(!db.delete_user(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_lookup_is_case_insensitive() {
        let db = create_test_db().await;
        db.insert_user("Joao", "joao@example.com", "hash", "João", false)
            .await
            .unwrap();

        assert!(db.find_user_by_login("joao").await.unwrap().is_some());
        assert!(db.find_user_by_login("JOAO@EXAMPLE.COM").await.unwrap().is_some());
        assert!(db.find_user_by_login("someone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conflict_detection() {
        let db = create_test_db().await;
        db.insert_user("ana", "ana@example.com", "hash", "Ana", false)
            .await
            .unwrap();

        let by_name = db.find_user_conflict("ana", "other@example.com").await.unwrap();
        assert_eq!(by_name.unwrap().username, "ana");
        let by_email = db.find_user_conflict("other", "ana@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().email, "ana@example.com");
        assert!(db.find_user_conflict("other", "other@example.com").await.unwrap().is_none());

        // The unique constraint still guards direct inserts
        assert!(db
            .insert_user("ana", "x@example.com", "hash", "Ana 2", false)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_list_users_search() {
        let db = create_test_db().await;
        db.insert_user("carlos", "carlos@pisos.com", "h", "Carlos Lima", false)
            .await
            .unwrap();
        db.insert_user("bia", "bia@example.com", "h", "Beatriz", true)
            .await
            .unwrap();

        assert_eq!(db.list_users(None).await.unwrap().len(), 2);
        assert_eq!(db.list_users(Some("")).await.unwrap().len(), 2);

        let by_email = db.list_users(Some("PISOS")).await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].username, "carlos");

        let by_name = db.list_users(Some("beat")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert!(by_name[0].is_admin);
    }

    #[tokio::test]
    async fn test_status_and_password_updates() {
        let db = create_test_db().await;
        let user = db
            .insert_user("rui", "rui@example.com", "old", "Rui", false)
            .await
            .unwrap();

        let inactive = db.set_user_active(user.id, false).await.unwrap().unwrap();
        assert!(!inactive.is_active);
        assert!(db.set_user_active(9999, false).await.unwrap().is_none());

        assert!(db.set_password_hash(user.id, "new").await.unwrap());
        let reloaded = db.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new");
    }

    #[tokio::test]
    async fn test_accented_names_and_logins_ignore_case() {
        let db = create_test_db().await;
        db.insert_user("JOSÉ", "jose@example.com", "hash", "JOSÉ ÁVILA", false)
            .await
            .unwrap();

        let found = db.list_users(Some("ávila")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(db.find_user_by_login("josé").await.unwrap().is_some());
    }
}
