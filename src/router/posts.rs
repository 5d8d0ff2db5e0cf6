//! Shared storage and authorization for research posts and projects.
//!
//! Both resources have the same shape and contract; the table name is the
//! only difference.

use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};
use validator::Validate;

use crate::content::Post;
use crate::error::{Result, ServerError};
use crate::user::{Role, User};

const POST_COLUMNS: &str = "id, title, slug, summary, content, image_url, \
     category_id, author_id, published, featured, created_at, updated_at";

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(min = 1, max = 200, message = "Title is required."))]
    pub title: String,
    #[validate(custom(
        function = "crate::router::validate_slug",
        message = "Slug must be lowercase alphanumeric with dashes."
    ))]
    pub slug: String,
    #[validate(length(min = 1, message = "Summary is required."))]
    pub summary: String,
    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
}

/// Admins may touch any entry, authors their own, everyone else is
/// refused.
pub fn ensure_can_edit(user: &User, post: &Post) -> Result<()> {
    if user.role == Role::Admin || post.author_id == user.id {
        Ok(())
    } else {
        Err(ServerError::Forbidden(
            "only the author or an admin may access this entry".into(),
        ))
    }
}

#[derive(Clone)]
pub struct PostStore {
    pool: Pool<Postgres>,
    table: &'static str,
    resource: &'static str,
}

impl PostStore {
    pub fn research(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            table: "research_posts",
            resource: "research post",
        }
    }

    pub fn projects(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            table: "projects",
            resource: "project",
        }
    }

    /// Published entries, newest first. `featured` narrows to the
    /// homepage subset.
    pub async fn list_public(&self, featured: bool) -> Result<Vec<Post>> {
        let filter = if featured { "AND featured = TRUE" } else { "" };
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"SELECT {POST_COLUMNS} FROM {table}
                WHERE published = TRUE {filter}
                ORDER BY created_at DESC"#,
            table = self.table,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// One entry, published or not. The dashboard checks ownership.
    pub async fn find(&self, id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>(&format!(
            r#"SELECT {POST_COLUMNS} FROM {table} WHERE id = $1"#,
            table = self.table,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServerError::NotFound {
            resource: self.resource,
        })
    }

    pub async fn insert(&self, author_id: i64, body: &Body) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"INSERT INTO {table}
                    (title, slug, summary, content, image_url, category_id,
                    author_id, published, featured)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING {POST_COLUMNS}"#,
            table = self.table,
        ))
        .bind(&body.title)
        .bind(&body.slug)
        .bind(&body.summary)
        .bind(&body.content)
        .bind(&body.image_url)
        .bind(body.category_id)
        .bind(author_id)
        .bind(body.published)
        .bind(body.featured)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_slug)?;

        Ok(post)
    }

    pub async fn update(&self, id: i64, body: &Body) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"UPDATE {table}
                SET title = $1, slug = $2, summary = $3, content = $4,
                    image_url = $5, category_id = $6, published = $7,
                    featured = $8, updated_at = NOW()
                WHERE id = $9
                RETURNING {POST_COLUMNS}"#,
            table = self.table,
        ))
        .bind(&body.title)
        .bind(&body.slug)
        .bind(&body.summary)
        .bind(&body.content)
        .bind(&body.image_url)
        .bind(body.category_id)
        .bind(body.published)
        .bind(body.featured)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_on_slug)?
        .ok_or(ServerError::NotFound {
            resource: self.resource,
        })?;

        Ok(post)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query(&format!(
            r#"DELETE FROM {table} WHERE id = $1"#,
            table = self.table,
        ))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServerError::NotFound {
                resource: self.resource,
            });
        }

        Ok(())
    }
}

fn conflict_on_slug(err: sqlx::Error) -> ServerError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            ServerError::Conflict("slug already used".into())
        },
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserStatus;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            email: format!("user{id}@arive-lab.org"),
            password: String::default(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: None,
            photo_url: None,
            role,
            status: UserStatus::Approved,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn post(author_id: i64) -> Post {
        Post {
            id: 1,
            title: "Entry".into(),
            slug: "entry".into(),
            summary: "s".into(),
            content: "c".into(),
            image_url: None,
            category_id: None,
            author_id,
            published: false,
            featured: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_ownership() {
        // The author may edit their own entry.
        assert!(ensure_can_edit(&user(7, Role::Member), &post(7)).is_ok());
        // Any admin may edit anything.
        assert!(ensure_can_edit(&user(1, Role::Admin), &post(7)).is_ok());
        // Another member is refused.
        assert!(matches!(
            ensure_can_edit(&user(8, Role::Member), &post(7)),
            Err(ServerError::Forbidden(_))
        ));
    }
}
