//! Research posts HTTP API.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::AppState;
use crate::content::Post;
use crate::error::Result;
use crate::guard::CurrentUser;
use crate::router::Valid;
use crate::router::posts::{Body, PostStore, ensure_can_edit};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    featured: Option<bool>,
}

fn store(state: &AppState) -> PostStore {
    PostStore::research(state.db.postgres.clone())
}

/// Published research, newest first.
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Post>>> {
    let posts = store(&state)
        .list_public(query.featured.unwrap_or(false))
        .await?;

    Ok(Json(posts))
}

/// Any approved member may publish research under their own name.
pub async fn create_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = store(&state).insert(user.id, &body).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Dashboard view: unpublished entries included, ownership enforced.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Post>> {
    let post = store(&state).find(id).await?;
    ensure_can_edit(&user, &post)?;

    Ok(Json(post))
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Valid(body): Valid<Body>,
) -> Result<Json<Post>> {
    let store = store(&state);
    let post = store.find(id).await?;
    ensure_can_edit(&user, &post)?;

    Ok(Json(store.update(id, &body).await?))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    let store = store(&state);
    let post = store.find(id).await?;
    ensure_can_edit(&user, &post)?;

    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use crate::content::Post;
    use crate::user::Role;
    use crate::*;

    fn entry(slug: &str, published: bool) -> String {
        json!({
            "title": "Measuring things",
            "slug": slug,
            "summary": "A summary.",
            "content": "Full text.",
            "published": published,
        })
        .to_string()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_public_list_hides_unpublished(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let member_token = state
            .token
            .create(2, "member@arive-lab.org", Role::Member)
            .unwrap();
        let cookie = format!("auth-token={member_token}");

        for (slug, published) in
            [("published-entry", true), ("draft-entry", false)]
        {
            let response = make_request(
                app.clone(),
                Method::POST,
                "/api/research",
                Some(&cookie),
                None,
                entry(slug, published),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = make_request(
            app,
            Method::GET,
            "/api/research",
            None,
            None,
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let posts: Vec<Post> = serde_json::from_slice(&body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "published-entry");
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_only_author_or_admin_may_edit(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let author = state
            .token
            .create(2, "member@arive-lab.org", Role::Member)
            .unwrap();
        let response = make_request(
            app.clone(),
            Method::POST,
            "/api/research",
            Some(&format!("auth-token={author}")),
            None,
            entry("owned-entry", false),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let post: Post = serde_json::from_slice(&body).unwrap();

        // Another approved member is refused.
        let other = state
            .token
            .create(3, "carol@arive-lab.org", Role::Member)
            .unwrap();
        let response = make_request(
            app.clone(),
            Method::PUT,
            &format!("/api/dashboard/research/{}", post.id),
            Some(&format!("auth-token={other}")),
            None,
            entry("owned-entry", true),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // An admin is not.
        let admin = state
            .token
            .create(1, "root@arive-lab.org", Role::Admin)
            .unwrap();
        let response = make_request(
            app,
            Method::PUT,
            &format!("/api/dashboard/research/{}", post.id),
            Some(&format!("auth-token={admin}")),
            None,
            entry("owned-entry", true),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
