//! Row models for managed site content.

use serde::{Deserialize, Serialize};

/// Position of a [`TeamMember`] inside the organization.
///
/// Founders, admins and coordinators make up the featured subset promoted
/// on the homepage.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "team_role")]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamRole {
    #[sqlx(rename = "FOUNDER")]
    Founder,
    #[sqlx(rename = "ADMIN")]
    Admin,
    #[sqlx(rename = "COORDINATOR")]
    Coordinator,
    #[default]
    #[sqlx(rename = "MEMBER")]
    Member,
}

impl TeamRole {
    /// Whether the member is promoted on the homepage.
    pub fn is_featured(self) -> bool {
        matches!(self, Self::Founder | Self::Admin | Self::Coordinator)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Research post or project entry. Both tables share this shape.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub image_url: Option<String>,
    pub category_id: Option<i64>,
    pub author_id: i64,
    /// Gates public visibility.
    pub published: bool,
    /// Gates homepage promotion.
    pub featured: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub team_role: TeamRole,
    pub display_order: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CoreValue {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub display_order: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: i64,
    pub platform: String,
    pub url: String,
    pub display_order: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub id: i64,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HomepageSettings {
    pub id: i64,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image_url: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AboutSection {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMilestone {
    pub id: i64,
    pub year: i32,
    pub title: String,
    pub description: String,
    pub display_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_featured_roles() {
        assert!(TeamRole::Founder.is_featured());
        assert!(TeamRole::Admin.is_featured());
        assert!(TeamRole::Coordinator.is_featured());
        assert!(!TeamRole::Member.is_featured());
    }
}
