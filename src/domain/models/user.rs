use crate::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const DEFAULT_PROFILE_PICTURE: &str = "https://www.w3schools.com/howto/img_avatar.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Organizer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Organizer => "organizer",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "organizer" => Ok(Role::Organizer),
            other => Err(AppError::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_picture: Option<String>,
}

impl User {
    pub fn new(params: NewUserParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            password_hash: params.password_hash,
            role: params.role,
            profile_picture: params.profile_picture
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string()),
            created_at: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(picture: Option<&str>) -> NewUserParams {
        NewUserParams {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "hash".into(),
            role: Role::User,
            profile_picture: picture.map(str::to_string),
        }
    }

    #[test]
    fn test_new_user_defaults_picture() {
        assert_eq!(User::new(params(None)).profile_picture, DEFAULT_PROFILE_PICTURE);
        assert_eq!(User::new(params(Some("  "))).profile_picture, DEFAULT_PROFILE_PICTURE);
        assert_eq!(User::new(params(Some("https://cdn/me.png"))).profile_picture, "https://cdn/me.png");
    }

    #[test]
    fn test_full_name_and_role_round_trip() {
        let user = User::new(params(None));
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(Role::try_from("organizer".to_string()).unwrap(), Role::Organizer);
        assert!(Role::try_from("superuser".to_string()).is_err());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(User::new(params(None))).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "user");
        assert_eq!(json["firstName"], "Ada");
    }
}
