//! User profile models and wire-shape normalization.

use serde::{Deserialize, Serialize};

/// Access-control role, denormalized onto the session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
    Viewer,
}

impl Role {
    /// Parse a role string from a backend payload. Unknown strings fall back
    /// to the least-privileged default rather than failing the login.
    pub fn parse_or_default(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Role::Admin,
            "manager" => Role::Manager,
            "viewer" | "readonly" => Role::Viewer,
            _ => Role::Employee,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical user profile used throughout the session core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    /// Display name
    pub name: String,
    pub role: Role,
    pub department: Option<String>,
}

/// User payload as backends actually send it: several competing field
/// spellings, possibly nested metadata. Normalized exactly once by
/// [`normalize_profile`]; nothing downstream touches this shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<RawProfileMetadata>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Nested metadata block some backends wrap profile fields in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfileMetadata {
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Map a raw backend profile to the canonical [`UserProfile`].
///
/// Display-name precedence, first non-empty wins:
/// 1. `full_name` (alias `fullName`)
/// 2. `name`
/// 3. `first_name` + `last_name`
/// 4. `user_metadata.full_name`
/// 5. `user_metadata.name`
/// 6. local part of the email
/// 7. the literal `"User"`
pub fn normalize_profile(raw: &RawProfile) -> UserProfile {
    let email = raw
        .email
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let joined_names = match (non_empty(&raw.first_name), non_empty(&raw.last_name)) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(first), None) => Some(first.to_string()),
        (None, Some(last)) => Some(last.to_string()),
        (None, None) => None,
    };

    let meta = raw.user_metadata.as_ref();
    let name = non_empty(&raw.full_name)
        .map(str::to_string)
        .or_else(|| non_empty(&raw.name).map(str::to_string))
        .or(joined_names)
        .or_else(|| meta.and_then(|m| non_empty(&m.full_name).map(str::to_string)))
        .or_else(|| meta.and_then(|m| non_empty(&m.name).map(str::to_string)))
        .or_else(|| email.split('@').next().filter(|s| !s.is_empty()).map(str::to_string))
        .unwrap_or_else(|| "User".to_string());

    let id = non_empty(&raw.id)
        .map(str::to_string)
        .unwrap_or_else(|| email.clone());

    UserProfile {
        id,
        email,
        name,
        role: raw
            .role
            .as_deref()
            .map(Role::parse_or_default)
            .unwrap_or(Role::Employee),
        department: raw.department.clone(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawProfile {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn full_name_wins_over_everything() {
        let profile = normalize_profile(&raw(
            r#"{"id":"u1","email":"a@b.com","full_name":"Ada Lovelace","name":"ada",
                "first_name":"A","last_name":"L"}"#,
        ));
        assert_eq!(profile.name, "Ada Lovelace");
    }

    #[test]
    fn camel_case_alias_is_accepted() {
        let profile = normalize_profile(&raw(r#"{"email":"a@b.com","fullName":"Ada L"}"#));
        assert_eq!(profile.name, "Ada L");
    }

    #[test]
    fn first_last_joined_when_no_full_name() {
        let profile =
            normalize_profile(&raw(r#"{"email":"a@b.com","first_name":"Ada","last_name":"L"}"#));
        assert_eq!(profile.name, "Ada L");
    }

    #[test]
    fn nested_metadata_is_consulted_last_before_email() {
        let profile = normalize_profile(&raw(
            r#"{"email":"a@b.com","user_metadata":{"full_name":"Meta Name"}}"#,
        ));
        assert_eq!(profile.name, "Meta Name");
    }

    #[test]
    fn email_local_part_is_the_fallback() {
        let profile = normalize_profile(&raw(r#"{"email":"grace.hopper@navy.mil"}"#));
        assert_eq!(profile.name, "grace.hopper");
    }

    #[test]
    fn empty_profile_falls_back_to_user() {
        let profile = normalize_profile(&RawProfile::default());
        assert_eq!(profile.name, "User");
        assert_eq!(profile.role, Role::Employee);
    }

    #[test]
    fn id_falls_back_to_email() {
        let profile = normalize_profile(&raw(r#"{"email":"A@B.com"}"#));
        assert_eq!(profile.id, "a@b.com");
        assert_eq!(profile.email, "a@b.com");
    }

    #[test]
    fn unknown_role_defaults_to_employee() {
        let profile = normalize_profile(&raw(r#"{"email":"a@b.com","role":"wizard"}"#));
        assert_eq!(profile.role, Role::Employee);
        let profile = normalize_profile(&raw(r#"{"email":"a@b.com","role":"Administrator"}"#));
        assert_eq!(profile.role, Role::Admin);
    }
}
