use std::{borrow::Cow, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::AppError,
    pipeline::{Facet, Filterable, SortKey, SortValue, Sortable},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    #[default]
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown role '{s}'")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
    /// Teachers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Students only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
}

impl User {
    pub fn new(first_name: &str, last_name: &str, email: &str, role: Role) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            role,
            is_active: true,
            join_date: Utc::now(),
            department: None,
            student_number: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn status(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "inactive"
        }
    }

    /// Drops attributes that do not belong to the user's role.
    pub fn normalize_role_attributes(&mut self) {
        if self.role != Role::Teacher {
            self.department = None;
        }
        if self.role != Role::Student {
            self.student_number = None;
        }
    }
}

impl Filterable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.first_name, &self.last_name, &self.email]
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Role => Some(Cow::Borrowed(self.role.as_str())),
            Facet::Status => Some(Cow::Borrowed(self.status())),
            Facet::Category | Facet::Difficulty | Facet::Type => None,
        }
    }
}

impl Sortable for User {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Date => Some(SortValue::Date(self.join_date)),
            SortKey::Name => Some(SortValue::Text(self.full_name())),
            SortKey::Score => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("John", "Doe", "john@example.com", Role::Teacher);
        assert_eq!(user.full_name(), "John Doe");
        assert_eq!(user.status(), "active");
        assert_eq!(user.facet_value(Facet::Role).as_deref(), Some("teacher"));
    }

    #[test]
    fn role_attributes_follow_role() {
        let mut user = User::new("Jane", "Smith", "jane@example.com", Role::Student);
        user.department = Some("Maths".into());
        user.student_number = Some("S-001".into());

        user.normalize_role_attributes();

        assert!(user.department.is_none());
        assert_eq!(user.student_number.as_deref(), Some("S-001"));
    }

    #[test]
    fn role_defaults_to_student_when_missing() {
        let json = serde_json::json!({
            "id": "u1",
            "first_name": "A",
            "last_name": "B",
            "email": "a@b.c",
            "is_active": true,
            "join_date": "2024-01-01T00:00:00Z"
        });
        let user: User = serde_json::from_value(json).expect("user should deserialize");
        assert_eq!(user.role, Role::Student);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }
}
