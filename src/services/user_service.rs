use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::AppResult,
    models::{domain::User, dto::request::UserRequest},
    pipeline::{self, ListQuery, Page},
    repositories::Repository,
    services::{load_all, require},
};

pub struct UserService {
    users: Arc<dyn Repository<User>>,
}

impl UserService {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        load_all(self.users.as_ref(), "users").await
    }

    pub async fn list_view(&self, query: &ListQuery) -> AppResult<Page<User>> {
        let users = self.list_users().await?;
        Ok(pipeline::run(&users, query))
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        require(self.users.as_ref(), id).await
    }

    pub async fn create_user(&self, request: UserRequest) -> AppResult<User> {
        request.validate()?;
        let mut user = User::new(
            request.first_name.trim(),
            request.last_name.trim(),
            request.email.trim(),
            request.role,
        );
        apply(&mut user, request);

        let created = self.users.create(user).await?;
        log::info!("Created {} {}", created.role.as_str(), created.id);
        Ok(created)
    }

    pub async fn update_user(&self, id: &str, request: UserRequest) -> AppResult<User> {
        request.validate()?;
        let mut user = self.get_user(id).await?;
        user.first_name = request.first_name.trim().to_string();
        user.last_name = request.last_name.trim().to_string();
        user.email = request.email.trim().to_string();
        user.role = request.role;
        apply(&mut user, request);

        let updated = self.users.update(user).await?;
        log::info!("Updated user {}", updated.id);
        Ok(updated)
    }

    /// Results the user submitted are kept.
    pub async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.get_user(id).await?;
        self.users.delete(id).await?;
        log::info!("Deleted user {}", id);
        Ok(())
    }
}

fn apply(user: &mut User, request: UserRequest) {
    if let Some(is_active) = request.is_active {
        user.is_active = is_active;
    }
    user.department = request.department;
    user.student_number = request.student_number;
    user.normalize_role_attributes();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::AppError,
        models::domain::Role,
        pipeline::{Facet, FilterConfig, SortKey, SortSpec},
        repositories::{InMemoryRepository, Latency},
    };

    fn request(first: &str, email: &str, role: Role) -> UserRequest {
        UserRequest {
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            role,
            is_active: None,
            department: Some("Physics".to_string()),
            student_number: Some("S-1".to_string()),
        }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryRepository::new(Latency::none())))
    }

    #[tokio::test]
    async fn role_attributes_follow_the_role() {
        let service = service();
        let teacher = service
            .create_user(request("Tess", "tess@example.com", Role::Teacher))
            .await
            .unwrap();
        assert_eq!(teacher.department.as_deref(), Some("Physics"));
        assert_eq!(teacher.student_number, None);

        let student = service
            .update_user(&teacher.id, request("Tess", "tess@example.com", Role::Student))
            .await
            .unwrap();
        assert_eq!(student.department, None);
        assert_eq!(student.student_number.as_deref(), Some("S-1"));
    }

    #[tokio::test]
    async fn emails_are_unique_ignoring_case() {
        let service = service();
        service
            .create_user(request("A", "same@example.com", Role::Student))
            .await
            .unwrap();
        let err = service
            .create_user(request("B", "SAME@example.com", Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_before_storing() {
        let service = service();
        let err = service
            .create_user(request("A", "not-an-email", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(ref f) if f.get("email").is_some()));
        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn role_and_status_facets_compose() {
        let service = service();
        for (name, role, active) in [
            ("Ann", Role::Student, true),
            ("Ben", Role::Student, false),
            ("Cat", Role::Teacher, true),
        ] {
            let mut req = request(name, &format!("{}@example.com", name.to_lowercase()), role);
            req.is_active = Some(active);
            service.create_user(req).await.unwrap();
        }

        let query = ListQuery::new(
            FilterConfig::new()
                .with_facet(Facet::Role, "student")
                .with_facet(Facet::Status, "active"),
            SortSpec::asc(SortKey::Name),
            1,
            10,
        );
        let page = service.list_view(&query).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ann"]);
    }
}
