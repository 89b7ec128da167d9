use crate::error::ApiError;
use crate::models::jobs;
use crate::models::users::{Model as User, Role};

/// Require the user to hold `role`. Admins pass every role check.
pub fn require_role(user: &User, role: Role) -> Result<(), ApiError> {
    if user.role == role || user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ))
    }
}

/// Require the user to be an admin.
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    require_role(user, Role::Admin)
}

/// Require the user to own `job` (admins pass).
pub fn verify_job_owner(job: &jobs::Model, user: &User) -> Result<(), ApiError> {
    if job.owner_id == user.id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You are not the owner of this job".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::UserStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            avatar_url: None,
            role,
            status: UserStatus::Active,
            email_confirmed: true,
            points: 0.0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn exact_role_passes() {
        let user = user_with_role(Role::Employer);
        assert!(require_role(&user, Role::Employer).is_ok());
        assert!(require_role(&user, Role::Freelancer).is_err());
    }

    #[test]
    fn admin_passes_any_role_check() {
        let admin = user_with_role(Role::Admin);
        assert!(require_role(&admin, Role::Employer).is_ok());
        assert!(require_role(&admin, Role::Freelancer).is_ok());
        assert!(require_admin(&admin).is_ok());
    }

    #[test]
    fn non_admin_fails_admin_check() {
        let user = user_with_role(Role::Freelancer);
        assert!(require_admin(&user).is_err());
    }
}
