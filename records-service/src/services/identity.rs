use crate::models::Role;
use crate::services::store::RoleStore;
use service_core::error::AppError;

/// The authenticated session as reported by the auth collaborator. Passed
/// explicitly into core operations so tests can inject fakes.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub id: String,
    pub role: Role,
}

/// Resolves the effective caller for a request. A missing role record means
/// `Patient`; clinician surfaces must check for `Clinician` explicitly.
pub async fn resolve_caller(
    session: Option<&Session>,
    roles: &dyn RoleStore,
) -> Result<CallerIdentity, AppError> {
    let session =
        session.ok_or_else(|| AppError::Unauthenticated(anyhow::anyhow!("no active session")))?;

    let role = roles.role_of(&session.user_id).await?.unwrap_or(Role::Patient);

    Ok(CallerIdentity {
        id: session.user_id.clone(),
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedRoles(Option<Role>);

    #[async_trait]
    impl RoleStore for FixedRoles {
        async fn role_of(&self, _user_id: &str) -> Result<Option<Role>, AppError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn missing_session_is_unauthenticated() {
        let err = resolve_caller(None, &FixedRoles(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn absent_role_record_defaults_to_patient() {
        let session = Session {
            user_id: "user-1".to_string(),
        };
        let caller = resolve_caller(Some(&session), &FixedRoles(None))
            .await
            .unwrap();
        assert_eq!(caller.role, Role::Patient);
        assert_eq!(caller.id, "user-1");
    }

    #[tokio::test]
    async fn assigned_clinician_role_is_reported() {
        let session = Session {
            user_id: "user-2".to_string(),
        };
        let caller = resolve_caller(Some(&session), &FixedRoles(Some(Role::Clinician)))
            .await
            .unwrap();
        assert_eq!(caller.role, Role::Clinician);
    }
}
