use uuid::Uuid;

use frostline_domain::user::UserRole;
use frostline_fieldops::error::FieldopsServiceError;
use frostline_fieldops::usecase::role::{GrantRoleUseCase, RevokeAdminUseCase};
use frostline_fieldops::usecase::user::{
    RegisterUserInput, RegisterUserUseCase, UpdateUserInput, UpdateUserUseCase,
};

use crate::helpers::{MockUserRepo, test_user};

fn register_input() -> RegisterUserInput {
    RegisterUserInput {
        name: "Asha".into(),
        email: "asha@example.com".into(),
        phone: None,
    }
}

// ── RegisterUserUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_new_user_as_customer() {
    let repo = MockUserRepo::default();
    let usecase = RegisterUserUseCase { repo: repo.clone() };
    let user = usecase.execute(Uuid::now_v7(), register_input()).await.unwrap();
    assert_eq!(user.role, UserRole::Customer);
    assert_eq!(repo.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_registration() {
    let user_id = Uuid::now_v7();
    let usecase = RegisterUserUseCase {
        repo: MockUserRepo::default(),
    };
    usecase.execute(user_id, register_input()).await.unwrap();
    let result = usecase.execute(user_id, register_input()).await;
    assert!(matches!(result, Err(FieldopsServiceError::UserAlreadyExists)));
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let usecase = RegisterUserUseCase {
        repo: MockUserRepo::default(),
    };
    usecase.execute(Uuid::now_v7(), register_input()).await.unwrap();
    let result = usecase.execute(Uuid::now_v7(), register_input()).await;
    assert!(matches!(result, Err(FieldopsServiceError::UserAlreadyExists)));
}

// ── UpdateUserUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_missing_data_when_nothing_to_update() {
    let user = test_user(UserRole::Customer);
    let usecase = UpdateUserUseCase {
        repo: MockUserRepo::with(vec![user.clone()]),
    };
    let result = usecase
        .execute(
            user.id,
            UpdateUserInput {
                name: None,
                phone: None,
            },
        )
        .await;
    assert!(matches!(result, Err(FieldopsServiceError::MissingData)));
}

#[tokio::test]
async fn should_update_profile_fields() {
    let user = test_user(UserRole::Customer);
    let repo = MockUserRepo::with(vec![user.clone()]);
    let usecase = UpdateUserUseCase { repo: repo.clone() };
    usecase
        .execute(
            user.id,
            UpdateUserInput {
                name: Some("Asha R".into()),
                phone: Some("+91-9111111111".into()),
            },
        )
        .await
        .unwrap();
    let updated = repo.users.lock().unwrap()[0].clone();
    assert_eq!(updated.name, "Asha R");
    assert_eq!(updated.phone.as_deref(), Some("+91-9111111111"));
}

// ── GrantRole / RevokeAdmin ──────────────────────────────────────────────────

#[tokio::test]
async fn should_grant_and_revoke_admin_role() {
    let admin = test_user(UserRole::Admin);
    let target = test_user(UserRole::Customer);
    let repo = MockUserRepo::with(vec![admin.clone(), target.clone()]);

    GrantRoleUseCase { repo: repo.clone() }
        .execute(admin.id, target.id, UserRole::Admin)
        .await
        .unwrap();
    assert_eq!(repo.role_of(target.id), Some(UserRole::Admin));

    RevokeAdminUseCase { repo: repo.clone() }
        .execute(admin.id, target.id)
        .await
        .unwrap();
    assert_eq!(repo.role_of(target.id), Some(UserRole::Customer));
}

#[tokio::test]
async fn should_not_let_admin_change_own_role() {
    let admin = test_user(UserRole::Admin);
    let repo = MockUserRepo::with(vec![admin.clone()]);

    let grant = GrantRoleUseCase { repo: repo.clone() }
        .execute(admin.id, admin.id, UserRole::Customer)
        .await;
    assert!(matches!(grant, Err(FieldopsServiceError::CannotChangeOwnRole)));

    let revoke = RevokeAdminUseCase { repo: repo.clone() }
        .execute(admin.id, admin.id)
        .await;
    assert!(matches!(
        revoke,
        Err(FieldopsServiceError::CannotChangeOwnRole)
    ));
    assert_eq!(repo.role_of(admin.id), Some(UserRole::Admin));
}

#[tokio::test]
async fn should_return_not_found_when_granting_to_unknown_user() {
    let admin = test_user(UserRole::Admin);
    let usecase = GrantRoleUseCase {
        repo: MockUserRepo::with(vec![admin.clone()]),
    };
    let result = usecase
        .execute(admin.id, Uuid::now_v7(), UserRole::Agent)
        .await;
    assert!(matches!(result, Err(FieldopsServiceError::UserNotFound)));
}
