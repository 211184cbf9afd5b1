use std::sync::Arc;

use uuid::Uuid;

use frostline_domain::user::UserRole;
use frostline_fieldops::domain::types::{ApplicationStatus, ServiceKind};
use frostline_fieldops::error::FieldopsServiceError;
use frostline_fieldops::usecase::application::{
    ApplyInput, ApplyUseCase, ApproveApplicationUseCase, RejectApplicationUseCase,
};

use crate::helpers::{MockApplicationRepo, MockUserRepo, test_application, test_user};

fn apply_input() -> ApplyInput {
    ApplyInput {
        name: "Ravi".into(),
        phone: "+91-9000000001".into(),
        service_kinds: vec![ServiceKind::Installation],
        latitude: 12.97,
        longitude: 77.59,
    }
}

// ── ApplyUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pending_application() {
    let usecase = ApplyUseCase {
        repo: MockApplicationRepo::default(),
    };
    let application = usecase.execute(Uuid::now_v7(), apply_input()).await.unwrap();
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert!(application.decided_at.is_none());
}

#[tokio::test]
async fn should_allow_only_one_pending_application_per_user() {
    let user_id = Uuid::now_v7();
    let repo = MockApplicationRepo::default();
    let usecase = ApplyUseCase { repo };

    usecase.execute(user_id, apply_input()).await.unwrap();
    let result = usecase.execute(user_id, apply_input()).await;
    assert!(matches!(
        result,
        Err(FieldopsServiceError::ApplicationPendingExists)
    ));
}

#[tokio::test]
async fn should_reject_application_without_service_kinds() {
    let usecase = ApplyUseCase {
        repo: MockApplicationRepo::default(),
    };
    let result = usecase
        .execute(
            Uuid::now_v7(),
            ApplyInput {
                service_kinds: vec![],
                ..apply_input()
            },
        )
        .await;
    assert!(matches!(result, Err(FieldopsServiceError::InvalidKind)));
}

#[tokio::test]
async fn should_reject_application_with_bad_coordinates() {
    let usecase = ApplyUseCase {
        repo: MockApplicationRepo::default(),
    };
    let result = usecase
        .execute(
            Uuid::now_v7(),
            ApplyInput {
                latitude: 123.4,
                ..apply_input()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(FieldopsServiceError::InvalidCoordinates)
    ));
}

// ── ApproveApplicationUseCase ────────────────────────────────────────────────

#[tokio::test]
async fn should_provision_agent_and_promote_role_on_approval() {
    let user = test_user(UserRole::Customer);
    let users = MockUserRepo::with(vec![user.clone()]);
    let application = test_application(user.id);
    let repo = MockApplicationRepo {
        users: Arc::clone(&users.users),
        ..Default::default()
    };
    repo.applications.lock().unwrap().push(application.clone());

    let usecase = ApproveApplicationUseCase { repo: repo.clone() };
    let agent = usecase.execute(application.id).await.unwrap();

    assert_eq!(agent.user_id, user.id);
    assert!(agent.active);
    assert_eq!(agent.total_services, 0);

    // All three writes of the approval landed.
    let decided = repo.applications.lock().unwrap()[0].clone();
    assert_eq!(decided.status, ApplicationStatus::Approved);
    assert!(decided.decided_at.is_some());
    assert_eq!(repo.agents.lock().unwrap().len(), 1);
    assert_eq!(users.role_of(user.id), Some(UserRole::Agent));
}

#[tokio::test]
async fn should_not_approve_already_decided_application() {
    let mut application = test_application(Uuid::now_v7());
    application.status = ApplicationStatus::Rejected;
    let repo = MockApplicationRepo::default();
    repo.applications.lock().unwrap().push(application.clone());

    let usecase = ApproveApplicationUseCase { repo };
    let result = usecase.execute(application.id).await;
    assert!(matches!(
        result,
        Err(FieldopsServiceError::ApplicationAlreadyDecided)
    ));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_application() {
    let usecase = ApproveApplicationUseCase {
        repo: MockApplicationRepo::default(),
    };
    let result = usecase.execute(Uuid::now_v7()).await;
    assert!(matches!(
        result,
        Err(FieldopsServiceError::ApplicationNotFound)
    ));
}

// ── RejectApplicationUseCase ─────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_pending_application() {
    let application = test_application(Uuid::now_v7());
    let repo = MockApplicationRepo::default();
    repo.applications.lock().unwrap().push(application.clone());

    let usecase = RejectApplicationUseCase { repo: repo.clone() };
    usecase.execute(application.id).await.unwrap();

    let decided = repo.applications.lock().unwrap()[0].clone();
    assert_eq!(decided.status, ApplicationStatus::Rejected);
    assert!(repo.agents.lock().unwrap().is_empty(), "no agent provisioned");
}

#[tokio::test]
async fn should_not_reject_already_decided_application() {
    let mut application = test_application(Uuid::now_v7());
    application.status = ApplicationStatus::Approved;
    let repo = MockApplicationRepo::default();
    repo.applications.lock().unwrap().push(application.clone());

    let usecase = RejectApplicationUseCase { repo };
    let result = usecase.execute(application.id).await;
    assert!(matches!(
        result,
        Err(FieldopsServiceError::ApplicationAlreadyDecided)
    ));
}
