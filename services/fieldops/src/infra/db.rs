use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use frostline_domain::money::{EarningsSplit, Money};
use frostline_domain::pagination::PageRequest;
use frostline_domain::user::UserRole;
use frostline_fieldops_schema::{agent_applications, agents, service_requests, users};

use crate::domain::repository::{
    AgentApplicationRepository, AgentRepository, ServiceRequestRepository, UserRepository,
};
use crate::domain::types::{
    Agent, AgentApplication, ApplicationStatus, PaymentMethod, RequestStatus, ServiceKind,
    ServiceRequest, User,
};
use crate::error::FieldopsServiceError;

fn kinds_to_json(kinds: &[ServiceKind]) -> serde_json::Value {
    serde_json::json!(kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>())
}

fn kinds_from_json(value: serde_json::Value) -> Vec<ServiceKind> {
    serde_json::from_value::<Vec<String>>(value)
        .unwrap_or_default()
        .iter()
        .filter_map(|s| ServiceKind::parse(s))
        .collect()
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FieldopsServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FieldopsServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), FieldopsServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            role: Set(user.role.as_u8() as i16),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<(), FieldopsServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(new_name) = name {
            am.name = Set(new_name.to_owned());
        }
        if let Some(new_phone) = phone {
            am.phone = Set(Some(new_phone.to_owned()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update user profile")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, FieldopsServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, FieldopsServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_u8() as i16))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set user role")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, FieldopsServiceError> {
    let role = UserRole::from_u8(model.role as u8)
        .ok_or_else(|| anyhow::anyhow!("unknown user role {}", model.role))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Agent repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAgentRepository {
    pub db: DatabaseConnection,
}

impl AgentRepository for DbAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, FieldopsServiceError> {
        let model = agents::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find agent by id")?;
        Ok(model.map(agent_from_model))
    }

    async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Agent>, FieldopsServiceError> {
        let model = agents::Entity::find()
            .filter(agents::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find agent by user id")?;
        Ok(model.map(agent_from_model))
    }

    async fn list(
        &self,
        active_only: bool,
        page: PageRequest,
    ) -> Result<Vec<Agent>, FieldopsServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = agents::Entity::find();
        if active_only {
            query = query.filter(agents::Column::Active.eq(true));
        }
        let models = query
            .order_by_asc(agents::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list agents")?;
        Ok(models.into_iter().map(agent_from_model).collect())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool, FieldopsServiceError> {
        let result = agents::Entity::update_many()
            .col_expr(agents::Column::Active, Expr::value(active))
            .col_expr(agents::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(agents::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set agent active")?;
        Ok(result.rows_affected > 0)
    }
}

fn agent_from_model(model: agents::Model) -> Agent {
    Agent {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        phone: model.phone,
        service_kinds: kinds_from_json(model.service_kinds),
        latitude: model.latitude,
        longitude: model.longitude,
        active: model.active,
        total_services: model.total_services,
        total_earnings: Money::from_cents(model.total_earnings_cents),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Agent application repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAgentApplicationRepository {
    pub db: DatabaseConnection,
}

impl AgentApplicationRepository for DbAgentApplicationRepository {
    async fn create(&self, application: &AgentApplication) -> Result<(), FieldopsServiceError> {
        agent_applications::ActiveModel {
            id: Set(application.id),
            user_id: Set(application.user_id),
            name: Set(application.name.clone()),
            phone: Set(application.phone.clone()),
            service_kinds: Set(kinds_to_json(&application.service_kinds)),
            latitude: Set(application.latitude),
            longitude: Set(application.longitude),
            status: Set(application.status.as_str().to_owned()),
            decided_at: Set(None),
            created_at: Set(application.created_at),
        }
        .insert(&self.db)
        .await
        .context("create agent application")?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<AgentApplication>, FieldopsServiceError> {
        let model = agent_applications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find agent application by id")?;
        model.map(application_from_model).transpose()
    }

    async fn list(
        &self,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Vec<AgentApplication>, FieldopsServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = agent_applications::Entity::find();
        if let Some(status) = status {
            query = query.filter(agent_applications::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_asc(agent_applications::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list agent applications")?;
        models.into_iter().map(application_from_model).collect()
    }

    async fn has_pending(&self, user_id: Uuid) -> Result<bool, FieldopsServiceError> {
        use sea_orm::PaginatorTrait;
        let count = agent_applications::Entity::find()
            .filter(agent_applications::Column::UserId.eq(user_id))
            .filter(agent_applications::Column::Status.eq(ApplicationStatus::Pending.as_str()))
            .count(&self.db)
            .await
            .context("count pending applications")?;
        Ok(count > 0)
    }

    async fn approve(&self, id: Uuid, agent: &Agent) -> Result<bool, FieldopsServiceError> {
        let approved = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let agent = agent.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let result = agent_applications::Entity::update_many()
                        .col_expr(
                            agent_applications::Column::Status,
                            Expr::value(ApplicationStatus::Approved.as_str()),
                        )
                        .col_expr(
                            agent_applications::Column::DecidedAt,
                            Expr::value(Some(now)),
                        )
                        .filter(agent_applications::Column::Id.eq(id))
                        .filter(
                            agent_applications::Column::Status
                                .eq(ApplicationStatus::Pending.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }

                    agents::ActiveModel {
                        id: Set(agent.id),
                        user_id: Set(agent.user_id),
                        name: Set(agent.name.clone()),
                        phone: Set(agent.phone.clone()),
                        service_kinds: Set(kinds_to_json(&agent.service_kinds)),
                        latitude: Set(agent.latitude),
                        longitude: Set(agent.longitude),
                        active: Set(agent.active),
                        total_services: Set(agent.total_services),
                        total_earnings_cents: Set(agent.total_earnings.cents()),
                        created_at: Set(agent.created_at),
                        updated_at: Set(agent.updated_at),
                    }
                    .insert(txn)
                    .await?;

                    users::Entity::update_many()
                        .col_expr(
                            users::Column::Role,
                            Expr::value(UserRole::Agent.as_u8() as i16),
                        )
                        .col_expr(users::Column::UpdatedAt, Expr::value(now))
                        .filter(users::Column::Id.eq(agent.user_id))
                        .exec(txn)
                        .await?;

                    Ok(true)
                })
            })
            .await
            .context("approve agent application")?;
        Ok(approved)
    }

    async fn reject(&self, id: Uuid) -> Result<bool, FieldopsServiceError> {
        let result = agent_applications::Entity::update_many()
            .col_expr(
                agent_applications::Column::Status,
                Expr::value(ApplicationStatus::Rejected.as_str()),
            )
            .col_expr(
                agent_applications::Column::DecidedAt,
                Expr::value(Some(Utc::now())),
            )
            .filter(agent_applications::Column::Id.eq(id))
            .filter(agent_applications::Column::Status.eq(ApplicationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("reject agent application")?;
        Ok(result.rows_affected > 0)
    }
}

fn application_from_model(
    model: agent_applications::Model,
) -> Result<AgentApplication, FieldopsServiceError> {
    let status = ApplicationStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown application status {:?}", model.status))?;
    Ok(AgentApplication {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        phone: model.phone,
        service_kinds: kinds_from_json(model.service_kinds),
        latitude: model.latitude,
        longitude: model.longitude,
        status,
        decided_at: model.decided_at,
        created_at: model.created_at,
    })
}

// ── Service request repository ───────────────────────────────────────────────

#[derive(Clone)]
pub struct DbServiceRequestRepository {
    pub db: DatabaseConnection,
}

impl ServiceRequestRepository for DbServiceRequestRepository {
    async fn create(&self, request: &ServiceRequest) -> Result<(), FieldopsServiceError> {
        service_requests::ActiveModel {
            id: Set(request.id),
            user_id: Set(request.user_id),
            kind: Set(request.kind.as_str().to_owned()),
            address: Set(request.address.clone()),
            description: Set(request.description.clone()),
            status: Set(request.status.as_str().to_owned()),
            agent_id: Set(request.agent_id),
            estimated_price_cents: Set(request.estimated_price.cents()),
            final_price_cents: Set(None),
            payment_method: Set(None),
            agent_amount_cents: Set(None),
            platform_amount_cents: Set(None),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create service request")?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ServiceRequest>, FieldopsServiceError> {
        let model = service_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find service request by id")?;
        model.map(request_from_model).transpose()
    }

    async fn list(
        &self,
        status: Option<RequestStatus>,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let mut query = service_requests::Entity::find();
        if let Some(status) = status {
            query = query.filter(service_requests::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(service_requests::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list service requests")?;
        models.into_iter().map(request_from_model).collect()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = service_requests::Entity::find()
            .filter(service_requests::Column::UserId.eq(user_id))
            .order_by_desc(service_requests::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list service requests by user")?;
        models.into_iter().map(request_from_model).collect()
    }

    async fn list_by_agent(
        &self,
        agent_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ServiceRequest>, FieldopsServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = service_requests::Entity::find()
            .filter(service_requests::Column::AgentId.eq(agent_id))
            .order_by_desc(service_requests::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list service requests by agent")?;
        models.into_iter().map(request_from_model).collect()
    }

    async fn assign(&self, id: Uuid, agent_id: Uuid) -> Result<bool, FieldopsServiceError> {
        let result = service_requests::Entity::update_many()
            .col_expr(
                service_requests::Column::Status,
                Expr::value(RequestStatus::Assigned.as_str()),
            )
            .col_expr(service_requests::Column::AgentId, Expr::value(Some(agent_id)))
            .col_expr(service_requests::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(service_requests::Column::Id.eq(id))
            .filter(service_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("assign service request")?;
        Ok(result.rows_affected > 0)
    }

    async fn start(&self, id: Uuid, agent_id: Uuid) -> Result<bool, FieldopsServiceError> {
        let result = service_requests::Entity::update_many()
            .col_expr(
                service_requests::Column::Status,
                Expr::value(RequestStatus::InProgress.as_str()),
            )
            .col_expr(service_requests::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(service_requests::Column::Id.eq(id))
            .filter(service_requests::Column::AgentId.eq(agent_id))
            .filter(service_requests::Column::Status.eq(RequestStatus::Assigned.as_str()))
            .exec(&self.db)
            .await
            .context("start service request")?;
        Ok(result.rows_affected > 0)
    }

    async fn complete(
        &self,
        id: Uuid,
        agent_id: Uuid,
        final_price: Money,
        method: PaymentMethod,
        split: EarningsSplit,
    ) -> Result<bool, FieldopsServiceError> {
        let completed = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let result = service_requests::Entity::update_many()
                        .col_expr(
                            service_requests::Column::Status,
                            Expr::value(RequestStatus::Completed.as_str()),
                        )
                        .col_expr(
                            service_requests::Column::FinalPriceCents,
                            Expr::value(Some(final_price.cents())),
                        )
                        .col_expr(
                            service_requests::Column::PaymentMethod,
                            Expr::value(Some(method.as_str().to_owned())),
                        )
                        .col_expr(
                            service_requests::Column::AgentAmountCents,
                            Expr::value(Some(split.agent.cents())),
                        )
                        .col_expr(
                            service_requests::Column::PlatformAmountCents,
                            Expr::value(Some(split.platform.cents())),
                        )
                        .col_expr(service_requests::Column::UpdatedAt, Expr::value(now))
                        .filter(service_requests::Column::Id.eq(id))
                        .filter(service_requests::Column::AgentId.eq(agent_id))
                        .filter(
                            service_requests::Column::Status
                                .eq(RequestStatus::InProgress.as_str()),
                        )
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }

                    // Atomic column expressions: concurrent completions on
                    // distinct requests never lose an increment, and the
                    // request update and the totals update commit together.
                    agents::Entity::update_many()
                        .col_expr(
                            agents::Column::TotalServices,
                            Expr::col(agents::Column::TotalServices).add(1),
                        )
                        .col_expr(
                            agents::Column::TotalEarningsCents,
                            Expr::col(agents::Column::TotalEarningsCents)
                                .add(split.agent.cents()),
                        )
                        .col_expr(agents::Column::UpdatedAt, Expr::value(now))
                        .filter(agents::Column::Id.eq(agent_id))
                        .exec(txn)
                        .await?;

                    Ok(true)
                })
            })
            .await
            .context("complete service request")?;
        Ok(completed)
    }

    async fn cancel(&self, id: Uuid) -> Result<bool, FieldopsServiceError> {
        let result = service_requests::Entity::update_many()
            .col_expr(
                service_requests::Column::Status,
                Expr::value(RequestStatus::Cancelled.as_str()),
            )
            .col_expr(service_requests::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(service_requests::Column::Id.eq(id))
            .filter(service_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("cancel service request")?;
        Ok(result.rows_affected > 0)
    }

    async fn reject(&self, id: Uuid) -> Result<bool, FieldopsServiceError> {
        let result = service_requests::Entity::update_many()
            .col_expr(
                service_requests::Column::Status,
                Expr::value(RequestStatus::Rejected.as_str()),
            )
            .col_expr(service_requests::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(service_requests::Column::Id.eq(id))
            .filter(service_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("reject service request")?;
        Ok(result.rows_affected > 0)
    }
}

fn request_from_model(
    model: service_requests::Model,
) -> Result<ServiceRequest, FieldopsServiceError> {
    let kind = ServiceKind::parse(&model.kind)
        .ok_or_else(|| anyhow::anyhow!("unknown service kind {:?}", model.kind))?;
    let status = RequestStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown request status {:?}", model.status))?;
    let payment_method = model
        .payment_method
        .as_deref()
        .map(|m| {
            PaymentMethod::parse(m)
                .ok_or_else(|| anyhow::anyhow!("unknown payment method {m:?}"))
        })
        .transpose()?;
    Ok(ServiceRequest {
        id: model.id,
        user_id: model.user_id,
        kind,
        address: model.address,
        description: model.description,
        status,
        agent_id: model.agent_id,
        estimated_price: Money::from_cents(model.estimated_price_cents),
        final_price: model.final_price_cents.map(Money::from_cents),
        payment_method,
        agent_amount: model.agent_amount_cents.map(Money::from_cents),
        platform_amount: model.platform_amount_cents.map(Money::from_cents),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
