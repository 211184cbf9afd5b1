use chrono::{DateTime, Utc};
use uuid::Uuid;

use frostline_domain::money::Money;
use frostline_domain::user::UserRole;

/// Offered service categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Installation,
    Repair,
    Maintenance,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Installation => "installation",
            Self::Repair => "repair",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "installation" => Some(Self::Installation),
            "repair" => Some(Self::Repair),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

/// How the customer settled a completed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            _ => None,
        }
    }
}

/// Service request lifecycle.
///
/// Dispatch moves forward along pending → assigned → in_progress →
/// completed; `cancelled` (customer) and `rejected` (admin) are reachable
/// from `pending` only. No operation moves a request backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Position in the dispatch chain; `None` for the terminal side exits.
    fn chain_index(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Assigned => Some(1),
            Self::InProgress => Some(2),
            Self::Completed => Some(3),
            Self::Cancelled | Self::Rejected => None,
        }
    }

    /// Whether `next` is a forward move along the dispatch chain.
    pub fn is_forward(self, next: RequestStatus) -> bool {
        match (self.chain_index(), next.chain_index()) {
            (Some(cur), Some(next)) => next > cur,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }
}

/// User profile owned by the fieldops service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field technician.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub service_kinds: Vec<ServiceKind>,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub total_services: i64,
    pub total_earnings: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Agent application approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Application to become a field agent.
#[derive(Debug, Clone)]
pub struct AgentApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub service_kinds: Vec<ServiceKind>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ApplicationStatus,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AgentApplication {
    /// Provision the agent record created when this application is approved.
    pub fn provision_agent(&self) -> Agent {
        let now = Utc::now();
        Agent {
            id: Uuid::now_v7(),
            user_id: self.user_id,
            name: self.name.clone(),
            phone: self.phone.clone(),
            service_kinds: self.service_kinds.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            active: true,
            total_services: 0,
            total_earnings: Money::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Customer service request.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: ServiceKind,
    pub address: String,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub agent_id: Option<Uuid>,
    pub estimated_price: Money,
    pub final_price: Option<Money>,
    pub payment_method: Option<PaymentMethod>,
    pub agent_amount: Option<Money>,
    pub platform_amount: Option<Money>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
