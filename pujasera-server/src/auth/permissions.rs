//! Roles and the authenticated caller
//!
//! Two families of actors:
//! - venue actors (venue-admin, cashier) own the parent order and the
//!   venue-wide dashboard
//! - tenant actors (tenant-admin, kitchen-staff) are bound to one
//!   tenant and only ever touch that tenant's sub-orders

use std::fmt;
use std::str::FromStr;

use crate::auth::Claims;
use crate::utils::AppError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    VenueAdmin,
    Cashier,
    TenantAdmin,
    KitchenStaff,
}

impl Role {
    /// Tenant-side roles allowed to mark a sub-order ready
    pub fn can_update_kitchen_status(&self) -> bool {
        matches!(self, Self::TenantAdmin | Self::KitchenStaff)
    }

    /// Venue-side roles allowed to complete or cancel a parent order
    pub fn can_manage_parent_orders(&self) -> bool {
        matches!(self, Self::VenueAdmin | Self::Cashier)
    }

    /// Whether this role is bound to a single tenant
    pub fn is_tenant_scoped(&self) -> bool {
        matches!(self, Self::TenantAdmin | Self::KitchenStaff)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "venue-admin" => Ok(Self::VenueAdmin),
            "cashier" => Ok(Self::Cashier),
            "tenant-admin" => Ok(Self::TenantAdmin),
            "kitchen-staff" => Ok(Self::KitchenStaff),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VenueAdmin => "venue-admin",
            Self::Cashier => "cashier",
            Self::TenantAdmin => "tenant-admin",
            Self::KitchenStaff => "kitchen-staff",
        };
        write!(f, "{}", s)
    }
}

/// Authenticated caller extracted from a validated JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    /// Tenant binding; present iff the role is tenant-scoped
    pub tenant_id: Option<String>,
    pub venue_id: String,
}

impl CurrentUser {
    /// Require a role that may mark kitchen slices ready, acting on
    /// `tenant_id` only
    pub fn require_kitchen_access(&self, tenant_id: &str) -> Result<(), AppError> {
        if !self.role.can_update_kitchen_status() {
            return Err(AppError::permission_denied(format!(
                "Role {} may not update kitchen status",
                self.role
            )));
        }
        // Ids may travel as "tenant:key" or bare key
        let key = |id: &str| id.strip_prefix("tenant:").unwrap_or(id).to_string();
        match self.tenant_id.as_deref() {
            Some(own) if key(own) == key(tenant_id) => Ok(()),
            _ => Err(AppError::with_message(
                shared::error::ErrorCode::TenantMismatch,
                format!("Caller is not bound to tenant {}", tenant_id),
            )),
        }
    }

    /// Require that `venue_id` names the caller's own venue
    ///
    /// Request bodies may carry the venue alongside the receipt; when
    /// they do it must match the credential, which stays the source of
    /// truth for venue scoping.
    pub fn require_venue(&self, venue_id: &str) -> Result<(), AppError> {
        let key = |id: &str| id.strip_prefix("venue:").unwrap_or(id).to_string();
        if key(&self.venue_id) == key(venue_id) {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Caller does not belong to venue {}",
                venue_id
            )))
        }
    }

    /// Require a venue-side role
    pub fn require_venue_access(&self) -> Result<(), AppError> {
        if self.role.can_manage_parent_orders() {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Role {} may not manage parent orders",
                self.role
            )))
        }
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = Role::from_str(&claims.role)?;
        if role.is_tenant_scoped() && claims.tenant_id.is_none() {
            return Err(format!("role {} requires a tenant binding", role));
        }
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            role,
            tenant_id: claims.tenant_id,
            venue_id: claims.venue_id,
        })
    }
}
