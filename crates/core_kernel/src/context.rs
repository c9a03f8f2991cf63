//! Request identity context
//!
//! Identity resolution happens outside the engine. Every operation receives
//! an already-resolved `(facility, user)` pair and uses it for nothing but
//! query scoping and attribution; the engine never authenticates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identifiers::{FacilityId, UserId};

/// The resolved identity attached to one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Facility every query in this request is scoped to
    pub facility_id: FacilityId,
    /// User recorded as the actor on created rows
    pub user_id: UserId,
}

impl RequestContext {
    pub fn new(facility_id: FacilityId, user_id: UserId) -> Self {
        Self {
            facility_id,
            user_id,
        }
    }

    /// Fixed fallback identity for unauthenticated development calls
    pub fn development() -> Self {
        Self {
            facility_id: FacilityId::DEVELOPMENT,
            user_id: UserId::from_uuid(Uuid::nil()),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::development()
    }
}
