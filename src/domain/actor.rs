use std::fmt;
use std::str::FromStr;

use super::ParticipantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Customer,
    Vendor,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Customer => "customer",
            ActorRole::Vendor => "vendor",
        }
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(ActorRole::Customer),
            "vendor" => Ok(ActorRole::Vendor),
            other => Err(format!("Invalid actor role: {}", other)),
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated caller of a messaging operation.
///
/// Every operation receives the actor explicitly. Participant checks only
/// compare ids; the role is used to orient requests that name a counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: ParticipantId,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: ParticipantId, role: ActorRole) -> Self {
        Self { id, role }
    }

    pub fn customer(id: ParticipantId) -> Self {
        Self::new(id, ActorRole::Customer)
    }

    pub fn vendor(id: ParticipantId) -> Self {
        Self::new(id, ActorRole::Vendor)
    }
}
