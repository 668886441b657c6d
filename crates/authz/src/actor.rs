//! The authenticated identity making a request.

use serde::{Deserialize, Serialize};

use warden_core::UserId;

use crate::claims::ActorClaims;

/// A verified actor, as handed over by the identity layer.
///
/// Authorization treats the actor as opaque except for its id (role membership
/// is resolved from storage, never from the token); username and email are
/// carried only so audit entries can be rendered without a directory join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<ActorClaims> for Actor {
    fn from(claims: ActorClaims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}
