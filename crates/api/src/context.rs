use warden_authz::Actor;

/// Authenticated actor for a request.
///
/// This is immutable and must be present for all protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    actor: Actor,
}

impl ActorContext {
    pub fn new(actor: Actor) -> Self {
        Self { actor }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}
