mod authenticated_actor;

pub use authenticated_actor::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, AuthenticatedActor};
