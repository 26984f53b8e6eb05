//! Construction-time errors for body systems.

use crate::body::BodyId;

/// Errors raised while assembling a [`SolarSystem`](crate::SolarSystem).
///
/// Once a system is built nothing about it can fail; these only guard the
/// builder against references to bodies that do not exist yet.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SystemError {
    /// Two bodies were given the same name.
    #[error("duplicate body name '{0}'")]
    DuplicateName(String),

    /// A parent or pivot id does not refer to an already-added body.
    #[error("body '{name}' references unknown body {id:?}")]
    UnknownBody { name: String, id: BodyId },

    /// A catalog entry names a parent or pivot that is not in the catalog
    /// ahead of it.
    #[error("catalog entry '{name}' references '{missing}', which is not defined before it")]
    UnresolvedName { name: String, missing: String },
}
