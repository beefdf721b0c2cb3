//! Named base silhouettes.

/// Shape profiles mapping an angle to a unit-circle vector.
pub mod profile;
