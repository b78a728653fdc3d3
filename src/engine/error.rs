//! Error types for view construction.
//!
//! The engine follows a deliberate two-tier failure policy:
//!
//! * **Expected runtime conditions** (dead entity, absent component, double
//!   detach) are silent no-ops returning `bool`/`Option` sentinels — these sit
//!   on hot paths where error machinery would dominate cost.
//! * **Programmer errors** surface loudly: view contract violations are
//!   rejected at construction with [`ViewError`], and setup misconfiguration
//!   (component capacity overflow, registration after freeze) panics with an
//!   actionable message.
//!
//! Each error carries enough structure to make the failure actionable without
//! reproducing it: the offending [`ComponentId`] plus the component's type
//! name.
//!
//! ## Display vs. Debug
//! * [`fmt::Display`] is optimized for operator logs (short, imperative).
//! * [`fmt::Debug`] (derived) retains full structure for diagnostics.

use std::fmt;

use crate::engine::types::ComponentId;

/// Returned when a view's include/exclude type sets violate the query
/// contract.
///
/// Views are parameterized by two compile-time type sets; the sets must be
/// disjoint and each included type must appear once. Violations are detected
/// before any view instance is constructed.
///
/// The empty-include case has no variant here: include sets are tuples of
/// arity ≥ 1, so it cannot be expressed at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// A component type appears more than once in the include set.
    DuplicateInclude {
        /// ID of the repeated component type.
        component_id: ComponentId,
        /// Rust type name of the repeated component.
        name: &'static str,
    },

    /// A component type appears in both the include and exclude sets.
    IncludeExcludeOverlap {
        /// ID of the overlapping component type.
        component_id: ComponentId,
        /// Rust type name of the overlapping component.
        name: &'static str,
    },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::DuplicateInclude { component_id, name } => write!(
                f,
                "component {} ({}) appears more than once in the include set",
                component_id, name
            ),
            ViewError::IncludeExcludeOverlap { component_id, name } => write!(
                f,
                "component {} ({}) appears in both the include and exclude sets",
                component_id, name
            ),
        }
    }
}

impl std::error::Error for ViewError {}
