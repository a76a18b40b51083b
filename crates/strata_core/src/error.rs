//! # Registry Error Types
//!
//! The recoverable failures a registry can report. Contract violations
//! (dereferencing an unowned component, exceeding the component-type limit)
//! are not errors - they abort with a diagnostic instead, because continuing
//! would operate on an invalid read.

use thiserror::Error;

use crate::ecs::entity::EntityId;

/// Errors that can occur on the registry's fallible paths.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// The allocator has issued every id up to its hard cap.
    #[error("entity limit reached: {limit} ids issued and none free")]
    EntityLimitReached {
        /// The cap the allocator was configured with.
        limit: usize,
    },

    /// The entity is not currently live.
    #[error("entity {0:?} is not alive")]
    NoSuchEntity(EntityId),

    /// The entity does not own the requested component.
    #[error("entity {entity:?} does not have component {component}")]
    MissingComponent {
        /// The entity that was probed.
        entity: EntityId,
        /// Type name of the missing component.
        component: &'static str,
    },
}

/// Result type for registry operations.
pub type EcsResult<T> = Result<T, EcsError>;
