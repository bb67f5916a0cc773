//! Errors raised while building or transforming a component tree.

use thiserror::Error;

/// Errors surfaced by [`crate::Component`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// A name collided with an existing port/void/bulk/subcomponent/label/
    /// regional-setting entry in the same component.
    #[error("name '{0}' already exists in this component")]
    NameConflict(String),
    /// A name was not a valid identifier (letters/digits/underscore, not
    /// starting with a digit).
    #[error("name '{0}' is not a valid identifier")]
    InvalidIdentifier(String),
    /// An entry being added already has an owner.
    #[error("entry has already been added to another component")]
    AlreadyOwned,
    /// `rotate` was called with an angle that is not a multiple of 90.
    #[error("rotation must be a multiple of 90 degrees, got {0}")]
    RotationNotMultipleOf90(i32),
    /// A regional setting's shape collided with an existing one of the
    /// same kind.
    #[error("regional settings '{new}' collides with existing settings '{existing}'")]
    RegionalOverlap {
        /// The new entry's name.
        new: String,
        /// The existing entry's name.
        existing: String,
    },
    /// A referenced label does not exist in the target component.
    #[error("label '{0}' not found")]
    LabelNotFound(String),
    /// A referenced shape, subcomponent, or path segment does not exist.
    #[error("'{0}' not found")]
    NotFound(String),
}

/// Result alias for component-tree operations.
pub type Result<T> = std::result::Result<T, ComponentError>;
