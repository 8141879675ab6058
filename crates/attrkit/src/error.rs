use thiserror::Error;

use crate::validators::ValidationError;

/// Errors raised while declaring classes, constructing instances or
/// querying class metadata.
///
/// Everything except [`AttrsError::Validation`] is a usage error: the caller
/// passed something the class cannot accept. None of them are recoverable
/// inside the crate; an operation that fails produces no instance.
#[derive(Error, Debug, Clone)]
pub enum AttrsError {
    #[error("class name cannot be empty")]
    EmptyClassName,

    #[error("attribute '{attribute}' is declared more than once on class '{class}'")]
    DuplicateAttribute { class: String, attribute: String },

    #[error("attribute '{0}' cannot have both a default value and a factory")]
    ConflictingDefault(String),

    #[error(
        "no mandatory attributes allowed after an attribute with a default value or factory; \
         attribute in question: '{attribute}' on class '{class}'"
    )]
    MandatoryAfterDefault { class: String, attribute: String },

    #[error("{class}() missing required argument: '{argument}'")]
    MissingArgument { class: String, argument: String },

    #[error("{class}() takes {expected} positional arguments but {given} were given")]
    TooManyArguments {
        class: String,
        expected: usize,
        given: usize,
    },

    #[error("{class}() got an unexpected keyword argument '{argument}'")]
    UnexpectedArgument { class: String, argument: String },

    #[error("{class}() got multiple values for argument '{argument}'")]
    DuplicateArgument { class: String, argument: String },

    #[error("class '{class}' has no attribute '{attribute}'")]
    UnknownAttribute { class: String, attribute: String },

    #[error("{0} is not an attrs class")]
    NotAnAttrsClass(String),

    #[error("expected a map to build '{class}' from, got a {found}")]
    NotAMap { class: String, found: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, AttrsError>;
