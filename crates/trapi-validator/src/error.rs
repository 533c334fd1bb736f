//! Error types for TRAPI validators.

use thiserror::Error;
use trapi_schema::SchemaError;

/// Operational failure of a validation run.
///
/// Schema violations are not errors; they are recorded in the validator's
/// reporter.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// The schema set for the requested version could not be produced.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The component is not defined in the schema set.
    #[error("unknown TRAPI component '{component}' in version {version}")]
    UnknownComponent {
        /// Requested component name.
        component: String,
        /// Canonical version that was searched.
        version: String,
    },

    /// The component schema could not be compiled into a validator.
    #[error("failed to build validator for component '{component}': {reason}")]
    ValidatorBuild {
        /// Component whose schema failed to compile.
        component: String,
        /// Compiler error.
        reason: String,
    },
}
