pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{DataSource, LoadError, Loaded};
pub use types::{parse_timestamp, Project, Report, Severity};
pub use validation::{
    is_valid_project, is_valid_report, validate_project, validate_report, ValidationError,
    ValidationErrors,
};
