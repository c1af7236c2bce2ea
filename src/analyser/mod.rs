pub mod definition;
mod error;
pub mod format;
pub mod lookup;
pub mod response;
pub mod validator;
pub mod value;

pub use definition::{Argument, Definition, ExpectedType, TypeTag};
pub use error::*;
pub use format::{DEFAULT_QUOTES, format, format_with};
pub use lookup::{Context, Lookup, MessageSink};
pub use response::{Criteria, ResponseOverride, ResponseTable};
pub use validator::{AnalyserOptions, Failure, ValidationState, Validator};
pub use value::Value;
