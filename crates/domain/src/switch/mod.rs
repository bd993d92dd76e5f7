mod error_kind;
mod result;

pub use error_kind::SwitchErrorKind;
pub use result::SwitchResult;
