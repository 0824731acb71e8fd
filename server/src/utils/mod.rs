pub mod error;
pub mod extract;
pub mod response;

pub use error::AppError;
pub use extract::{ValidJson, ValidPath};

pub type Result<T> = std::result::Result<T, AppError>;
