pub mod error;
pub mod pagination;
#[cfg(feature = "web_actix")]
pub mod actix_ext;
#[cfg(feature = "web_actix")]
pub mod response;

pub use error::*;
pub use pagination::*;
#[cfg(feature = "web_actix")]
pub use actix_ext::*;
#[cfg(feature = "web_actix")]
pub use response::*;
