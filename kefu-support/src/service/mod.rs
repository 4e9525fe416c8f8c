pub mod support;

pub use support::{ServiceError, SupportService};
