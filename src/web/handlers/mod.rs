pub mod analysis_handlers;
pub mod job_handlers;
pub mod system_handlers;

pub use analysis_handlers::*;
pub use job_handlers::*;
pub use system_handlers::*;

use crate::web::types::StandardErrorResponse;
use rocket::response::status::Custom;
use rocket::serde::json::Json;

/// Error side of every JSON route: the standard envelope with an HTTP status.
pub type ApiError = Custom<Json<StandardErrorResponse>>;
