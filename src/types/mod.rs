//! Response envelopes, status mapping and pagination.

mod pagination;
pub mod response;
mod status;

pub use pagination::PaginationParams;
pub use response::{ApiResponse, Created, Meta, NoContent, PageInfo};
pub use status::{get_status_code, ResponseKind};
