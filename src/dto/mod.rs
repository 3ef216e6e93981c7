pub mod api_response;
pub mod diagnostics_dto;
pub mod passport_dto;

pub use api_response::ApiResponse;
