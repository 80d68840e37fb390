pub mod dto;
pub mod errors;
pub mod services;
pub mod traits;
pub mod validation;
