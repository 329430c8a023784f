pub mod error;
pub mod hashing;
pub mod model;
pub mod multipart;
pub mod password_validation;
pub mod uploads;
