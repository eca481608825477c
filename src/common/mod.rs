pub mod response;

pub use response::ErrorResource;
