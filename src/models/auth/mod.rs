pub mod claims;
pub mod requests;
pub mod responses;

pub use claims::AuthClaim;
