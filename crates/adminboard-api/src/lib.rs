//! Adminboard API Client
//!
//! Typed access to the remote identity service (`/auth/*`) and the
//! user directory (`/users/*`). The wire contract belongs to the third
//! party; this crate only mirrors it.

mod auth;
mod client;
mod error;
mod profile;
mod users;

pub use auth::{AuthResponse, Credentials, HttpIdentityClient, IdentityService};
pub use client::ApiClient;
pub use error::ApiError;
pub use profile::{Address, AddressDraft, UserDraft, UserProfile};
pub use users::{PageRequest, UserDirectory, UserPage};

pub type Result<T> = std::result::Result<T, ApiError>;
