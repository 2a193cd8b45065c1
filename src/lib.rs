//! Rust client for the Form3 organisation accounts REST API.
//! Provides an async transport core that builds, sends and classifies
//! requests, and typed account operations on top of it.

pub mod accounts;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use accounts::{AccountOperations, Accounts, ACCOUNTS_PATH};
pub use client::{APPLICATION_JSON, ApiResponse, Client, check_response};
pub use config::{BASE_URL_ENV, Config};
pub use error::{Form3Error, RawResponse, ResponseError};
pub use models::{Account, AccountAttributes, AccountStatus, Resource, ResourceList};
pub use tokio_util::sync::CancellationToken;
