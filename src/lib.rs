//! Back office onboarding — customer onboarding flow and presigned document
//! upload client.

pub mod api;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod upload;
