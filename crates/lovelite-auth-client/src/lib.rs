//! Client-side auth orchestration for LoveLite.
//!
//! Drives the two-step email sign-in flow (send code, verify code), holds
//! the resulting session, and exposes sign-out. Transport sits behind the
//! `AuthApi` and `SessionGateway` ports; `http` provides reqwest-backed
//! implementations of both.

pub mod error;
pub mod flow;
pub mod http;
pub mod types;

pub use error::AuthClientError;
pub use flow::{AuthApi, AuthFlow, SessionGateway, SignInStatus};
pub use types::{AuthPhase, Session, VerifyResponse};
