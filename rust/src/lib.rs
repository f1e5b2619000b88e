//! Session wrapper for the DCNM REST controller.
//!
//! A [`Session`] logs in once, keeps the token the controller hands back as a
//! request header, and forwards `get`/`post`/`put`/`delete` calls.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod settings;

pub use config::{LogLevel, SessionConfig};
pub use error::{Error, Result};
pub use session::{DcnmResponse, LoginOutcome, Session};
pub use settings::{AutoConfigSettings, RestResource};
