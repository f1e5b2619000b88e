// Controller session: login, header bookkeeping and the REST verbs.

pub mod dcnm_session;
pub mod response;

pub use dcnm_session::{LoginOutcome, Session};
pub use response::DcnmResponse;
