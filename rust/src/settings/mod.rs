// Controller documents fetched and stored through a session.

pub mod auto_config;
pub mod traits;

pub use auto_config::AutoConfigSettings;
pub use traits::RestResource;
