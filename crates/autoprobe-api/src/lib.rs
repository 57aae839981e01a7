//! # AutoProbe API
//!
//! HTTP control surface for the exploration loop.
//!
//! ```text
//! POST /init              initialize a prototype session
//! POST /explore           start a background exploration
//! POST /stop_exploration  stop it and release the browser
//! GET  /exploration_status
//! GET  /get_report        markdown report of the current task
//! POST /get_image         base64 artifact from the task directory
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
