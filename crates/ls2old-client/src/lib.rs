//! ls2old HTTP Clients
//!
//! Blocking HTTP implementations of the pipeline's two external
//! collaborators:
//!
//! - [`FieldDbClient`]: the LingSync side, speaking the CouchDB HTTP API
//!   (session login, `_all_docs` bulk fetch).
//! - [`OldClient`]: the OLD side, speaking its JSON/REST API (cookie-based
//!   authentication, resource CRUD, `SEARCH` queries).
//!
//! Both clients hold a cookie store so one login call authenticates the
//! whole run. The pipeline is deliberately single-threaded and sequential,
//! so blocking requests are the right shape here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fielddb;
pub mod old;

pub use error::ClientError;
pub use fielddb::FieldDbClient;
pub use old::OldClient;
