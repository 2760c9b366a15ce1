//! # docsim API
//!
//! REST surface over the comparison engine.
//!
//! | Method | Path       | Description                          |
//! |--------|------------|--------------------------------------|
//! | GET    | `/health`  | liveness probe                       |
//! | GET    | `/config`  | active engine configuration          |
//! | POST   | `/compare` | compare two documents ([`CompareRequest`]) |

pub mod request;
pub mod rest;

pub use request::{CompareRequest, DocumentInput};
pub use rest::{routes, RestApi};
