//! API Module
//!
//! Caller-facing surface của core: command flow và session state.
//!
//! Structure:
//! - commands.rs: select → analyze → history → export operations
//! - session.rs: SessionContext (owner identity) + UploadSession (upload state)
//!
//! Mọi command trả `Result<T, String>`; structured error không bao giờ
//! đi qua boundary này, chỉ có tóm tắt một dòng với phần kind đứng đầu.

pub mod commands;
pub mod session;

pub use commands::*;
pub use session::{SessionContext, UploadSession};
