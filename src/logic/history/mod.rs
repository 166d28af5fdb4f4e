//! History Module - lịch sử phân tích append-only
//!
//! Mỗi run Done là một dòng JSONL. Store không bao giờ sửa hay xoá
//! entry cũ, đọc lại theo đúng thứ tự append.

mod store;


pub use store::{HistoryEntry, HistoryStore};
