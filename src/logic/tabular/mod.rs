//! Tabular Module - parse CSV thành preview giới hạn dòng
//!
//! Parser chỉ giữ tối đa `row_limit` dòng dữ liệu đầu tiên trong bộ nhớ.
//! Dataset đầy đủ không bao giờ được load toàn bộ.

mod parser;
mod preview;

pub use parser::{count_data_rows, parse_preview};
pub use preview::PreviewTable;
