//! Tabular Parser - đọc CSV qua csv crate, dừng sớm khi đủ preview
//!
//! All-or-nothing: gặp lỗi tokenizer ở bất kỳ dòng nào trong preview
//! là bỏ cả kết quả, không trả về partial table.

use std::collections::BTreeMap;
use std::io::Read;

use crate::logic::error::ParseError;
use crate::logic::ingest::DatasetHandle;

use super::preview::PreviewTable;

/// Parse phần đầu dataset thành PreviewTable
///
/// Dòng đầu tiên là header. Giữ tối đa `limit` dòng dữ liệu rồi dừng đọc.
/// Cell thiếu thành chuỗi rỗng, cell thừa bị bỏ, header trùng tên thì
/// giá trị sau đè giá trị trước.
pub fn parse_preview(handle: &DatasetHandle, limit: usize) -> Result<PreviewTable, ParseError> {
    let reader = handle.open_reader()?;
    parse_reader(reader, limit)
}

fn parse_reader<R: Read>(input: R, limit: usize) -> Result<PreviewTable, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ParseError::MalformedInput(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::Empty);
    }

    let mut rows: Vec<BTreeMap<String, String>> = Vec::with_capacity(limit);
    for record in reader.records().take(limit) {
        let record = record.map_err(|e| ParseError::MalformedInput(e.to_string()))?;

        let mut row = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or("").to_string();
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    Ok(PreviewTable::new(headers, rows, limit))
}

/// Đếm chính xác số dòng dữ liệu (không tính header) bằng cách stream cả file
///
/// Dùng byte records nên không yêu cầu UTF-8 hợp lệ, chỉ đếm.
pub fn count_data_rows(handle: &DatasetHandle) -> Result<u64, ParseError> {
    let reader = handle.open_reader()?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut count: u64 = 0;
    for record in csv_reader.byte_records() {
        record.map_err(|e| ParseError::MalformedInput(e.to_string()))?;
        count += 1;
    }

    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================
