//! Preview Table - phần đầu của dataset đã parse

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bounded sample of a parsed dataset
///
/// `headers` giữ nguyên thứ tự cột trong file (kể cả tên trùng);
/// mỗi row là map header -> cell, cell thiếu là chuỗi rỗng.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTable {
    headers: Vec<String>,
    rows: Vec<BTreeMap<String, String>>,
    row_limit: usize,
}

impl PreviewTable {
    pub fn new(headers: Vec<String>, rows: Vec<BTreeMap<String, String>>, row_limit: usize) -> Self {
        Self {
            headers,
            rows,
            row_limit,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[BTreeMap<String, String>] {
        &self.rows
    }

    pub fn row_limit(&self) -> usize {
        self.row_limit
    }

    /// Số dòng dữ liệu thực tế trong preview (<= row_limit)
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lấy cell theo dòng và tên cột
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(header)).map(|s| s.as_str())
    }

    /// Kiểm tra invariants: số dòng trong giới hạn, key của row nằm trong headers
    pub fn validate(&self) -> Result<(), String> {
        if self.rows.len() > self.row_limit {
            return Err(format!(
                "preview holds {} rows, above the {} row limit",
                self.rows.len(),
                self.row_limit
            ));
        }

        for (idx, row) in self.rows.iter().enumerate() {
            for key in row.keys() {
                if !self.headers.iter().any(|h| h == key) {
                    return Err(format!("row {} has unknown column '{}'", idx, key));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_validate_ok() {
        let table = PreviewTable::new(
            vec!["a".into(), "b".into()],
            vec![row(&[("a", "1"), ("b", "2")])],
            10,
        );
        assert!(table.validate().is_ok());
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_validate_rejects_unknown_column() {
        let table = PreviewTable::new(
            vec!["a".into()],
            vec![row(&[("a", "1"), ("ghost", "2")])],
            10,
        );
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overflow() {
        let rows = (0..3).map(|i| row(&[("a", &i.to_string()[..])])).collect();
        let table = PreviewTable::new(vec!["a".into()], rows, 2);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_serialize_uses_camel_case_row_limit() {
        let table = PreviewTable::new(vec!["a".into()], vec![], 10);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("rowLimit").is_some());
        assert!(json.get("headers").is_some());
        assert!(json.get("rows").is_some());
    }

    #[test]
    fn test_cell_lookup() {
        let table = PreviewTable::new(
            vec!["a".into(), "b".into()],
            vec![row(&[("a", "1"), ("b", "")])],
            10,
        );
        assert_eq!(table.cell(0, "a"), Some("1"));
        assert_eq!(table.cell(0, "b"), Some(""));
        assert_eq!(table.cell(0, "c"), None);
        assert_eq!(table.cell(1, "a"), None);
    }
}
