//! Feature Frame - thống kê theo cột rút ra từ preview
//!
//! Input cho classifier: mỗi cột một profile (số cell có giá trị,
//! số cell numeric, mean/std/max trên phần numeric).

use crate::logic::tabular::PreviewTable;

/// Thống kê của một cột
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: String,
    /// Số cell không rỗng
    pub non_empty: usize,
    /// Số cell parse được thành số
    pub numeric: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub max: f32,
}

impl ColumnProfile {
    fn from_values(name: String, non_empty: usize, values: &[f32]) -> Self {
        if values.is_empty() {
            return Self {
                name,
                non_empty,
                numeric: 0,
                mean: 0.0,
                std_dev: 0.0,
                max: 0.0,
            };
        }

        let n = values.len() as f32;
        let mean: f32 = values.iter().sum::<f32>() / n;
        let variance: f32 = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        let max = values.iter().fold(f32::MIN, |acc, v| acc.max(*v));

        Self {
            name,
            non_empty,
            numeric: values.len(),
            mean,
            std_dev: variance.sqrt(),
            max,
        }
    }

    /// Cột có đủ dữ liệu số để dùng làm tín hiệu không
    pub fn is_numeric(&self) -> bool {
        self.numeric > 0
    }

    /// Hệ số biến thiên (std/mean), 0 nếu mean quá nhỏ
    pub fn dispersion(&self) -> f32 {
        if self.mean.abs() < 0.001 {
            return 0.0;
        }
        (self.std_dev / self.mean).abs()
    }
}

/// Toàn bộ tín hiệu đưa vào classifier
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    /// Số dòng có trong preview
    pub sampled_rows: usize,
    /// Số dòng của dataset (exact hoặc ước lượng, do pipeline quyết định)
    pub total_rows: u64,
    pub columns: Vec<ColumnProfile>,
}

impl FeatureFrame {
    /// Build frame từ preview đã parse
    pub fn from_preview(preview: &PreviewTable, total_rows: u64) -> Self {
        let mut columns = Vec::with_capacity(preview.column_count());

        for header in preview.headers() {
            let mut non_empty = 0usize;
            let mut values: Vec<f32> = Vec::new();

            for row in preview.rows() {
                let cell = row.get(header).map(|s| s.as_str()).unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                non_empty += 1;
                if let Ok(v) = cell.parse::<f32>() {
                    if v.is_finite() {
                        values.push(v);
                    }
                }
            }

            columns.push(ColumnProfile::from_values(header.clone(), non_empty, &values));
        }

        Self {
            sampled_rows: preview.row_count(),
            total_rows,
            columns,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Tìm cột theo tên (không phân biệt hoa thường)
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Các cột có dữ liệu số
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(|c| c.is_numeric())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ingest::DatasetHandle;
    use crate::logic::tabular::parse_preview;

    fn frame_from(csv: &[u8], total_rows: u64) -> FeatureFrame {
        let handle = DatasetHandle::from_bytes("t.csv", csv.to_vec());
        let preview = parse_preview(&handle, 10).unwrap();
        FeatureFrame::from_preview(&preview, total_rows)
    }

    #[test]
    fn test_mean_and_std() {
        let frame = frame_from(b"v\n2\n4\n6\n8\n", 400);
        let col = frame.column("v").unwrap();

        assert_eq!(col.numeric, 4);
        assert!((col.mean - 5.0).abs() < 1e-5);
        // Variance của 2,4,6,8 là 5.0
        assert!((col.std_dev - 5.0f32.sqrt()).abs() < 1e-4);
        assert!((col.max - 8.0).abs() < 1e-5);
        assert_eq!(frame.total_rows, 400);
        assert_eq!(frame.sampled_rows, 4);
    }

    #[test]
    fn test_non_numeric_cells_are_counted_but_not_aggregated() {
        let frame = frame_from(b"proto,rate\ntcp,100\nudp,300\n,200\n", 300);

        let proto = frame.column("proto").unwrap();
        assert_eq!(proto.non_empty, 2);
        assert_eq!(proto.numeric, 0);
        assert!(!proto.is_numeric());

        let rate = frame.column("rate").unwrap();
        assert_eq!(rate.non_empty, 3);
        assert_eq!(rate.numeric, 3);
        assert!((rate.mean - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let frame = frame_from(b"Flow Packets/s\n10\n", 100);
        assert!(frame.column("flow packets/s").is_some());
        assert!(frame.column("FLOW PACKETS/S").is_some());
        assert!(frame.column("missing").is_none());
    }

    #[test]
    fn test_dispersion_guard_on_tiny_mean() {
        let frame = frame_from(b"z\n0\n0\n0\n", 300);
        let col = frame.column("z").unwrap();
        assert_eq!(col.dispersion(), 0.0);
    }

    #[test]
    fn test_numeric_columns_filter() {
        let frame = frame_from(b"name,a,b\nx,1,foo\ny,2,bar\n", 200);
        let numeric: Vec<&str> = frame.numeric_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric, vec!["a"]);
    }
}
