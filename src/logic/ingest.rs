//! Ingest Module - tiếp nhận dataset và kiểm tra metadata
//!
//! Validation ở đây chỉ nhìn tên file và kích thước, không đọc nội dung.
//! Nội dung chỉ được đọc khi parser mở reader.

use std::fs;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::constants::MAX_UPLOAD_BYTES;
use crate::logic::error::ValidationError;

// ============================================================================
// DATASET HANDLE
// ============================================================================

/// Nguồn dữ liệu của một dataset
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// File trên đĩa, đọc lazy qua BufReader
    File(PathBuf),
    /// Buffer trong bộ nhớ (test và ingest trực tiếp)
    Memory(Vec<u8>),
}

/// Reference đến một dataset đã chọn nhưng chưa chắc đã đọc
#[derive(Debug, Clone)]
pub struct DatasetHandle {
    name: String,
    size_bytes: u64,
    source: DatasetSource,
}

impl DatasetHandle {
    /// Tạo handle từ một file trên đĩa (đọc metadata, không đọc nội dung)
    pub fn from_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let meta = fs::metadata(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            size_bytes: meta.len(),
            source: DatasetSource::File(path),
        })
    }

    /// Tạo handle từ buffer có sẵn
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            source: DatasetSource::Memory(bytes),
        }
    }

    /// Tạo handle với kích thước khai báo, không có nội dung (chỉ để validate)
    pub fn metadata_only(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            source: DatasetSource::Memory(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Mở reader mới trên nội dung dataset
    pub fn open_reader(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        match &self.source {
            DatasetSource::File(path) => Ok(Box::new(BufReader::new(fs::File::open(path)?))),
            DatasetSource::Memory(bytes) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Đuôi file dataset được chấp nhận
const SUPPORTED_EXTENSION: &str = "csv";

/// Kiểm tra tên file có đuôi được hỗ trợ không (case-insensitive)
pub fn is_supported_format(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
        .unwrap_or(false)
}

/// Validate metadata của dataset trước khi cho vào pipeline
///
/// Thuần metadata: không mở file, không đọc byte nào.
pub fn validate(handle: &DatasetHandle) -> Result<(), ValidationError> {
    if !is_supported_format(handle.name()) {
        return Err(ValidationError::UnsupportedFormat {
            name: handle.name().to_string(),
        });
    }

    if handle.size_bytes() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size_bytes: handle.size_bytes(),
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
