use crate::utils::error::ExportError;
use serde::{Deserialize, Serialize};

/// 從訂單頁面擷取出的單筆訂單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub date: String,
    pub amount: String,
    pub description: String,
    pub order_id: String,
}

/// 單次匯出過程累積的狀態
#[derive(Debug)]
pub struct ExportSession {
    pub records: Vec<OrderRecord>,
    pub pages_processed: usize,
    pub expected_total: Option<usize>,
    pub status: SessionStatus,
}

#[derive(Debug)]
pub enum SessionStatus {
    InProgress,
    Completed,
    Failed(ExportError),
}

impl ExportSession {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            pages_processed: 0,
            expected_total: None,
            status: SessionStatus::InProgress,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SessionStatus::Failed(_))
    }
}

impl Default for ExportSession {
    fn default() -> Self {
        Self::new()
    }
}

/// 每處理完一頁後回報的進度快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlProgress {
    pub page: usize,
    pub records_so_far: usize,
    pub expected_total: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CsvExport {
    pub csv: String,
    pub record_count: usize,
}
