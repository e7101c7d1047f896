use crate::domain::model::OrderRecord;
use crate::utils::error::{ExportError, Result};
use chrono::NaiveDate;

pub const CSV_HEADER: [&str; 4] = ["Date", "Amount", "Description", "Order ID"];

/// 將訂單序列化成 CSV 全文，欄位順序與標頭固定
pub fn serialize(records: &[OrderRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.date.as_str(),
            record.amount.as_str(),
            record.description.as_str(),
            record.order_id.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// 以執行當天日期組出輸出檔名
pub fn export_filename(date: NaiveDate) -> String {
    format!("amazon-orders-{}.csv", date.format("%Y-%m-%d"))
}
