use crate::models::DocumentCategory;
use crate::services::store::DocumentRecord;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Display-ready projection of a header and its optional metadata, produced
/// fresh on every fetch. Category and document_date are always present:
/// defaults are substituted here and nowhere else.
#[derive(Debug, Clone)]
pub struct DocumentView {
    pub id: String,
    pub title: String,
    pub category: DocumentCategory,
    pub document_date: DateTime<Utc>,
    pub file_name: String,
    pub file_location: String,
    pub file_size: i64,
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub notes: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Ordering of a built view list. `List` keeps the adapter's native order
/// (newest upload first); `Timeline` re-orders by medical event date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewOrder {
    #[default]
    List,
    Timeline,
}

pub fn merge_record(record: &DocumentRecord) -> DocumentView {
    let metadata = record.metadata.as_ref();
    DocumentView {
        id: record.header.id.clone(),
        title: record.header.file_name.clone(),
        category: metadata
            .and_then(|m| m.category)
            .unwrap_or(DocumentCategory::General),
        document_date: metadata
            .and_then(|m| m.document_date)
            .unwrap_or(record.header.uploaded_at),
        file_name: record.header.file_name.clone(),
        file_location: record.header.file_location.clone(),
        file_size: record.header.file_size,
        doctor_name: metadata.and_then(|m| m.doctor_name.clone()),
        hospital_name: metadata.and_then(|m| m.hospital_name.clone()),
        notes: metadata.and_then(|m| m.notes.clone()),
        uploaded_at: record.header.uploaded_at,
    }
}

/// Case-insensitive substring match over title, category, doctor and
/// hospital. An empty query matches everything; absent fields never match.
fn matches_query(view: &DocumentView, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&query);
    contains(&view.title)
        || contains(view.category.as_str())
        || view.doctor_name.as_deref().map_or(false, |d| contains(d))
        || view.hospital_name.as_deref().map_or(false, |h| contains(h))
}

/// Merges and filters, preserving the input order of `records`.
pub fn build_views(records: &[DocumentRecord], search: &str) -> Vec<DocumentView> {
    records
        .iter()
        .map(merge_record)
        .filter(|view| matches_query(view, search))
        .collect()
}

/// Stable sorts: equal keys preserve the relative input order.
pub fn order_views(views: &mut [DocumentView], order: ViewOrder) {
    match order {
        ViewOrder::List => views.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at)),
        ViewOrder::Timeline => views.sort_by(|a, b| b.document_date.cmp(&a.document_date)),
    }
}
