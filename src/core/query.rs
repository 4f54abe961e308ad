//! Filtering of record listings

use crate::core::entity::StoredOrderRecord;

/// Keep the records matching a free-text query
///
/// An empty query keeps everything. Otherwise a record matches when the
/// decimal text of its sale number contains the query, or its customer name
/// contains it case-insensitively. Input order is preserved.
pub fn filter_records<'a>(
    records: &'a [StoredOrderRecord],
    query: &str,
) -> Vec<&'a StoredOrderRecord> {
    let query = query.trim();
    if query.is_empty() {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.order.sale_number.to_string().contains(query)
                || record.order.customer_name.to_lowercase().contains(&needle)
        })
        .collect()
}
