//! Shared test harness for record store testing
//!
//! Provides sample orders and insert payloads plus the
//! `record_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

use rust_decimal::Decimal;
use service_order::core::annotations::AnnotationPair;
use service_order::core::entity::NewOrderRecord;
use service_order::core::order::{Address, LineItem, Order, ServiceType};

#[macro_use]
pub mod record_store_tests;

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// A fully populated order with two items listed out of sequence
pub fn sample_order(sale_number: i64, customer: &str) -> Order {
    Order {
        sale_number,
        operation_type: "VENDA".to_string(),
        customer_name: customer.to_string(),
        tax_id: "123.456.789-00".to_string(),
        address: Address {
            street: "Rua das Flores".to_string(),
            number: "45".to_string(),
            complement: Some("Casa 2".to_string()),
            district: "Centro".to_string(),
            city: "Assú".to_string(),
            state_code: "RN".to_string(),
            postal_code: "59650-000".to_string(),
        },
        line_items: vec![
            LineItem {
                sequence_number: 2,
                product_code: "MS-10".to_string(),
                product_name: "Mesa 6 lugares".to_string(),
                quantity_sold: 1.0,
                unit_price: Decimal::new(129990, 2),
            },
            LineItem {
                sequence_number: 1,
                product_code: "CD-04".to_string(),
                product_name: "Cadeira estofada".to_string(),
                quantity_sold: 6.0,
                unit_price: Decimal::new(24990, 2),
            },
        ],
    }
}

/// Insert payload for [`sample_order`]
pub fn new_record(
    sale_number: i64,
    customer: &str,
    service_type: ServiceType,
    store_note: &str,
    customer_note: &str,
) -> NewOrderRecord {
    NewOrderRecord::new(
        sample_order(sale_number, customer),
        service_type,
        &AnnotationPair::new(store_note, customer_note),
    )
}

/// `n` distinct insert payloads, sale numbers starting at 1000
pub fn sample_batch(n: usize) -> Vec<NewOrderRecord> {
    (0..n)
        .map(|i| {
            let service_type = if i % 2 == 0 {
                ServiceType::Revision
            } else {
                ServiceType::Warranty
            };
            new_record(
                1000 + i as i64,
                &format!("Cliente {}", i),
                service_type,
                &format!("nota {}", i),
                "",
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Assert that a list contains exactly `n` items
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
