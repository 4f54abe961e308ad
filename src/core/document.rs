//! Print view materialization
//!
//! [`materialize`] turns an order, its service type and its notes into a
//! fully resolved [`PrintDocument`]. Every field comes from the inputs, the
//! fixed store identity or the issuance timestamp; nothing is looked up.
//! Prices and quantities are deliberately not part of the printed document.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::core::annotations::AnnotationPair;
use crate::core::order::Order;

/// Rendered in place of an empty service field
pub const PLACEHOLDER: &str = "—";

/// Identity of the issuing store, printed on every document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreIdentity {
    pub name: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub tax_id: &'static str,
}

pub const STORE_IDENTITY: StoreIdentity = StoreIdentity {
    name: "AVELLOZ ASSU",
    address: "Av. Senador João Câmara, 1236 – Dom Eliseu",
    city: "ASSÚ/RN",
    phone: "(84) 9 8683-9734",
    email: "avelloz@lojaodosmoveis.shop",
    tax_id: "24.413.345/0001-35",
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentHeader {
    pub label: &'static str,
    /// `#<sale number>`
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerBlock {
    pub name: String,
    pub tax_id: String,
    /// `<street>, <number>`
    pub street_line: String,
    /// Absent when the sale had no complement, `Some("")` when it was blank
    pub complement: Option<String>,
    /// `<district> - <city>/<state>`
    pub district_line: String,
    pub postal_code: String,
}

/// One printed item line: code and name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintLine {
    pub code: String,
    pub name: String,
}

/// Service fields; empty inputs are replaced by [`PLACEHOLDER`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceBlock {
    pub service_type: String,
    pub store_note: String,
    pub customer_note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub caption: &'static str,
    pub signer: &'static str,
}

/// A print-ready service order document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintDocument {
    /// Title handed to the print trigger, `OS_<sale number>`
    pub title: String,
    pub header: DocumentHeader,
    pub store: StoreIdentity,
    pub customer: CustomerBlock,
    /// In sequence-number order
    pub items: Vec<PrintLine>,
    pub service: ServiceBlock,
    pub signature: SignatureBlock,
    pub footer: String,
    pub issued_at: DateTime<Utc>,
}

impl PrintDocument {
    /// Issuance date as printed, `dd/mm/yyyy` in local time
    pub fn issued_on(&self) -> String {
        self.issued_at
            .with_timezone(&Local)
            .format("%d/%m/%Y")
            .to_string()
    }
}

/// Materialize a document stamped with the current time
pub fn materialize(order: &Order, service_type: &str, notes: &AnnotationPair) -> PrintDocument {
    materialize_at(order, service_type, notes, Utc::now())
}

/// Materialize a document with an explicit issuance timestamp
pub fn materialize_at(
    order: &Order,
    service_type: &str,
    notes: &AnnotationPair,
    issued_at: DateTime<Utc>,
) -> PrintDocument {
    let address = &order.address;

    PrintDocument {
        title: order.document_title(),
        header: DocumentHeader {
            label: "Ordem de Serviço",
            number: format!("#{}", order.sale_number),
        },
        store: STORE_IDENTITY,
        customer: CustomerBlock {
            name: order.customer_name.clone(),
            tax_id: order.tax_id.clone(),
            street_line: format!("{}, {}", address.street, address.number),
            complement: address.complement.clone(),
            district_line: format!(
                "{} - {}/{}",
                address.district, address.city, address.state_code
            ),
            postal_code: address.postal_code.clone(),
        },
        items: order
            .items_in_sequence()
            .into_iter()
            .map(|item| PrintLine {
                code: item.product_code.clone(),
                name: item.product_name.clone(),
            })
            .collect(),
        service: ServiceBlock {
            service_type: or_placeholder(service_type),
            store_note: or_placeholder(&notes.store_note),
            customer_note: or_placeholder(&notes.customer_note),
        },
        signature: SignatureBlock {
            caption: "Assinatura do Responsável",
            signer: STORE_IDENTITY.name,
        },
        footer: format!(
            "{}, {} | CNPJ: {}",
            STORE_IDENTITY.address, STORE_IDENTITY.city, STORE_IDENTITY.tax_id
        ),
        issued_at,
    }
}

fn or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}
