//! Canonical sale entity built from a lookup response
//!
//! Field names on the wire are the legacy column names of the stored row
//! (`numero_lancamento`, `nome_cliente`, ...). The Rust names describe the
//! meaning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ValidationError;

/// One product line of a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Position of the line in the sale, starting at 1
    #[serde(rename = "sequencia_item")]
    pub sequence_number: u32,

    #[serde(rename = "codigo_produto")]
    pub product_code: String,

    #[serde(rename = "nome_produto")]
    pub product_name: String,

    #[serde(rename = "quantidade_vendida")]
    pub quantity_sold: f64,

    /// Never negative
    #[serde(rename = "valor_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// Customer delivery address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "endereco_logradouro")]
    pub street: String,

    #[serde(rename = "endereco_numero")]
    pub number: String,

    /// `None` means "no complement", which prints differently from `Some("")`
    #[serde(rename = "endereco_complemento", default)]
    pub complement: Option<String>,

    #[serde(rename = "endereco_bairro")]
    pub district: String,

    #[serde(rename = "endereco_cidade")]
    pub city: String,

    #[serde(rename = "endereco_estado_uf")]
    pub state_code: String,

    #[serde(rename = "endereco_cep")]
    pub postal_code: String,
}

/// A sale as returned by the lookup, before any service data is attached
///
/// Orders are never mutated once built; service type and annotations are
/// tracked next to them by the lifecycle sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// External lookup key, unique per sale
    #[serde(rename = "numero_lancamento")]
    pub sale_number: i64,

    #[serde(rename = "tipo_operacao")]
    pub operation_type: String,

    #[serde(rename = "nome_cliente")]
    pub customer_name: String,

    #[serde(rename = "cpf_cnpj")]
    pub tax_id: String,

    #[serde(flatten)]
    pub address: Address,

    /// Lines in the order received; empty when the sale carried none
    #[serde(rename = "itens_vendidos", default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// An order carrying only its identity, every other field defaulted
    pub fn with_sale_number(sale_number: i64) -> Self {
        Self {
            sale_number,
            operation_type: String::new(),
            customer_name: String::new(),
            tax_id: String::new(),
            address: Address::default(),
            line_items: Vec::new(),
        }
    }

    /// Line items sorted by sequence number
    ///
    /// The sort is stable, so lines sharing a sequence number keep their
    /// received order.
    pub fn items_in_sequence(&self) -> Vec<&LineItem> {
        let mut items: Vec<&LineItem> = self.line_items.iter().collect();
        items.sort_by_key(|item| item.sequence_number);
        items
    }

    /// Title used when handing a document to the print trigger
    pub fn document_title(&self) -> String {
        format!("OS_{}", self.sale_number)
    }
}

/// Kind of service requested for a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Revisão")]
    Revision,
    #[serde(rename = "Garantia")]
    Warranty,
}

impl ServiceType {
    /// Every selectable service type, in display order
    pub const ALL: [ServiceType; 2] = [ServiceType::Revision, ServiceType::Warranty];

    /// The label stored in `tipo_servico`
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Revision => "Revisão",
            ServiceType::Warranty => "Garantia",
        }
    }

    /// Parse a stored label; unknown or empty labels yield `None`
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == label.trim())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::from_label(label).ok_or_else(|| ValidationError::UnknownServiceType {
            label: label.to_string(),
        })
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(seq: u32, code: &str) -> LineItem {
        LineItem {
            sequence_number: seq,
            product_code: code.to_string(),
            product_name: format!("Produto {}", code),
            quantity_sold: 1.0,
            unit_price: Decimal::new(1990, 2),
        }
    }

    #[test]
    fn test_items_in_sequence_is_stable() {
        let mut order = Order::with_sale_number(7);
        order.line_items = vec![item(2, "B"), item(1, "A"), item(2, "C")];

        let codes: Vec<&str> = order
            .items_in_sequence()
            .iter()
            .map(|i| i.product_code.as_str())
            .collect();
        assert_eq!(codes, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_order_serializes_flat_with_column_names() {
        let mut order = Order::with_sale_number(42);
        order.customer_name = "Ana".to_string();
        order.address.city = "Assú".to_string();

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["numero_lancamento"], json!(42));
        assert_eq!(value["nome_cliente"], json!("Ana"));
        assert_eq!(value["endereco_cidade"], json!("Assú"));
        assert_eq!(value["endereco_complemento"], json!(null));
        assert_eq!(value["itens_vendidos"], json!([]));
    }

    #[test]
    fn test_service_type_labels() {
        assert_eq!(ServiceType::from_label("Revisão"), Some(ServiceType::Revision));
        assert_eq!(ServiceType::from_label(" Garantia "), Some(ServiceType::Warranty));
        assert_eq!(ServiceType::from_label(""), None);
        assert_eq!(ServiceType::from_label("Montagem"), None);
        assert_eq!(ServiceType::Warranty.to_string(), "Garantia");
        assert_eq!("Garantia".parse::<ServiceType>(), Ok(ServiceType::Warranty));
        assert_eq!(
            "Montagem".parse::<ServiceType>(),
            Err(ValidationError::UnknownServiceType {
                label: "Montagem".to_string()
            })
        );
        assert_eq!(
            serde_json::to_value(ServiceType::Revision).unwrap(),
            json!("Revisão")
        );
    }

    #[test]
    fn test_document_title() {
        assert_eq!(Order::with_sale_number(100).document_title(), "OS_100");
    }
}
