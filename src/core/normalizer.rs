//! Normalization of sale lookup responses into a canonical [`Order`]
//!
//! The lookup service is a webhook whose answer shape has drifted over
//! time. Responses are first classified into a [`LookupResponse`], then the
//! selected raw sale object is read field by field with a default for every
//! missing or mistyped value.
//!
//! Recognized shapes, in priority order:
//!
//! 1. `[ {sale}, ... ]`: first element, `NotFound` when empty
//! 2. `{ "data": [ {sale}, ... ] }`: same rule on the wrapped array
//! 3. `{ "numero_lancamento": ..., ... }`: the object itself
//! 4. anything else: `UnrecognizedShape` with the payload attached

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::core::error::{ServiceOrderError, ServiceOrderResult};
use crate::core::order::{Address, LineItem, Order};

/// Field carrying the sale identity
pub const SALE_NUMBER_KEY: &str = "numero_lancamento";

/// Keys under which a wrapped response may hold its sale array
pub const WRAPPER_KEYS: &[&str] = &["data"];

/// Structural classification of a lookup payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupResponse<'a> {
    /// A bare array of sale objects
    Sequence(&'a [Value]),

    /// An object holding the sale array under one of [`WRAPPER_KEYS`]
    Wrapped {
        key: &'static str,
        items: &'a [Value],
    },

    /// A single sale object carrying [`SALE_NUMBER_KEY`]
    Direct(&'a Map<String, Value>),

    /// None of the above
    Unrecognized(&'a Value),
}

impl<'a> LookupResponse<'a> {
    /// Classify a decoded payload
    pub fn classify(payload: &'a Value) -> Self {
        match payload {
            Value::Array(items) => LookupResponse::Sequence(items),
            Value::Object(obj) => {
                let wrapped = WRAPPER_KEYS.iter().find_map(|key| match obj.get(*key) {
                    Some(Value::Array(items)) => Some(LookupResponse::Wrapped { key: *key, items }),
                    _ => None,
                });
                match wrapped {
                    Some(shape) => shape,
                    None if obj.contains_key(SALE_NUMBER_KEY) => LookupResponse::Direct(obj),
                    None => LookupResponse::Unrecognized(payload),
                }
            }
            _ => LookupResponse::Unrecognized(payload),
        }
    }

    /// Short name of the shape for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LookupResponse::Sequence(_) => "sequence",
            LookupResponse::Wrapped { .. } => "wrapped",
            LookupResponse::Direct(_) => "direct",
            LookupResponse::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Turn a lookup payload into exactly zero or one order
///
/// Returns `NotFound` for an empty result set and `UnrecognizedShape` (with
/// `payload` cloned into the error) when no shape matches or the selected
/// object has no usable sale number.
pub fn normalize(payload: &Value) -> ServiceOrderResult<Order> {
    let raw = match LookupResponse::classify(payload) {
        LookupResponse::Sequence(items) | LookupResponse::Wrapped { items, .. } => {
            match items.first() {
                Some(first) => first,
                None => return Err(ServiceOrderError::NotFound),
            }
        }
        LookupResponse::Direct(_) => payload,
        LookupResponse::Unrecognized(_) => {
            return Err(ServiceOrderError::unrecognized(
                "expected a sale array, a wrapped sale array or a sale object",
                payload,
            ));
        }
    };

    let Value::Object(obj) = raw else {
        return Err(ServiceOrderError::unrecognized(
            "selected sale is not an object",
            payload,
        ));
    };

    order_from_object(obj).ok_or_else(|| {
        ServiceOrderError::unrecognized(
            format!("sale has no usable '{}'", SALE_NUMBER_KEY),
            payload,
        )
    })
}

/// Read a raw sale object; `None` only when the sale number is unusable
pub fn order_from_object(obj: &Map<String, Value>) -> Option<Order> {
    let sale_number = obj.get(SALE_NUMBER_KEY).and_then(integer)?;

    let line_items = match obj.get("itens_vendidos") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(position, raw)| line_item(raw, position))
            .collect(),
        _ => Vec::new(),
    };

    Some(Order {
        sale_number,
        operation_type: text(obj, "tipo_operacao"),
        customer_name: text(obj, "nome_cliente"),
        tax_id: text(obj, "cpf_cnpj"),
        address: Address {
            street: text(obj, "endereco_logradouro"),
            number: text(obj, "endereco_numero"),
            complement: optional_text(obj, "endereco_complemento"),
            district: text(obj, "endereco_bairro"),
            city: text(obj, "endereco_cidade"),
            state_code: text(obj, "endereco_estado_uf"),
            postal_code: text(obj, "endereco_cep"),
        },
        line_items,
    })
}

/// Read one line item; a non-object item yields an all-default line
fn line_item(raw: &Value, position: usize) -> LineItem {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let fallback_sequence = u32::try_from(position + 1).unwrap_or(u32::MAX);
    let sequence_number = obj
        .get("sequencia_item")
        .and_then(integer)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n >= 1)
        .unwrap_or(fallback_sequence);

    LineItem {
        sequence_number,
        product_code: text(obj, "codigo_produto"),
        product_name: text(obj, "nome_produto"),
        quantity_sold: obj.get("quantidade_vendida").and_then(number).unwrap_or(0.0),
        unit_price: obj
            .get("valor_unitario")
            .and_then(decimal)
            .filter(|price| !price.is_sign_negative())
            .unwrap_or(Decimal::ZERO),
    }
}

/// String field; numbers keep their decimal text, anything else is empty
pub(crate) fn text(obj: &Map<String, Value>, key: &str) -> String {
    optional_text(obj, key).unwrap_or_default()
}

/// Like [`text`] but keeps "absent" distinct from "empty"
pub(crate) fn optional_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', "."),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}
