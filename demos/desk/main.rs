//! Walks a sale through the desk using in-memory backends
//!
//! Run with `RUST_LOG=service_order=debug cargo run --example desk` to see
//! the workflow events.

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use service_order::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🧾 Service Order Desk\n");

    // The webhook answers in several shapes; register two of them
    let lookup = InMemorySaleLookup::new();
    lookup
        .respond(
            100,
            json!([{
                "numero_lancamento": 100,
                "tipo_operacao": "VENDA",
                "nome_cliente": "Ana Souza",
                "cpf_cnpj": "123.456.789-00",
                "endereco_logradouro": "Rua das Flores",
                "endereco_numero": "45",
                "endereco_complemento": "Casa 2",
                "endereco_bairro": "Centro",
                "endereco_cidade": "Assú",
                "endereco_estado_uf": "RN",
                "endereco_cep": "59650-000",
                "itens_vendidos": [
                    { "sequencia_item": 2, "codigo_produto": "MS-10", "nome_produto": "Mesa 6 lugares", "quantidade_vendida": 1, "valor_unitario": "1299,90" },
                    { "sequencia_item": 1, "codigo_produto": "CD-04", "nome_produto": "Cadeira estofada", "quantidade_vendida": 6, "valor_unitario": 249.9 }
                ]
            }]),
        )
        .respond(
            200,
            json!({ "data": [{ "numero_lancamento": 200, "nome_cliente": "Bruno Lima" }] }),
        );

    let store = InMemoryOrderStore::new();
    let desk = OrderDesk::new(Arc::new(lookup), Arc::new(store));
    let sink = DirectoryPrintSink::new(std::env::temp_dir().join("service-order-demo"))?;

    println!("🔎 Searching sale 100...");
    let mut session = desk.new_order();
    let order = session.search(100).await?;
    println!(
        "   {} - {} item(s) for {}",
        order.document_title(),
        order.line_items.len(),
        order.customer_name
    );

    session.set_service_type(Some(ServiceType::Revision))?;
    session.set_store_note("Conferir montagem da mesa")?;
    session.set_customer_note("Cliente relata cadeira bamba")?;
    let record = session.save().await?;
    println!("✅ Saved {} ({})", record.id, record.annotations.replace('\n', " | "));

    println!("\n🔎 Searching sale 999...");
    if let Err(err) = session.search(999).await {
        println!("   {} [{}]", err, err.error_code());
    }

    println!("\n🔎 Searching sale 200...");
    session.search(200).await?;
    session.set_service_type(Some(ServiceType::Warranty))?;
    session.save().await?;

    println!("\n📋 Stored orders (newest first):");
    for record in desk.list().await? {
        println!(
            "   #{} {} [{}]",
            record.order.sale_number, record.order.customer_name, record.service_type
        );
    }

    println!("\n✏️  Editing sale 100...");
    let mut edit = desk.open(record.id).await?;
    edit.set_customer_note("")?;
    let updated = edit.save().await?.clone();

    let document = desk.print_record(&updated);
    sink.print(&document).await?;
    println!(
        "🖨️  Printed {} to {}",
        document.title,
        sink.path_for(&document).display()
    );

    let matches = desk.search_records("bru").await?;
    println!("\n🔍 Query 'bru' matches {} order(s)", matches.len());

    desk.delete(updated.id).await?;
    println!("🗑️  Deleted {}; {} order(s) left", updated.id, desk.list().await?.len());

    Ok(())
}
