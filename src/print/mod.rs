//! Print rendering and delivery
//!
//! A [`PrintDocument`] is turned into text by [`TextRenderer`] and handed to
//! a [`PrintSink`] under the document title (`OS_<sale number>`). The host
//! decides what printing means: a spool directory, a browser print dialog,
//! or a buffer in tests.

use anyhow::{Context as _, Result, anyhow};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tera::{Context, Tera};
use tracing::info;

use crate::core::document::PrintDocument;

const TEMPLATE_NAME: &str = "service_order.txt";

const TEMPLATE: &str = r#"{{ store.name }}
{{ store.address }} - {{ store.city }}
{{ store.phone }} | {{ store.email }}

{{ header.label }} {{ header.number }}
Emitida em {{ issued_on }}

CLIENTE
Nome: {{ customer.name }}
CPF/CNPJ: {{ customer.tax_id }}
Endereço: {{ customer.street_line }}
{% if customer.complement %}Complemento: {{ customer.complement }}
{% endif %}Bairro: {{ customer.district_line }}
CEP: {{ customer.postal_code }}

ITENS
{% for item in items %}{{ item.code }}  {{ item.name }}
{% endfor %}
SERVIÇO
Tipo: {{ service.service_type }}
Observação da loja: {{ service.store_note }}
Observação do cliente: {{ service.customer_note }}


______________________________
{{ signature.caption }}
{{ signature.signer }}

{{ footer }}
"#;

/// Renders documents to plain text
pub struct TextRenderer {
    tera: Tera,
}

impl TextRenderer {
    pub fn new() -> Result<Self> {
        Self::with_template(TEMPLATE)
    }

    /// Use a custom Tera template
    ///
    /// The context holds every [`PrintDocument`] field plus `issued_on`.
    pub fn with_template(template: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)
            .context("invalid print template")?;
        Ok(Self { tera })
    }

    pub fn render(&self, document: &PrintDocument) -> Result<String> {
        let mut context =
            Context::from_serialize(document).context("cannot build print context")?;
        context.insert("issued_on", &document.issued_on());

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| anyhow!("Failed to render {}: {}", document.title, e))
    }
}

/// Destination for rendered documents
#[async_trait]
pub trait PrintSink: Send + Sync {
    /// Print `document`; its title names the print job
    async fn print(&self, document: &PrintDocument) -> Result<()>;
}

/// A document as received by [`MemoryPrintSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintedDocument {
    pub title: String,
    pub text: String,
}

/// Keeps rendered documents in memory
#[derive(Clone)]
pub struct MemoryPrintSink {
    renderer: Arc<TextRenderer>,
    printed: Arc<RwLock<Vec<PrintedDocument>>>,
}

impl MemoryPrintSink {
    pub fn new() -> Result<Self> {
        Ok(Self {
            renderer: Arc::new(TextRenderer::new()?),
            printed: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Everything printed so far, oldest first
    pub fn printed(&self) -> Vec<PrintedDocument> {
        self.printed
            .read()
            .map(|printed| printed.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PrintSink for MemoryPrintSink {
    async fn print(&self, document: &PrintDocument) -> Result<()> {
        let text = self.renderer.render(document)?;
        let mut printed = self
            .printed
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        printed.push(PrintedDocument {
            title: document.title.clone(),
            text,
        });
        Ok(())
    }
}

/// Writes each document to `<dir>/<title>.txt`, replacing earlier prints
pub struct DirectoryPrintSink {
    renderer: TextRenderer,
    dir: PathBuf,
}

impl DirectoryPrintSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            renderer: TextRenderer::new()?,
            dir: dir.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, document: &PrintDocument) -> PathBuf {
        self.dir.join(format!("{}.txt", document.title))
    }
}

#[async_trait]
impl PrintSink for DirectoryPrintSink {
    async fn print(&self, document: &PrintDocument) -> Result<()> {
        let text = self.renderer.render(document)?;
        let path = self.path_for(document);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("cannot create {}", self.dir.display()))?;
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("cannot write {}", path.display()))?;

        info!(title = %document.title, path = %path.display(), "Service order printed");
        Ok(())
    }
}
