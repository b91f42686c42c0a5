//! A host answering from data embedded in the input document.

use altcode_core::raw::{RawDocument, RawVariable};
use altcode_core::{DesignHost, HostError, ResolvedVariable};
use futures::future::{self, BoxFuture};
use std::collections::HashMap;

/// Serves `variables` and `vectorMarkup` of a [`RawDocument`]. Used by the
/// CLI and in tests; a plugin host talks to the design tool instead.
#[derive(Debug, Clone, Copy)]
pub struct StaticHost<'a> {
    variables: &'a HashMap<String, RawVariable>,
    vectors: &'a HashMap<String, String>,
}

impl<'a> StaticHost<'a> {
    pub fn new(doc: &'a RawDocument) -> Self {
        Self {
            variables: &doc.variables,
            vectors: &doc.vector_markup,
        }
    }
}

impl DesignHost for StaticHost<'_> {
    fn resolve_variable<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, Result<ResolvedVariable, HostError>> {
        let result = self
            .variables
            .get(id)
            .map(|var| ResolvedVariable {
                name: var.name.clone(),
                value: var.value,
            })
            .ok_or_else(|| HostError::NotFound(id.to_string()));
        Box::pin(future::ready(result))
    }

    fn export_vector_markup<'a>(
        &'a self,
        source_id: &'a str,
    ) -> BoxFuture<'a, Result<String, HostError>> {
        let result = self
            .vectors
            .get(source_id)
            .cloned()
            .ok_or_else(|| HostError::NotFound(source_id.to_string()));
        Box::pin(future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use altcode_core::Color;

    fn document() -> RawDocument {
        let mut doc = RawDocument::default();
        doc.variables.insert(
            "v:1".to_string(),
            RawVariable {
                name: "brand/primary".to_string(),
                value: Color::from_rgb8(0x3b, 0x82, 0xf6),
            },
        );
        doc.vector_markup
            .insert("1:2".to_string(), "<svg></svg>".to_string());
        doc
    }

    #[tokio::test]
    async fn test_answers_from_document() {
        let doc = document();
        let host = StaticHost::new(&doc);

        let var = host.resolve_variable("v:1").await.unwrap();
        assert_eq!(var.name, "brand/primary");
        assert_eq!(host.export_vector_markup("1:2").await.unwrap(), "<svg></svg>");
    }

    #[tokio::test]
    async fn test_missing_entries_are_not_found() {
        let doc = document();
        let host = StaticHost::new(&doc);
        assert!(matches!(
            host.resolve_variable("v:9").await,
            Err(HostError::NotFound(id)) if id == "v:9"
        ));
        assert!(host.export_vector_markup("9:9").await.is_err());
    }
}
