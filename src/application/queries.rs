//! GraphQL documents issued by the content fetcher.

use std::num::NonZeroU32;

use serde_json::json;

use crate::application::backend::GraphqlQuery;
use crate::domain::documents::{ContentKind, LookupKey, SortOrder};

/// Which identifier a single-document query is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    DocumentId,
    LegacyNumericId,
}

impl LookupStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupStrategy::DocumentId => "document_id",
            LookupStrategy::LegacyNumericId => "legacy_id",
        }
    }

    fn argument(self) -> &'static str {
        match self {
            LookupStrategy::DocumentId => "documentId",
            LookupStrategy::LegacyNumericId => "id",
        }
    }

    fn operation_suffix(self) -> &'static str {
        match self {
            LookupStrategy::DocumentId => "ByDocumentId",
            LookupStrategy::LegacyNumericId => "ByNumericId",
        }
    }
}

/// Parameters of a collection query. Visibility filtering is not optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    pub kind: ContentKind,
    pub sort: SortOrder,
    pub limit: NonZeroU32,
}

impl ListRequest {
    pub fn new(kind: ContentKind, limit: NonZeroU32) -> Self {
        Self {
            kind,
            sort: kind.default_sort(),
            limit,
        }
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// Build the single-document query for `kind`, keyed by `strategy`.
pub fn single_document(kind: ContentKind, key: &LookupKey, strategy: LookupStrategy) -> GraphqlQuery {
    let operation_name = format!("{}{}", kind.operation_prefix(), strategy.operation_suffix());
    let query = format!(
        "query {operation_name}($id: ID!) {{\n  {field}({argument}: $id) {{\n{selection}  }}\n}}\n",
        field = kind.single_field(),
        argument = strategy.argument(),
        selection = selection_block(kind),
    );

    GraphqlQuery {
        operation_name,
        query,
        variables: json!({ "id": key.as_str() }),
    }
}

/// Build the visible-only, sorted, capped collection query.
pub fn collection(request: &ListRequest) -> GraphqlQuery {
    let kind = request.kind;
    let operation_name = format!("{}List", kind.operation_prefix());
    let query = format!(
        "query {operation_name}($limit: Int!) {{\n  {field}(\n    filters: {{ Visible: {{ eq: true }} }}\n    sort: [\"{sort}\"]\n    pagination: {{ limit: $limit }}\n  ) {{\n{selection}  }}\n}}\n",
        field = kind.collection_field(),
        sort = request.sort.as_graphql(),
        selection = selection_block(kind),
    );

    GraphqlQuery {
        operation_name,
        query,
        variables: json!({ "limit": request.limit.get() }),
    }
}

fn selection_block(kind: ContentKind) -> String {
    kind.selection()
        .iter()
        .map(|field| format!("    {field}\n"))
        .collect()
}
