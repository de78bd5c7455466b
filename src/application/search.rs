//! Free-text search over fetched documents.
//!
//! Matching is deliberately plain: every lower-cased query token must occur as
//! a substring of the document's title plus its extracted description text.
//! Results keep the corpus order; there is no ranking.

use crate::application::fetcher::ContentFetcher;
use crate::domain::documents::{ContentDocument, ContentKind};

pub const SNIPPET_CHARS: usize = 140;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub document: ContentDocument,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub query: String,
    pub tokens: Vec<String>,
    pub hits: Vec<SearchHit>,
}

impl SearchOutcome {
    /// `true` when the query held no tokens and nothing was searched.
    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split on whitespace and lower-case each token.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// AND-semantics substring match against title and description text.
/// An empty token list never matches.
pub fn matches(document: &ContentDocument, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let haystack = searchable_text(document);
    tokens.iter().all(|token| haystack.contains(token.as_str()))
}

/// Truncate `text` to [`SNIPPET_CHARS`] characters, appending `…` when cut.
pub fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => {
            let mut out = trimmed[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => trimmed.to_string(),
    }
}

/// Filter `corpus` down to the documents matching `query`, in corpus order.
pub fn search_documents(corpus: &[ContentDocument], query: &str) -> Vec<SearchHit> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }
    corpus
        .iter()
        .filter(|document| matches(document, &tokens))
        .map(|document| SearchHit {
            snippet: snippet(&document.description.plain_text()),
            document: document.clone(),
        })
        .collect()
}

fn searchable_text(document: &ContentDocument) -> String {
    format!("{} {}", document.title, document.description.plain_text()).to_lowercase()
}

/// Searches the visible events served by a [`ContentFetcher`].
#[derive(Clone)]
pub struct SearchService {
    fetcher: ContentFetcher,
}

impl SearchService {
    pub fn new(fetcher: ContentFetcher) -> Self {
        Self { fetcher }
    }

    /// Blank queries return immediately without touching the backend.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return SearchOutcome {
                query: query.to_string(),
                tokens,
                hits: Vec::new(),
            };
        }

        let corpus = self.fetcher.collection(ContentKind::Event).await;
        SearchOutcome {
            query: query.to_string(),
            hits: search_documents(&corpus, query),
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::application::backend::{BackendError, ContentBackend, GraphqlQuery};
    use crate::application::fetcher::FetchPolicy;
    use crate::domain::blocks::{ContentBlock, InlineNode, RichText};

    fn doc(id: &str, title: &str, body: &str) -> ContentDocument {
        let mut document = ContentDocument::new(ContentKind::Event, id, title);
        document.description = RichText::new(vec![ContentBlock::paragraph(vec![
            InlineNode::text(body),
        ])]);
        document
    }

    fn corpus() -> Vec<ContentDocument> {
        vec![
            doc("a", "Annual Report 2024", "Results for the fiscal year"),
            doc("b", "Office move", "We moved to the new Osaka office"),
            doc("c", "Seminar", "Annual security seminar for partners"),
        ]
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter()
            .filter_map(|hit| hit.document.public_id())
            .collect()
    }

    #[test]
    fn tokens_are_lowercased_and_split_on_whitespace() {
        assert_eq!(tokenize("  Annual\tREPORT \n"), vec!["annual", "report"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn every_token_must_match_somewhere() {
        let hits = search_documents(&corpus(), "annual report");
        assert_eq!(ids(&hits), vec!["a"]);

        let hits = search_documents(&corpus(), "ANNUAL");
        assert_eq!(ids(&hits), vec!["a", "c"]);
    }

    #[test]
    fn tokens_match_as_substrings_across_title_and_body() {
        let hits = search_documents(&corpus(), "move osak");
        assert_eq!(ids(&hits), vec!["b"]);
    }

    #[test]
    fn blank_queries_match_nothing() {
        assert!(search_documents(&corpus(), "").is_empty());
        assert!(search_documents(&corpus(), " \t ").is_empty());
        assert!(!matches(&corpus()[0], &[]));
    }

    #[test]
    fn results_keep_corpus_order() {
        let mut documents = corpus();
        documents.reverse();
        let hits = search_documents(&documents, "annual");
        assert_eq!(ids(&hits), vec!["c", "a"]);
    }

    #[test]
    fn snippet_truncates_long_text_with_ellipsis() {
        let long = "あ".repeat(200);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), SNIPPET_CHARS + 1);
        assert!(cut.ends_with('…'));

        let exact = "x".repeat(SNIPPET_CHARS);
        assert_eq!(snippet(&exact), exact);
        assert_eq!(snippet("  short  "), "short");
    }

    #[test]
    fn hits_carry_description_snippets() {
        let hits = search_documents(&corpus(), "osaka");
        assert_eq!(hits[0].snippet, "We moved to the new Osaka office");
    }

    struct CountingBackend {
        calls: AtomicUsize,
        payload: Value,
    }

    #[async_trait]
    impl ContentBackend for CountingBackend {
        async fn execute(&self, _query: &GraphqlQuery) -> Result<Value, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    #[tokio::test]
    async fn service_searches_fetched_events() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
            payload: json!({"userEvents": [
                {"documentId": "e1", "Title": "Tokyo expo", "Description": "Booth 12", "Visible": true},
                {"documentId": "e2", "Title": "Holiday notice", "Description": [], "Visible": true}
            ]}),
        });
        let service = SearchService::new(ContentFetcher::new(backend.clone(), FetchPolicy::default()));

        let outcome = service.search("Expo").await;
        assert_eq!(outcome.tokens, vec!["expo"]);
        assert_eq!(ids(&outcome.hits), vec!["e1"]);
        assert_eq!(outcome.hits[0].snippet, "Booth 12");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_query_skips_the_backend() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
            payload: json!({}),
        });
        let service = SearchService::new(ContentFetcher::new(backend.clone(), FetchPolicy::default()));

        let outcome = service.search("   ").await;
        assert!(outcome.is_blank());
        assert!(outcome.hits.is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
