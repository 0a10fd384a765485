//! Question-answering engine: the knowledge base, its index and the
//! tokenizer that built it, behind the four public operations.
use std::sync::Arc;

use tracing::{info, warn};

use crate::answer::{self, Answer};
use crate::index::Index;
use crate::index::search::{self, SearchResult};
use crate::kb::loader::{self, KnowledgeSource, LoadError};
use crate::kb::{KnowledgeBase, Stats};
use crate::tokenizer::Tokenizer;

/// A validated corpus and the index built from it, ready to be installed.
///
/// Building one touches no engine state, so it can run off the task that
/// owns the engine; only [`QaEngine::install`] needs exclusive access.
pub struct Snapshot {
    kb: KnowledgeBase,
    index: Index,
}

impl Snapshot {
    pub fn build(source: &KnowledgeSource, tokenizer: &dyn Tokenizer) -> Result<Self, LoadError> {
        let kb = loader::load(source)?;
        let index = Index::build(&kb, tokenizer);
        Ok(Self { kb, index })
    }
}

/// Owns the current corpus snapshot and the index derived from it.
///
/// `load` needs `&mut self`, so no search can observe a half-built index;
/// callers sharing an engine across tasks wrap it in a `RwLock`.
pub struct QaEngine {
    tokenizer: Arc<dyn Tokenizer>,
    kb: KnowledgeBase,
    index: Index,
}

impl QaEngine {
    /// An engine with an empty corpus. Every query returns nothing until
    /// a successful `load`.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            tokenizer,
            kb: KnowledgeBase::default(),
            index: Index::default(),
        }
    }

    /// Replace the corpus and rebuild the index.
    ///
    /// On error the previous corpus and index stay in place.
    pub fn load(&mut self, source: impl Into<KnowledgeSource>) -> Result<Stats, LoadError> {
        let source = source.into();
        let snapshot = match Snapshot::build(&source, self.tokenizer.as_ref()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Knowledge base load failed: {e}");
                return Err(e);
            }
        };

        let stats = self.install(snapshot);
        match &source {
            KnowledgeSource::File(path) => info!(
                "Loaded knowledge base from {}: {} questions, {} evidences, {} indexed",
                path.display(),
                stats.questions,
                stats.evidences,
                stats.indexed
            ),
            KnowledgeSource::Value(_) => info!(
                "Loaded in-memory knowledge base: {} questions, {} evidences, {} indexed",
                stats.questions, stats.evidences, stats.indexed
            ),
        }
        Ok(stats)
    }

    /// Swap in a prebuilt snapshot. The snapshot must come from this
    /// engine's tokenizer.
    pub fn install(&mut self, snapshot: Snapshot) -> Stats {
        self.kb = snapshot.kb;
        self.index = snapshot.index;
        self.stats()
    }

    /// Handle to the tokenizer, for building snapshots elsewhere.
    #[must_use]
    pub fn tokenizer(&self) -> Arc<dyn Tokenizer> {
        Arc::clone(&self.tokenizer)
    }

    /// Rank evidences by similarity to `query`, at most `top_n` of them.
    pub fn search(&self, query: &str, top_n: usize) -> Vec<SearchResult> {
        search::search(&self.kb, &self.index, self.tokenizer.as_ref(), query, top_n)
    }

    /// Answer `query` from the best-ranked evidence.
    pub fn generate_answer(&self, query: &str, top_n: usize) -> Answer {
        answer::synthesize(&self.search(query, top_n))
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            questions: self.kb.question_count(),
            evidences: self.kb.evidence_count(),
            indexed: self.index.len(),
        }
    }

    #[must_use]
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }
}
