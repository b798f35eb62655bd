//! Thread-safe snapshot wrapper around [`ParserRegistry`].
//!
//! Readers clone an `Arc` to the current registry and work on that snapshot
//! without holding the lock. Writers copy the registry, mutate the copy, and
//! publish it in one swap, so readers see either the old table or the new
//! one, never a mix.

use super::ParserRegistry;
use crate::error::Result;
use crate::mapping::MappingContext;
use crate::parser::QueryParser;
use crate::query::{DataQuery, QueryKind};
use crate::request::SolrRequest;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A [`ParserRegistry`] shared between threads.
#[derive(Debug, Default)]
pub struct SharedParserRegistry {
    current: RwLock<Arc<ParserRegistry>>,
    // Held for the whole read-modify-write of a mutation.
    write: Mutex<()>,
}

impl SharedParserRegistry {
    /// Create a shared registry holding the built-in entries.
    #[must_use]
    pub fn new(mapping_context: Option<Arc<MappingContext>>) -> Self {
        Self::from_registry(ParserRegistry::new(mapping_context))
    }

    /// Share an existing registry.
    #[must_use]
    pub fn from_registry(registry: ParserRegistry) -> Self {
        Self {
            current: RwLock::new(Arc::new(registry)),
            write: Mutex::new(()),
        }
    }

    /// The currently published registry.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ParserRegistry> {
        Arc::clone(&*self.current.read())
    }

    /// Parser for queries of `kind` in the current snapshot.
    #[must_use]
    pub fn parser_for(&self, kind: &QueryKind) -> Arc<dyn QueryParser> {
        Arc::clone(self.snapshot().parser_for(kind))
    }

    /// Translate `query` using the current snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the parser's error.
    pub fn construct_request(
        &self,
        query: &DataQuery,
        domain_type: Option<&str>,
    ) -> Result<SolrRequest> {
        self.snapshot().construct_request(query, domain_type)
    }

    /// See [`ParserRegistry::register_parser`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `parser` is `None`; the published
    /// snapshot is left unchanged.
    pub fn register_parser(
        &self,
        kind: QueryKind,
        parser: Option<Arc<dyn QueryParser>>,
    ) -> Result<()> {
        self.modify(|registry| registry.register_parser(kind, parser))
    }

    /// See [`ParserRegistry::update_mapping_context`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `mapping_context` is `None`; the
    /// published snapshot is left unchanged.
    pub fn update_mapping_context(
        &self,
        mapping_context: Option<Arc<MappingContext>>,
    ) -> Result<()> {
        self.modify(|registry| registry.update_mapping_context(mapping_context))
    }

    fn modify(&self, change: impl FnOnce(&mut ParserRegistry) -> Result<()>) -> Result<()> {
        let _writer = self.write.lock();
        let mut next = ParserRegistry::clone(&self.snapshot());
        change(&mut next)?;
        *self.current.write() = Arc::new(next);
        Ok(())
    }
}

impl From<ParserRegistry> for SharedParserRegistry {
    fn from(registry: ParserRegistry) -> Self {
        Self::from_registry(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::DefaultQueryParser;
    use std::thread;

    #[test]
    fn test_snapshot_is_unaffected_by_later_writes() {
        let shared = SharedParserRegistry::new(None);
        let before = shared.snapshot();

        shared
            .update_mapping_context(Some(Arc::new(MappingContext::new())))
            .unwrap();

        let after = shared.snapshot();
        assert!(before.mapping_context().is_none());
        assert!(after.mapping_context().is_some());
        assert!(!Arc::ptr_eq(before.default_parser(), after.default_parser()));
    }

    #[test]
    fn test_failed_write_keeps_published_snapshot() {
        let shared = SharedParserRegistry::default();
        let before = shared.snapshot();

        let err = shared
            .register_parser(QueryKind::custom("MyQuery", QueryKind::Data), None)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(Arc::ptr_eq(&before, &shared.snapshot()));
    }

    #[test]
    fn test_concurrent_registrations_are_not_lost() {
        let shared = Arc::new(SharedParserRegistry::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let kind = QueryKind::custom(format!("kind-{i}"), QueryKind::Data);
                    let parser: Arc<dyn QueryParser> = Arc::new(DefaultQueryParser::default());
                    shared
                        .register_parser(kind.clone(), Some(Arc::clone(&parser)))
                        .unwrap();
                    // A reader sees this thread's registration once it is published.
                    let published = shared.parser_for(&kind);
                    assert!(Arc::ptr_eq(&published, &parser));
                    assert_eq!(published.name(), "default");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.snapshot().len(), 4 + 8);
    }
}
