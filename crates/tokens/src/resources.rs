//! Language-keyed resource catalog.
//!
//! Stopword lists and lemma tables are looked up by identifier (`"en"`,
//! `"english"`, or any name a caller registers). The catalog is an ordinary
//! value handed to each stage; there is no process-wide default.

use std::sync::Arc;

use fxhash::FxHashMap;

use crate::error::TokenError;
use crate::language::Language;
use crate::lemma::LemmaTable;
use crate::stopwords::StopwordList;

#[derive(Debug, Clone, Default)]
pub struct Resources {
    stopwords: FxHashMap<String, Arc<StopwordList>>,
    lemmas: FxHashMap<String, Arc<LemmaTable>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stopword list under `id`, shadowing any bundled list with
    /// the same identifier.
    pub fn register_stopwords(&mut self, id: impl Into<String>, list: StopwordList) -> &mut Self {
        self.stopwords.insert(key(&id.into()), Arc::new(list));
        self
    }

    pub fn register_lemmas(&mut self, id: impl Into<String>, table: LemmaTable) -> &mut Self {
        self.lemmas.insert(key(&id.into()), Arc::new(table));
        self
    }

    /// Resolves a stopword list: registered lists first, then the bundled
    /// list for a known language.
    pub fn stopwords(&self, id: &str) -> Result<Arc<StopwordList>, TokenError> {
        if let Some(list) = self.stopwords.get(&key(id)) {
            return Ok(Arc::clone(list));
        }
        let language = Language::from_code(id).map_err(|_| {
            TokenError::invalid(format!("unknown stopword list identifier '{id}'"))
        })?;
        Ok(Arc::new(StopwordList::for_language(language)))
    }

    /// Resolves a registered lemma table.
    pub fn lemmas(&self, id: &str) -> Result<Arc<LemmaTable>, TokenError> {
        self.lemmas
            .get(&key(id))
            .cloned()
            .ok_or_else(|| TokenError::invalid(format!("no lemma table registered for '{id}'")))
    }
}

fn key(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_stopwords_by_code() {
        let res = Resources::new();
        let list = res.stopwords("en").unwrap();
        assert!(list.contains("the"));
    }

    #[test]
    fn registered_list_shadows_bundled() {
        let mut res = Resources::new();
        res.register_stopwords("en", StopwordList::from_words(["only"]));
        let list = res.stopwords("EN").unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.contains("only"));
    }

    #[test]
    fn unknown_ids_are_invalid_configuration() {
        let res = Resources::new();
        assert!(matches!(
            res.stopwords("xx"),
            Err(TokenError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            res.lemmas("en"),
            Err(TokenError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn lemma_tables_by_id() {
        let mut res = Resources::new();
        res.register_lemmas("en", LemmaTable::from_pairs([("was", "be")]));
        assert_eq!(res.lemmas("en").unwrap().lookup("was"), Some("be"));
    }
}
