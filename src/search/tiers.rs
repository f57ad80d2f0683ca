//! Ranked query construction for each search tier
//!
//! One tier = one boolean should-query (at least one clause must match)
//! whose clauses carry fixed relative boosts. Higher tiers demand closer
//! matches and pay higher boosts; lower tiers are progressively more
//! permissive.

use tantivy::query::{
    BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, PhraseQuery, Query, RegexQuery, TermQuery,
};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::{Index, Term};

use crate::error::Result;
use crate::search::schema::MemberFields;

/// One ranked-query strategy in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTier {
    Phone,
    Exact,
    Relevance,
    Fuzzy,
    Ngram,
}

impl SearchTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Exact => "exact",
            Self::Relevance => "relevance",
            Self::Fuzzy => "fuzzy",
            Self::Ngram => "ngram",
        }
    }
}

/// Caller-selectable search mode. `Default` runs the relevance tier when a
/// single tier is pinned; the full cascade is a separate entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchMode {
    Default,
    Exact,
    Fuzzy,
    Ngram,
    Phone,
}

impl SearchMode {
    /// The single tier this mode pins.
    pub fn pinned_tier(self) -> SearchTier {
        match self {
            Self::Default => SearchTier::Relevance,
            Self::Exact => SearchTier::Exact,
            Self::Fuzzy => SearchTier::Fuzzy,
            Self::Ngram => SearchTier::Ngram,
            Self::Phone => SearchTier::Phone,
        }
    }
}

type Clause = (Occur, Box<dyn Query>);

/// Build the boosted should-clauses for one tier.
///
/// An empty clause list means the keyword produced nothing searchable for
/// this tier (e.g. punctuation only) and the tier should count as empty.
pub(crate) fn tier_clauses(
    index: &Index,
    fields: &MemberFields,
    tier: SearchTier,
    keyword: &str,
) -> Result<Vec<Clause>> {
    // Keyword-form fields are lowercased by their analyzer at index time;
    // mirror that here so term/prefix/wildcard queries line up.
    let kw = keyword.to_lowercase();
    let mut clauses = Vec::new();

    match tier {
        SearchTier::Phone => {
            clauses.push(term(fields.phone, &kw, 5.0));
            clauses.push(wildcard(fields.phone, &kw, 3.0)?);
        }
        SearchTier::Exact => {
            clauses.push(term(fields.name_kw, &kw, 15.0));
            clauses.push(term(fields.username_kw, &kw, 12.0));
            clauses.push(term(fields.email_kw, &kw, 10.0));
            clauses.extend(phrase(index, fields.name, keyword, 8.0)?);
            clauses.extend(phrase(index, fields.username, keyword, 7.0)?);
            clauses.extend(phrase(index, fields.address, keyword, 5.0)?);
        }
        SearchTier::Relevance => {
            clauses.push(term(fields.name_kw, &kw, 10.0));
            clauses.push(term(fields.username_kw, &kw, 9.0));
            clauses.push(term(fields.email_kw, &kw, 8.0));
            clauses.extend(phrase(index, fields.name, keyword, 7.0)?);
            clauses.extend(phrase(index, fields.username, keyword, 6.0)?);
            clauses.extend(phrase(index, fields.email, keyword, 5.0)?);
            clauses.extend(phrase(index, fields.address, keyword, 4.0)?);
            clauses.push(prefix(fields.name_kw, &kw, 3.0)?);
            clauses.push(prefix(fields.username_kw, &kw, 2.5)?);
            clauses.push(wildcard(fields.name_kw, &kw, 2.0)?);
            clauses.push(wildcard(fields.username_kw, &kw, 1.5)?);
        }
        SearchTier::Fuzzy => {
            clauses.push(wildcard(fields.name_kw, &kw, 5.0)?);
            clauses.push(wildcard(fields.username_kw, &kw, 4.0)?);
            clauses.push(wildcard(fields.email_kw, &kw, 3.0)?);
            clauses.extend(fuzzy(index, fields.name, keyword, 2.5)?);
            clauses.extend(fuzzy(index, fields.username, keyword, 2.0)?);
            clauses.extend(fuzzy(index, fields.address, keyword, 1.5)?);
        }
        SearchTier::Ngram => {
            clauses.extend(ngram_match(index, fields.name_ngram, keyword, 3.0)?);
            clauses.extend(ngram_match(index, fields.username_ngram, keyword, 2.5)?);
            clauses.extend(ngram_match(index, fields.address_ngram, keyword, 2.0)?);
        }
    }

    Ok(clauses)
}

fn boosted(query: Box<dyn Query>, boost: f32) -> Clause {
    (Occur::Should, Box::new(BoostQuery::new(query, boost)))
}

/// Exact term equality on a keyword-form field.
fn term(field: Field, text: &str, boost: f32) -> Clause {
    let query = TermQuery::new(Term::from_field_text(field, text), IndexRecordOption::Basic);
    boosted(Box::new(query), boost)
}

/// Prefix match on a keyword-form field.
fn prefix(field: Field, text: &str, boost: f32) -> Result<Clause> {
    let pattern = format!("{}.*", regex::escape(text));
    let query = RegexQuery::from_pattern(&pattern, field)?;
    Ok(boosted(Box::new(query), boost))
}

/// Substring match on a keyword-form field.
fn wildcard(field: Field, text: &str, boost: f32) -> Result<Clause> {
    let pattern = format!(".*{}.*", regex::escape(text));
    let query = RegexQuery::from_pattern(&pattern, field)?;
    Ok(boosted(Box::new(query), boost))
}

/// Phrase match on an analyzed field. Single-token keywords degrade to a
/// plain term query; empty analyses contribute no clause.
fn phrase(index: &Index, field: Field, keyword: &str, boost: f32) -> Result<Option<Clause>> {
    let tokens = analyzed_tokens(index, field, keyword)?;
    let query: Box<dyn Query> = match tokens.len() {
        0 => return Ok(None),
        1 => Box::new(TermQuery::new(
            Term::from_field_text(field, &tokens[0]),
            IndexRecordOption::Basic,
        )),
        _ => Box::new(PhraseQuery::new(
            tokens
                .iter()
                .map(|t| Term::from_field_text(field, t))
                .collect(),
        )),
    };
    Ok(Some(boosted(query, boost)))
}

/// Edit-distance-tolerant match on an analyzed field, one fuzzy term per
/// analyzed token, distance scaled to token length.
fn fuzzy(index: &Index, field: Field, keyword: &str, boost: f32) -> Result<Option<Clause>> {
    let tokens = analyzed_tokens(index, field, keyword)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut subqueries: Vec<Clause> = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let distance = auto_fuzzy_distance(token);
        let query = FuzzyTermQuery::new(Term::from_field_text(field, token), distance, true);
        subqueries.push((Occur::Should, Box::new(query)));
    }

    let query: Box<dyn Query> = if subqueries.len() == 1 {
        subqueries.pop().map(|(_, q)| q).unwrap()
    } else {
        Box::new(BooleanQuery::new(subqueries))
    };
    Ok(Some(boosted(query, boost)))
}

/// Substring-style match against an n-gram form: the keyword's grams are
/// OR-ed as terms, so any overlapping gram hits.
fn ngram_match(index: &Index, field: Field, keyword: &str, boost: f32) -> Result<Option<Clause>> {
    let grams = analyzed_tokens(index, field, keyword)?;
    if grams.is_empty() {
        return Ok(None);
    }

    let mut subqueries: Vec<Clause> = Vec::with_capacity(grams.len());
    for gram in &grams {
        let query = TermQuery::new(
            Term::from_field_text(field, gram),
            IndexRecordOption::WithFreqs,
        );
        subqueries.push((Occur::Should, Box::new(query)));
    }

    let query: Box<dyn Query> = if subqueries.len() == 1 {
        subqueries.pop().map(|(_, q)| q).unwrap()
    } else {
        Box::new(BooleanQuery::new(subqueries))
    };
    Ok(Some(boosted(query, boost)))
}

/// Run a keyword through the analyzer registered for `field`.
fn analyzed_tokens(index: &Index, field: Field, text: &str) -> Result<Vec<String>> {
    let mut analyzer = index.tokenizer_for_field(field)?;
    let mut stream = analyzer.token_stream(text);
    let mut tokens = Vec::new();
    stream.process(&mut |token| tokens.push(token.text.clone()));
    Ok(tokens)
}

/// Edit distance scaled to token length: short tokens must match exactly,
/// mid-length tokens tolerate one edit, long tokens two.
fn auto_fuzzy_distance(token: &str) -> u8 {
    match token.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::schema::{build_schema, fields_from_schema, register_tokenizers};

    fn test_index() -> (Index, MemberFields) {
        let schema = build_schema();
        let fields = fields_from_schema(&schema).unwrap();
        let index = Index::create_in_ram(schema);
        register_tokenizers(&index).unwrap();
        (index, fields)
    }

    #[test]
    fn auto_distance_scales_with_length() {
        assert_eq!(auto_fuzzy_distance("ab"), 0);
        assert_eq!(auto_fuzzy_distance("abc"), 1);
        assert_eq!(auto_fuzzy_distance("abcde"), 1);
        assert_eq!(auto_fuzzy_distance("abcdef"), 2);
    }

    #[test]
    fn every_tier_builds_clauses_for_a_plain_keyword() {
        let (index, fields) = test_index();
        for tier in [
            SearchTier::Phone,
            SearchTier::Exact,
            SearchTier::Relevance,
            SearchTier::Fuzzy,
            SearchTier::Ngram,
        ] {
            let clauses = tier_clauses(&index, &fields, tier, "alice").unwrap();
            assert!(!clauses.is_empty(), "tier {} built no clauses", tier.as_str());
        }
    }

    #[test]
    fn ngram_tier_is_empty_for_punctuation_only_keyword() {
        let (index, fields) = test_index();
        let clauses = tier_clauses(&index, &fields, SearchTier::Ngram, "!").unwrap();
        assert!(clauses.is_empty());
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let (index, fields) = test_index();
        // Would panic or error without escaping; must build cleanly.
        let clauses = tier_clauses(&index, &fields, SearchTier::Relevance, "a.b*c").unwrap();
        assert!(!clauses.is_empty());
    }

    #[test]
    fn mode_pins_expected_tier() {
        assert_eq!(SearchMode::Default.pinned_tier(), SearchTier::Relevance);
        assert_eq!(SearchMode::Exact.pinned_tier(), SearchTier::Exact);
        assert_eq!(SearchMode::Fuzzy.pinned_tier(), SearchTier::Fuzzy);
        assert_eq!(SearchMode::Ngram.pinned_tier(), SearchTier::Ngram);
        assert_eq!(SearchMode::Phone.pinned_tier(), SearchTier::Phone);
    }
}
