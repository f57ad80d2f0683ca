//! Tantivy schema for member documents
//!
//! Each searchable text field is indexed in up to three parallel forms:
//!
//! - analyzed (`name`): default tokenizer, for phrase and fuzzy matching
//! - keyword (`name_kw`): raw token lowercased, for term/prefix/wildcard
//! - n-gram (`name_ngram`): overlapping 2..3-char grams, for substrings
//!
//! The keyword form is lowercased at index time and query builders lowercase
//! the keyword to match, so exact/prefix/wildcard matching is
//! case-insensitive. `phone` and `zipcode` are keyword-only.

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED,
};
use tantivy::tokenizer::{LowerCaser, NgramTokenizer, RawTokenizer, TextAnalyzer};
use tantivy::Index;

use crate::error::Result;

pub const KEYWORD_TOKENIZER: &str = "member_keyword";
pub const NGRAM_TOKENIZER: &str = "member_ngram";

const NGRAM_MIN: usize = 2;
const NGRAM_MAX: usize = 3;

/// Resolved field handles for the member schema.
#[derive(Debug, Clone, Copy)]
pub struct MemberFields {
    pub member_id: Field,
    pub username: Field,
    pub username_kw: Field,
    pub username_ngram: Field,
    pub name: Field,
    pub name_kw: Field,
    pub name_ngram: Field,
    pub email: Field,
    pub email_kw: Field,
    pub address: Field,
    pub address_kw: Field,
    pub address_ngram: Field,
    pub detail_address: Field,
    pub phone: Field,
    pub zipcode: Field,
    pub interests: Field,
}

pub fn build_schema() -> Schema {
    let mut builder = Schema::builder();

    builder.add_u64_field("member_id", INDEXED | STORED | FAST);

    builder.add_text_field("username", analyzed());
    builder.add_text_field("username_kw", keyword());
    builder.add_text_field("username_ngram", ngram());

    builder.add_text_field("name", analyzed());
    builder.add_text_field("name_kw", keyword());
    builder.add_text_field("name_ngram", ngram());

    builder.add_text_field("email", analyzed());
    builder.add_text_field("email_kw", keyword());

    builder.add_text_field("address", analyzed());
    builder.add_text_field("address_kw", keyword());
    builder.add_text_field("address_ngram", ngram());

    builder.add_text_field("detail_address", analyzed());

    builder.add_text_field("phone", keyword());
    builder.add_text_field("zipcode", keyword());
    builder.add_text_field("interests", keyword());

    builder.build()
}

pub fn fields_from_schema(schema: &Schema) -> Result<MemberFields> {
    Ok(MemberFields {
        member_id: schema.get_field("member_id")?,
        username: schema.get_field("username")?,
        username_kw: schema.get_field("username_kw")?,
        username_ngram: schema.get_field("username_ngram")?,
        name: schema.get_field("name")?,
        name_kw: schema.get_field("name_kw")?,
        name_ngram: schema.get_field("name_ngram")?,
        email: schema.get_field("email")?,
        email_kw: schema.get_field("email_kw")?,
        address: schema.get_field("address")?,
        address_kw: schema.get_field("address_kw")?,
        address_ngram: schema.get_field("address_ngram")?,
        detail_address: schema.get_field("detail_address")?,
        phone: schema.get_field("phone")?,
        zipcode: schema.get_field("zipcode")?,
        interests: schema.get_field("interests")?,
    })
}

/// Register the custom analyzers. Must run on every open, not just create.
pub fn register_tokenizers(index: &Index) -> Result<()> {
    let keyword = TextAnalyzer::builder(RawTokenizer::default())
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(KEYWORD_TOKENIZER, keyword);

    let ngram = TextAnalyzer::builder(NgramTokenizer::new(NGRAM_MIN, NGRAM_MAX, false)?)
        .filter(LowerCaser)
        .build();
    index.tokenizers().register(NGRAM_TOKENIZER, ngram);

    Ok(())
}

fn analyzed() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer("default")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    )
}

fn keyword() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(KEYWORD_TOKENIZER)
            .set_index_option(IndexRecordOption::Basic),
    )
}

fn ngram() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(NGRAM_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqs),
    )
}
