//! Member record → search document projection
//!
//! The index holds a denormalized copy of each member keyed by the same id.
//! Every multi-form field receives the same raw text; the per-field
//! analyzers produce the keyword and n-gram representations at index time.

use tantivy::TantivyDocument;

use crate::domain::MemberRecord;
use crate::search::schema::MemberFields;

pub fn project(fields: &MemberFields, member: &MemberRecord) -> TantivyDocument {
    let mut doc = TantivyDocument::default();
    doc.add_u64(fields.member_id, member.id as u64);

    doc.add_text(fields.username, &member.username);
    doc.add_text(fields.username_kw, &member.username);
    doc.add_text(fields.username_ngram, &member.username);

    doc.add_text(fields.name, &member.name);
    doc.add_text(fields.name_kw, &member.name);
    doc.add_text(fields.name_ngram, &member.name);

    doc.add_text(fields.email, &member.email);
    doc.add_text(fields.email_kw, &member.email);

    if let Some(address) = &member.address {
        doc.add_text(fields.address, address);
        doc.add_text(fields.address_kw, address);
        doc.add_text(fields.address_ngram, address);
    }
    if let Some(detail) = &member.detail_address {
        doc.add_text(fields.detail_address, detail);
    }
    if let Some(phone) = &member.phone_number {
        doc.add_text(fields.phone, phone);
    }
    if let Some(zipcode) = &member.zipcode {
        doc.add_text(fields.zipcode, zipcode);
    }
    for interest in &member.interests {
        doc.add_text(fields.interests, interest);
    }

    doc
}
