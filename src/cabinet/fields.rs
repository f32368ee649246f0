//! Index field set construction for document creation.

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use super::types::IndexField;

/// Company index field key.
pub const FIELD_COMPANY: &str = "COMPANY";
/// Contact index field key.
pub const FIELD_CONTACT: &str = "CONTACT";
/// Birthday index field key.
pub const FIELD_BIRTHDAY: &str = "BIRTHDAY";
/// Content-type index field key.
pub const FIELD_EXTENSION: &str = "DWEXTENSION";

/// Wire format for date-valued index fields (`yyyy-MM-dd`).
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Assemble the index field set attached to a newly created document.
///
/// Field names are fixed well-known keys; the birthday is normalized to `yyyy-MM-dd` and the
/// content type travels alongside the user-supplied metadata.
pub fn build_index_fields(
    company: &str,
    contact: &str,
    birthday: Date,
    content_type: &str,
) -> Vec<IndexField> {
    let birthday = birthday
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| birthday.to_string());

    vec![
        IndexField::new(FIELD_COMPANY, company),
        IndexField::new(FIELD_CONTACT, contact),
        IndexField::new(FIELD_BIRTHDAY, birthday),
        IndexField::new(FIELD_EXTENSION, content_type),
    ]
}
