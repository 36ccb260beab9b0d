//! Extractors for the three LINE record kinds
//!
//! Each extractor owns one prepared statement against a LINE database and
//! yields canonical records lazily through [`crate::cursor::RecordStream`].

pub mod calllogs;
pub mod contacts;
pub mod messages;

pub use calllogs::CallLogsExtractor;
pub use contacts::ContactsExtractor;
pub use messages::MessagesExtractor;

/// Header placed between a message body and its attachment references
pub const ATTACHMENT_LIST_HEADER: &str = "\n\n------------Attachments------------\n";

/// Convert a millisecond epoch string to whole seconds.
///
/// Returns `None` for NULL or non-integer input so the caller can fall back
/// to its default.
#[must_use]
pub fn millis_to_seconds(raw: Option<&str>) -> Option<i64> {
    let millis = raw?.trim().parse::<i64>().ok()?;
    Some(millis.div_euclid(1000))
}

/// Append attachment references to a message body, one per line
#[must_use]
pub fn append_attachment_list(body: &str, attachments: &[&str]) -> String {
    let attachments: Vec<&str> = attachments.iter().copied().filter(|a| !a.is_empty()).collect();
    if attachments.is_empty() {
        return body.to_string();
    }
    format!("{body}{ATTACHMENT_LIST_HEADER}{}", attachments.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_millis_to_seconds() {
        assert_eq!(millis_to_seconds(Some("1609459200000")), Some(1_609_459_200));
        assert_eq!(millis_to_seconds(Some("1609459200999")), Some(1_609_459_200));
        assert_eq!(millis_to_seconds(Some(" 1000 ")), Some(1));
        assert_eq!(millis_to_seconds(Some("-1500")), Some(-2));
    }

    #[test]
    fn test_millis_to_seconds_rejects_garbage() {
        assert_eq!(millis_to_seconds(None), None);
        assert_eq!(millis_to_seconds(Some("")), None);
        assert_eq!(millis_to_seconds(Some("yesterday")), None);
        assert_eq!(millis_to_seconds(Some("12.5")), None);
    }

    #[test]
    fn test_append_attachment_list() {
        assert_eq!(
            append_attachment_list("hi", &["file:///a.jpg"]),
            "hi\n\n------------Attachments------------\nfile:///a.jpg"
        );
        assert_eq!(
            append_attachment_list("", &["file:///a.jpg", "file:///b.mp4"]),
            "\n\n------------Attachments------------\nfile:///a.jpg\nfile:///b.mp4"
        );
        assert_eq!(append_attachment_list("hi", &[]), "hi");
    }

    proptest! {
        #[test]
        fn prop_millis_divide_by_thousand(millis in 0i64..=i64::MAX) {
            prop_assert_eq!(millis_to_seconds(Some(&millis.to_string())), Some(millis / 1000));
        }

        #[test]
        fn prop_non_numeric_never_parses(raw in "[a-zA-Z:/ -]*[a-zA-Z:/]+[a-zA-Z:/ -]*") {
            prop_assert_eq!(millis_to_seconds(Some(&raw)), None);
        }
    }
}
