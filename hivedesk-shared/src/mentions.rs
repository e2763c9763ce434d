/// `@username` extraction from chat messages
///
/// A mention is an `@` immediately followed by one or more word characters
/// (ASCII letters, digits, underscore) — the same token rule usernames obey.
/// Extraction is purely lexical; whether a mentioned name refers to an
/// actual organization member is decided later against the database.

use std::collections::HashSet;

/// Extracts mentioned usernames from a message body
///
/// Returns each username at most once, in order of first appearance, without
/// the leading `@`. An `@` not followed by a word character is ignored.
///
/// # Example
///
/// ```
/// use hivedesk_shared::mentions::extract_mentions;
///
/// let mentions = extract_mentions("ping @alice and @bob — @alice again");
/// assert_eq!(mentions, vec!["alice", "bob"]);
/// ```
pub fn extract_mentions(content: &str) -> Vec<String> {
    let mut mentions = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let bytes = content.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'@' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && is_word_byte(bytes[end]) {
                end += 1;
            }

            if end > start {
                let username = &content[start..end];
                if seen.insert(username) {
                    mentions.push(username.to_string());
                }
            }

            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }

    mentions
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_mention() {
        assert_eq!(extract_mentions("hello @alice"), vec!["alice"]);
    }

    #[test]
    fn test_multiple_mentions() {
        assert_eq!(
            extract_mentions("@alice please sync with @bob_2"),
            vec!["alice", "bob_2"]
        );
    }

    #[test]
    fn test_duplicate_mentions_collapse() {
        assert_eq!(extract_mentions("@alice @alice @alice"), vec!["alice"]);
    }

    #[test]
    fn test_mention_mid_word_punctuation() {
        assert_eq!(extract_mentions("(@alice), see @bob."), vec!["alice", "bob"]);
    }

    #[test]
    fn test_bare_at_ignored() {
        assert!(extract_mentions("meet @ noon").is_empty());
        assert!(extract_mentions("@").is_empty());
    }

    #[test]
    fn test_no_mentions() {
        assert!(extract_mentions("no mentions here").is_empty());
        assert!(extract_mentions("").is_empty());
    }

    #[test]
    fn test_email_is_still_a_mention() {
        // Matches the token rule: "user@host.com" mentions "host".
        assert_eq!(extract_mentions("mail user@host.com"), vec!["host"]);
    }
}
