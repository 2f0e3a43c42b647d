//! Error message texts recorded by the parse driver.

/// Recorded when the document has more root nodes than renderers can afford.
pub const TOO_DEEP: &str =
    "Stack level would go too deep. You are probably using too many nested elements.";

/// Recorded when a between-as-parameter tag receives a tag before any text.
pub const BETWEEN_NOT_PLAIN_TEXT: &str = "between parameter must be plain text";

/// What was offered to a parent with a restricted child set.
#[derive(Debug, Clone, Copy)]
pub enum Offending<'a> {
    Tag(&'a str),
    Text(&'a str),
}

/// Renders `[a], [b] and [c]`.
pub fn tag_sentence(tags: &[String]) -> String {
    match tags {
        [] => String::new(),
        [only] => format!("[{only}]"),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(|t| format!("[{t}]"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{init} and [{last}]")
        }
    }
}

pub fn only_in(tag: &str, allowed: &[String], parent: Option<&str>) -> String {
    let mut message = format!("[{tag}] can only be used in {}", tag_sentence(allowed));
    if let Some(parent) = parent {
        message.push_str(&format!(", so using it in a [{parent}] tag is not allowed"));
    }
    message
}

pub fn only_allow(parent: &str, allowed: &[String], offending: Offending<'_>) -> String {
    let subject = match offending {
        Offending::Tag(tag) => format!("[{tag}]"),
        Offending::Text(text) => format!("\"{text}\""),
    };
    if allowed.is_empty() {
        format!("[{parent}] can not contain other tags, so {subject} is not allowed")
    } else {
        format!(
            "[{parent}] can only contain {} tags, so {subject} is not allowed",
            tag_sentence(allowed)
        )
    }
}

pub fn missing_param(tag: &str, token: &str) -> String {
    format!("Tag [{tag}] must have '{token}' parameter")
}

pub fn unknown_param(tag: &str, param: &str) -> String {
    format!("Tag [{tag}] doesn't have a '{param}' parameter")
}

pub fn unmatched_closer(tag: &str) -> String {
    format!("Closing tag [/{tag}] doesn't match an opening tag")
}

pub fn mismatched_closer(tag: &str, parent: &str) -> String {
    format!("Closing tag [/{tag}] doesn't match [{parent}]")
}

/// `pending` selects the variant for a placeholder whose type is still unknown.
pub fn no_text_between(tag: &str, pending: bool) -> String {
    let message = format!("No text between [{tag}] and [/{tag}] tags.");
    if pending {
        format!("Cannot determine multi-tag type: {message}")
    } else {
        message
    }
}

pub fn unknown_multi_tag(tag: &str) -> String {
    format!("Unknown multi-tag type for [{tag}]")
}

pub fn not_closed(tag: &str) -> String {
    format!("[{tag}] not closed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[rstest]
    #[case::empty(&[], "")]
    #[case::one(&["item"], "[item]")]
    #[case::two(&["li", "*"], "[li] and [*]")]
    #[case::three(&["list", "ul", "ol"], "[list], [ul] and [ol]")]
    fn test_tag_sentence(#[case] tags: &[&str], #[case] expected: &str) {
        assert_eq!(tag_sentence(&names(tags)), expected);
    }

    #[test]
    fn test_only_in() {
        let allowed = names(&["list", "ul", "ol"]);
        assert_eq!(
            only_in("*", &allowed, None),
            "[*] can only be used in [list], [ul] and [ol]"
        );
        assert_eq!(
            only_in("*", &allowed, Some("b")),
            "[*] can only be used in [list], [ul] and [ol], so using it in a [b] tag is not allowed"
        );
    }

    #[test]
    fn test_only_allow() {
        let allowed = names(&["*", "li"]);
        assert_eq!(
            only_allow("list", &allowed, Offending::Tag("b")),
            "[list] can only contain [*] and [li] tags, so [b] is not allowed"
        );
        assert_eq!(
            only_allow("list", &allowed, Offending::Text("hi")),
            "[list] can only contain [*] and [li] tags, so \"hi\" is not allowed"
        );
        assert_eq!(
            only_allow("url", &[], Offending::Tag("b")),
            "[url] can not contain other tags, so [b] is not allowed"
        );
    }

    #[test]
    fn test_no_text_between() {
        assert_eq!(no_text_between("url", false), "No text between [url] and [/url] tags.");
        assert_eq!(
            no_text_between("media", true),
            "Cannot determine multi-tag type: No text between [media] and [/media] tags."
        );
    }
}
