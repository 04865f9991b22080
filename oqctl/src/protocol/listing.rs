//! Directory listing parser
// (c) 2026 oqctl developers

use super::payload::is_valid_payload_name;

/// Line breaks the device may use in a listing.
///
/// Some firmware sends an escaped newline (a backslash followed by `n`) instead of a real one.
const LINE_BREAKS: [&str; 3] = ["\r\n", "\n", "\\n"];

/// Parses the reply to `LS` into the payload names it contains.
///
/// A reply containing a comma is treated as comma-separated; otherwise it is split
/// on line breaks (real or escaped). Tokens are trimmed, then anything that is not a
/// valid payload name (empty, a `#` comment, or not `.oqs`) is discarded.
///
/// Device order is preserved. There is no sorting or de-duplication.
#[must_use]
pub fn parse_listing(raw: &str) -> Vec<String> {
    let tokens: Vec<&str> = if raw.contains(',') {
        raw.split(',').collect()
    } else {
        split_lines(raw)
    };
    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| is_valid_payload_name(t))
        .map(ToString::to_string)
        .collect()
}

/// Splits on whichever line break occurs first at each position
fn split_lines(raw: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = raw;
    loop {
        let next = LINE_BREAKS
            .iter()
            .filter_map(|lb| rest.find(lb).map(|pos| (pos, lb.len())))
            .min_by_key(|(pos, _)| *pos);
        match next {
            Some((pos, len)) => {
                out.push(&rest[..pos]);
                rest = &rest[pos + len..];
            }
            None => {
                out.push(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{parse_listing, split_lines};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn comma_separated() {
        assert_eq!(parse_listing("a.oqs,b.txt,C.OQS"), ["a.oqs", "C.OQS"]);
    }

    #[test]
    fn newline_separated_with_comment() {
        assert_eq!(parse_listing("a.oqs\n#comment\nb.oqs"), ["a.oqs", "b.oqs"]);
    }

    #[rstest]
    #[case("one.oqs\r\ntwo.oqs\r\n")]
    #[case("one.oqs\\ntwo.oqs")]
    #[case("  one.oqs \n\n\ttwo.oqs\t")]
    #[case("one.oqs\\n\r\ntwo.oqs\n")]
    fn line_break_variants(#[case] raw: &str) {
        assert_eq!(parse_listing(raw), ["one.oqs", "two.oqs"]);
    }

    #[test]
    fn comma_wins_over_newlines() {
        // with a comma present, newlines are just whitespace to be trimmed
        assert_eq!(parse_listing("a.oqs,\nb.oqs"), ["a.oqs", "b.oqs"]);
        assert_eq!(parse_listing("x.txt\nb.oqs,c.txt"), ["x.txt\nb.oqs"]);
    }

    #[test]
    fn order_and_duplicates_preserved() {
        assert_eq!(
            parse_listing("z.oqs,a.oqs,z.oqs"),
            ["z.oqs", "a.oqs", "z.oqs"]
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("#only.oqs")]
    #[case("readme.txt\nnotes")]
    fn nothing_usable(#[case] raw: &str) {
        assert!(parse_listing(raw).is_empty());
    }

    #[test]
    fn split_keeps_empty_tokens() {
        assert_eq!(split_lines("a\n\nb"), ["a", "", "b"]);
        assert_eq!(split_lines("a"), ["a"]);
    }
}
