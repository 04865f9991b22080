//! Payload naming rules
// (c) 2026 oqctl developers

/// Filename extension of a payload, compared case-insensitively
pub const PAYLOAD_EXTENSION: &str = ".oqs";

/// Does this filename carry the payload extension (case-insensitive)?
#[must_use]
pub fn has_payload_extension(name: &str) -> bool {
    let ext = PAYLOAD_EXTENSION.len();
    name.len() >= ext
        && name
            .get(name.len() - ext..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(PAYLOAD_EXTENSION))
}

/// Is this a name the device could list as a payload?
///
/// It must be non-empty, must not be a comment (leading `#`) and must end with `.oqs`.
#[must_use]
pub fn is_valid_payload_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('#') && has_payload_extension(name)
}

/// Derives the name to upload a local file as.
///
/// This is the final path component with one leading `.` removed, so that hidden
/// files on the local side do not become hidden on the device.
/// Both `/` and `\` are treated as path separators.
#[must_use]
pub fn upload_name(path: &str) -> &str {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    base.strip_prefix('.').unwrap_or(base)
}

#[cfg(test)]
mod test {
    use super::{has_payload_extension, is_valid_payload_name, upload_name};
    use rstest::rstest;

    #[rstest]
    #[case("a.oqs", true)]
    #[case("A.OQS", true)]
    #[case("mixed.OqS", true)]
    #[case(".oqs", true)]
    #[case("a.txt", false)]
    #[case("oqs", false)]
    #[case("", false)]
    #[case("é.oqs", true)]
    #[case("aé", false)]
    fn extension(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(has_payload_extension(name), expected);
    }

    #[rstest]
    #[case("hello.oqs", true)]
    #[case("#hello.oqs", false)]
    #[case("", false)]
    #[case("readme.md", false)]
    fn validity(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_payload_name(name), expected);
    }

    #[rstest]
    #[case("payload.oqs", "payload.oqs")]
    #[case("/home/me/scripts/rick.oqs", "rick.oqs")]
    #[case("dir/.hidden.oqs", "hidden.oqs")]
    #[case(r"C:\Users\me\win.oqs", "win.oqs")]
    #[case("..twice.oqs", ".twice.oqs")]
    fn names_for_upload(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(upload_name(path), expected);
    }
}
