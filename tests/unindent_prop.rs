//! Property tests for artwork unindentation.

use proptest::prelude::*;

use prettyrfc::unindent;

proptest! {
    /// Unindenting already-unindented text returns it unchanged.
    #[test]
    fn unindent_is_idempotent(input in "[ \tA-Za-z0-9+|/<>&.=:-]{0,40}(\n[ \tA-Za-z0-9+|/<>&.=:-]{0,40}){0,8}") {
        let once = unindent(&input);
        prop_assert_eq!(unindent(&once), once);
    }

    /// After stripping the minimum indentation, at least one line starts
    /// at column zero (whenever there is any non-blank content).
    #[test]
    fn some_line_reaches_column_zero(input in "[ \t]{0,8}[A-Za-z+|-]{1,20}(\n[ \t]{0,8}[A-Za-z+|-]{0,20}){0,8}") {
        let out = unindent(&input);
        if out.lines().any(|line| !line.trim().is_empty()) {
            prop_assert!(out.lines().any(|line| !line.starts_with([' ', '\t'])));
        }
    }

    /// Relative indentation between non-blank lines is preserved.
    #[test]
    fn relative_indentation_is_preserved(depth in 0usize..6, extra in 0usize..6) {
        let input = format!(
            "{}first\n{}second",
            " ".repeat(depth),
            " ".repeat(depth + extra)
        );
        let expected = format!("first\n{}second", " ".repeat(extra));
        prop_assert_eq!(unindent(&input), expected);
    }
}
