
mod payload {
    use crate::harness::error_test;

    error_test!(empty, "", 0, "invalid character before JSON");
    error_test!(only_whitespace, " \n ", 3, "invalid character before JSON");
    error_test!(trailing_value, "1 2", 2, "invalid character after JSON");
    error_test!(leading_zero, "01", 1, "invalid character after JSON");
    error_test!(trailing_bracket, "[]]", 2, "invalid character after JSON");
}

mod containers {
    use crate::harness::error_test;

    error_test!(unterminated_array, "[1,2,3", 6, "expected comma");
    error_test!(missing_comma, r#"{"a":1 "b":2}"#, 7, "invalid character for comma");
    error_test!(missing_colon, r#"{"a" 1}"#, 5, "invalid character for colon");
    error_test!(eof_before_colon, r#"{"a""#, 4, "expected colon");
    error_test!(
        trailing_comma_in_array,
        "[1,]",
        3,
        "invalid character looking for beginning of value"
    );
    error_test!(
        trailing_comma_in_object,
        r#"{"a":1,}"#,
        7,
        "invalid character for object key"
    );
    error_test!(unquoted_key, "{a:1}", 1, "invalid character for object key");
    error_test!(eof_before_key, "{", 1, "expected object key");
    error_test!(eof_before_element, "[", 1, "expected value");
    error_test!(eof_before_member_value, r#"{"a":"#, 5, "expected value");
    error_test!(
        mismatched_bracket,
        "[1}",
        2,
        "invalid character for comma"
    );
}

mod strings {
    use crate::harness::error_test;

    error_test!(unterminated, r#""abc"#, 4, "expected closing quote");
    error_test!(
        control_character,
        b"\"a\x01\"",
        2,
        "invalid control character in string"
    );
    error_test!(raw_newline, "\"a\nb\"", 2, "invalid control character in string");
    error_test!(bad_escape, r#""\x""#, 2, "invalid escape character");
    error_test!(eof_in_escape, r#""\"#, 2, "expected escape character");
    error_test!(
        bad_hex_digit,
        r#""\u12G4""#,
        5,
        "invalid character in unicode escape"
    );
    error_test!(eof_in_unicode_escape, r#""\u12"#, 5, "expected hex digit");
    error_test!(invalid_utf8, b"\"ab\xff\"", 3, "invalid UTF-8 in string");
    error_test!(truncated_utf8, b"\"\xe2\x80\"", 1, "invalid UTF-8 in string");
    error_test!(
        non_ascii_outside_string,
        b"[\xc3\xa9]",
        1,
        "invalid character looking for beginning of value"
    );
}

mod numbers {
    use crate::harness::error_test;

    error_test!(sign_without_digit, "-.123", 1, "expected digit after sign");
    error_test!(bare_sign, "-", 1, "expected digit after sign");
    error_test!(empty_fraction, "1.", 2, "expected digit after decimal point");
    error_test!(empty_fraction_in_array, "[1.]", 3, "expected digit after decimal point");
    error_test!(empty_exponent, "1e+", 3, "expected digit in exponent");
    error_test!(
        leading_plus,
        "+1",
        0,
        "invalid character before JSON"
    );
    error_test!(nan_is_not_json, "[NaN]", 1, "invalid character looking for beginning of value");
}

mod literals {
    use crate::harness::error_test;

    error_test!(truncated, "tru", 3, "unexpected end of literal");
    error_test!(misspelled, "trux", 3, "invalid character in literal");
    error_test!(wrong_case, "[Null]", 1, "invalid character looking for beginning of value");
    error_test!(nested_misspelled, r#"{"a": nul}"#, 9, "invalid character in literal");
}

mod nesting {
    use lazy_json::MAX_NESTING_DEPTH;

    use crate::harness::run_error_test;

    #[test]
    fn too_deep() {
        let input = "[".repeat(MAX_NESTING_DEPTH + 1);
        run_error_test(input.as_bytes(), MAX_NESTING_DEPTH, "exceeded max nesting depth");
    }

    #[test]
    fn deepest_allowed() {
        let input = format!(
            "{}{}",
            "[".repeat(MAX_NESTING_DEPTH),
            "]".repeat(MAX_NESTING_DEPTH)
        );
        assert!(lazy_json::valid(&input).is_ok());
    }
}

mod reporting {
    use lazy_json::{parse, Error};

    #[test]
    fn validation_is_idempotent() {
        for input in ["[1,2,3", r#"{"a": [true, null]}"#, "", "-"] {
            let first = lazy_json::valid(input).map_err(|error| error.to_string());
            let second = lazy_json::valid(input).map_err(|error| error.to_string());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn error_display() {
        let error = parse("[1,2,3").unwrap_err();
        assert_eq!(error.to_string(), "syntax error at index 6: expected comma");
        assert_eq!(error.name(), "SyntaxError");
        assert_eq!(error.index(), Some(6));
        assert_eq!(error.message(), Some("expected comma"));
        assert!(matches!(error, Error::Syntax { .. }));
    }
}
