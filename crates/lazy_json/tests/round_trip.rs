
mod compact {
    use crate::harness::round_trip_test;

    round_trip_test!(
        object,
        r#"{"a": 1, "b": [true, false, null]}"#,
        r#"{"a":1,"b":[true,false,null]}"#
    );
    round_trip_test!(
        insignificant_whitespace,
        "{ \"outer\" :\n\t{ \"inner\" : [ [ ] , { } ] } }\r\n",
        r#"{"outer":{"inner":[[],{}]}}"#
    );
    round_trip_test!(scalar_root, r#"  "x"  "#, r#""x""#);
    round_trip_test!(null_root, "null", "null");
    round_trip_test!(
        duplicate_keys_are_kept,
        r#"{"a":1, "a":2}"#,
        r#"{"a":1,"a":2}"#
    );
    round_trip_test!(
        deeply_nested,
        "[[[[[[[[[[1]]]]]]]]]]",
        "[[[[[[[[[[1]]]]]]]]]]"
    );
}

mod numbers {
    use crate::harness::round_trip_test;

    // Numbers are copied from the source text, never reformatted.
    round_trip_test!(
        exact_text,
        "[ -0, 1.5e10, 2E-3, 0.10, 12345678901234567890 ]",
        "[-0,1.5e10,2E-3,0.10,12345678901234567890]"
    );
    round_trip_test!(negative_exponent, "-1e-7", "-1e-7");
    // Valid JSON numbers that overflow an f64 must stay numbers.
    round_trip_test!(overflowing_exponent, "[1e400,-1e400]", "[1e400,-1e400]");
}

mod strings {
    use crate::harness::round_trip_test;

    round_trip_test!(
        short_escapes,
        r#""tab\tquote\"slash\/back\\""#,
        r#""tab\tquote\"slash/back\\""#
    );
    round_trip_test!(
        unicode_escapes_decode,
        r#""\u00e9 \ud83d\udd08""#,
        "\"é 🔈\""
    );
    round_trip_test!(
        html_characters,
        r#""<b>&</b>""#,
        r#""\u003cb\u003e\u0026\u003c/b\u003e""#
    );
    round_trip_test!(
        control_characters,
        r#""\u0001\b\f\n""#,
        r#""\u0001\u0008\u000c\n""#
    );
    round_trip_test!(
        line_separators,
        r#"[" ", " "]"#,
        r#"["\u2028","\u2029"]"#
    );
    round_trip_test!(
        escaped_keys,
        r#"{"k\"ey": "v"}"#,
        r#"{"k\"ey":"v"}"#
    );
    round_trip_test!(
        multibyte_text,
        "{\"Въведи\": \"код 🔈\"}",
        "{\"Въведи\":\"код 🔈\"}"
    );
}

mod owned {
    use lazy_json::{parse, writer, OwnedValue};

    use crate::harness::assert_equivalent;

    #[test]
    fn owned_values_round_trip() {
        let source = r#"{"name": "a\nb", "tags": ["x", 1.5, null], "nested": {"ok": true}}"#;
        let owned = parse(source).unwrap().value().unwrap();
        let mut buffer = Vec::new();
        writer::write_owned(&mut buffer, &owned).unwrap();

        let reparsed = parse(&buffer).unwrap();
        assert_equivalent(&parse(source).unwrap(), &reparsed);
        assert_eq!(reparsed.value().unwrap(), owned);
    }

    #[test]
    fn owned_duplicate_keys_collapse() {
        let owned = parse(r#"{"a":1,"b":2,"a":3}"#).unwrap().value().unwrap();
        let mut buffer = Vec::new();
        writer::write_owned(&mut buffer, &owned).unwrap();
        assert_eq!(buffer, br#"{"a":3.0,"b":2.0}"#);
        assert!(matches!(owned, OwnedValue::Object(ref map) if map.len() == 2));
    }
}
