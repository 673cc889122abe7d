
mod cursor_protocol {
    use lazy_json::iter::{array_has_next, array_next, object_has_next, object_next};
    use lazy_json::{parse, Kind};

    use crate::harness::assert_offsets;

    #[test]
    fn walks_object_members_in_order() {
        let object = parse(r#"{"x":1,"y":2}"#).unwrap();
        let mut cursor = 0;
        let mut seen = Vec::new();
        while object_has_next(&object, cursor) {
            let (key, value, next) = object_next(&object, cursor).unwrap();
            seen.push((key.into_owned(), value.int().unwrap()));
            cursor = next;
        }
        assert_eq!(seen, vec![("x".to_string(), 1), ("y".to_string(), 2)]);
    }

    #[test]
    fn cursors_are_plain_values() {
        let array = parse("[10, 20, 30]").unwrap();
        let (first, after_first) = array_next(&array, 0).unwrap();
        let (second, _) = array_next(&array, after_first).unwrap();
        // Stepping from the same cursor again yields the same element.
        let (again, after_again) = array_next(&array, after_first).unwrap();
        assert_eq!(first.int().unwrap(), 10);
        assert_eq!(second.int().unwrap(), 20);
        assert_eq!(again.int().unwrap(), 20);
        assert_eq!(again.offset(), second.offset());
        assert!(array_has_next(&array, after_again));
    }

    #[test]
    fn empty_containers_have_no_members() {
        for source in ["{}", "{ }", "[]", "[\n]"] {
            let value = parse(source).unwrap();
            assert!(!object_has_next(&value, 0));
            assert!(!array_has_next(&value, 0));
            assert_eq!(value.object_iter(0).count() + value.array_iter(0).count(), 1);
        }
    }

    #[test]
    fn offsets_locate_every_value() {
        let source = "\n  {\"a\": [1, {\"b\": \"c\\\"d\"}, [ ]],\n   \"e\" : -2.5e3, \"f\": null}  ";
        let root = parse(source).unwrap();
        assert_eq!(root.offset(), 3);
        assert_offsets(source, &root);
    }

    #[test]
    fn nested_containers_are_squashed_until_visited() {
        let root = parse(r#"{"list": [1, [2, [3]]], "n": 0}"#).unwrap();
        let list = root.get("list").unwrap().unwrap();
        assert_eq!(list.kind(), Kind::Array);
        assert_eq!(list.raw(), "[1, [2, [3]]]");
        assert!(list.text().is_none());
        assert!(list.number().is_none());

        let elements = list.array_iter(0).collect::<lazy_json::Result<Vec<_>>>().unwrap();
        assert_eq!(elements[1].raw(), "[2, [3]]");
    }
}

mod laziness {
    use lazy_json::{parse, parse_unvalidated, Error, Kind};

    #[test]
    fn malformed_child_is_reported_when_visited() {
        let source = r#"{"ok": [1, 2], "bad": {"x": 1, "y": [tru]}}"#;
        assert!(parse(source).is_err());

        let root = parse_unvalidated(source).unwrap();
        let ok = root.get("ok").unwrap().unwrap();
        assert_eq!(ok.array_iter(0).count(), 2);

        let bad = root.get("bad").unwrap().unwrap();
        assert_eq!(bad.kind(), Kind::Object);
        let y = bad.get("y").unwrap().unwrap();
        let error = y.array_next(0).unwrap_err();
        assert!(matches!(
            error,
            Error::Syntax {
                index: 40,
                message: "invalid character in literal"
            }
        ));
    }

    #[test]
    fn separators_are_only_checked_by_validation() {
        let root = parse_unvalidated(r#"[1, "two", 3 4]"#).unwrap();
        let mut seen = 0;
        let result = root.array_for_each(|_| {
            seen += 1;
            Ok(())
        });
        // `3 4` scans as the single token `3`, then ` 4` is the next element.
        assert!(result.is_ok());
        assert_eq!(seen, 4);
    }

    #[test]
    fn materialization_is_depth_limited() {
        let depth = lazy_json::MAX_NESTING_DEPTH + 10;
        let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse(&source).is_err());

        let root = parse_unvalidated(&source).unwrap();
        assert!(matches!(
            root.value(),
            Err(Error::Syntax {
                message: "exceeded max nesting depth",
                ..
            })
        ));
    }
}

mod iterators {
    use lazy_json::{parse, Error, Kind};

    #[test]
    fn iterator_adapters_match_the_cursor_functions() {
        let object = parse(r#"{"a": true, "b": [false], "c": "s"}"#).unwrap();
        let mut iter = object.object_iter(0);
        let kinds = iter
            .by_ref()
            .map(|member| member.map(|(key, value)| (key.into_owned(), value.kind())))
            .collect::<lazy_json::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            kinds,
            vec![
                ("a".to_string(), Kind::True),
                ("b".to_string(), Kind::Array),
                ("c".to_string(), Kind::String),
            ]
        );
        assert!(!object.object_has_next(iter.cursor()));
    }

    #[test]
    fn wrong_container_kind() {
        let value = parse(r#""text""#).unwrap();
        assert!(!value.array_has_next(0));
        assert!(matches!(
            value.array_for_each(|_| Ok(())),
            Err(Error::TypeMismatch {
                want: "array",
                got: Kind::String,
                ..
            })
        ));
        assert!(matches!(
            value.object_next(0),
            Err(Error::TypeMismatch { want: "object", .. })
        ));
    }

    #[test]
    fn get_and_value_agree_on_duplicates() {
        let object = parse(r#"{"k": 1, "k": 2}"#).unwrap();
        let last = object.get("k").unwrap().unwrap();
        let owned = object.value().unwrap();
        assert_eq!(
            owned.as_object().and_then(|map| map.get("k")).and_then(|v| v.as_f64()),
            last.number()
        );
        assert_eq!(object.object_iter(0).count(), 2);
    }
}
