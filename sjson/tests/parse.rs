use sjson::{ParseErrorKind, Value, parse};
use sjson_value::format_value;

#[test]
fn shape_mirrors_the_source() {
    sjson_testhelpers::setup();

    let value = parse(
        "\t{\"order\": {\"id\": 1024, \"lines\": [{\"sku\": \"A-1\", \"qty\": 2, \"price\": 80.60}],\r\n \"paid\": false, \"note\": null}}\n",
    )
    .unwrap();

    insta::assert_snapshot!(format_value(&value), @r#"
    {
      "order": {
        "id": 1024,
        "lines": [
          {
            "sku": "A-1",
            "qty": 2,
            "price": 80.60
          }
        ],
        "paid": false,
        "note": null
      }
    }
    "#);
}

#[test]
fn key_order_does_not_matter() {
    sjson_testhelpers::setup();

    let a = parse(r#"{"x": 1, "y": [true]}"#).unwrap();
    let b = parse(r#"{"y": [true], "x": 1}"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.get("x"), Some(&Value::Number("1".into())));
}

#[test]
fn duplicates_are_rejected_per_object() {
    sjson_testhelpers::setup();

    assert!(parse(r#"[{"k": 1}, {"k": 2}]"#).is_ok());
    assert!(parse(r#"{"k": {"k": 1}}"#).is_ok());
    let err = parse(r#"{"k": 1, "k": 1}"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DuplicateKey("k".into()));
}

#[test]
fn escaped_keys_are_compared_decoded() {
    sjson_testhelpers::setup();

    let err = parse(r#"{"a": 1, "\u0061": 2}"#).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DuplicateKey("a".into()));
}
