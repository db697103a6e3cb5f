use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sjson::{
    AnyKey, DateStrategy, Decode, DecodeError, DecodeErrorKind, Decoder, JsonDecoder, PathSegment,
    ValueKind,
};
use sjson_testhelpers::IPanic;
use tracing::subscriber::{NoSubscriber, with_default};

#[derive(Debug)]
struct TestEntity {
    string: String,
    integer: i64,
    double: f64,
    decimal: Decimal,
    bool: bool,
    date: DateTime<Utc>,
}

impl Decode for TestEntity {
    fn decode(decoder: Decoder<'_>) -> Result<Self, DecodeError> {
        let fields = decoder.keyed_container::<AnyKey>()?;
        Ok(TestEntity {
            string: fields.decode("string")?,
            integer: fields.decode("integer")?,
            double: fields.decode("double")?,
            decimal: fields.decode("decimal")?,
            bool: fields.decode("bool")?,
            date: fields.decode_date("date")?,
        })
    }
}

const ENTITY: &str = r#"{"string":"A","double":2.88,"integer":8,"decimal":80.6,"null":null,"bool":true,"date":"2019-09-06 18:15:10"}"#;

fn decoder() -> JsonDecoder {
    JsonDecoder::new().with_date_strategy(DateStrategy::format("%Y-%d-%m %H:%M:%S"))
}

#[test]
fn decodes_every_field() {
    sjson_testhelpers::setup();

    let entity: TestEntity = decoder().decode(ENTITY.as_bytes()).unwrap();
    assert_eq!(entity.string, "A");
    assert_eq!(entity.integer, 8);
    assert!((entity.double - 2.88).abs() < f64::EPSILON);
    assert_eq!(entity.decimal, Decimal::new(806, 1));
    assert!(entity.bool);
    assert_eq!(entity.date.timestamp(), 1_560_104_110);
}

#[test]
fn decodes_a_sequence_in_order() {
    sjson_testhelpers::setup();

    let second = ENTITY.replace(r#""string":"A""#, r#""string":"B""#);
    let input = format!("[{ENTITY}, {second}]");
    let entities: Vec<TestEntity> = decoder().decode_str(&input).unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].string, "A");
    assert_eq!(entities[1].string, "B");
}

#[test]
fn missing_double_is_key_not_found() {
    sjson_testhelpers::setup();

    let input = ENTITY.replace(r#""double":2.88,"#, "");
    let err = decoder().decode_str::<TestEntity>(&input).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::KeyNotFound {
            key: PathSegment::field("double")
        }
    );
    assert!(err.path.is_empty());
    assert_eq!(err.key(), Some(&PathSegment::field("double")));
}

#[test]
fn null_double_is_value_not_found() {
    sjson_testhelpers::setup();

    let input = ENTITY.replace("2.88", "null");
    let err = decoder().decode_str::<TestEntity>(&input).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::ValueNotFound { expected: "f64" });
    assert_eq!(err.path, vec![PathSegment::field("double")]);
}

#[test]
fn string_integer_is_type_mismatch() {
    sjson_testhelpers::setup();

    let input = ENTITY.replace(r#""integer":8"#, r#""integer":"8""#);
    let err = decoder().decode_str::<TestEntity>(&input).unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::TypeMismatch {
            expected: "i64",
            got: ValueKind::String
        }
    );
    assert_eq!(err.key(), Some(&PathSegment::field("integer")));
}

#[test]
fn errors_inside_a_sequence_carry_the_index() {
    sjson_testhelpers::setup();

    let broken = ENTITY.replace("2.88", "null");
    let input = format!("[{ENTITY}, {broken}]");
    let err = decoder().decode_str::<Vec<TestEntity>>(&input).unwrap_err();
    assert_eq!(err.path, vec![PathSegment::Index(1), PathSegment::field("double")]);
}

#[test]
fn bad_input_is_data_corrupted() {
    sjson_testhelpers::setup();

    let inputs: [&[u8]; 4] = [b"", b"Not valid string", &[0xff, 0xfe, b'{', b'}'], b"{\"a\": "];
    for input in inputs {
        let err = decoder().decode::<TestEntity>(input).unwrap_err();
        assert!(
            matches!(err.kind, DecodeErrorKind::DataCorrupted { .. }),
            "{input:?} gave {err}"
        );
        assert!(err.path.is_empty());
    }
}

#[test]
fn unparsable_dates_are_data_corrupted() {
    sjson_testhelpers::setup();

    let input = ENTITY.replace("2019-09-06 18:15:10", "someday");
    let err = decoder().decode_str::<TestEntity>(&input).unwrap_err();
    let DecodeErrorKind::DataCorrupted { message } = &err.kind else {
        panic!("unexpected {err:?}");
    };
    assert!(message.starts_with("can't parse date"), "{message}");
    assert_eq!(err.path, vec![PathSegment::field("date")]);
}

#[test]
fn default_strategy_reads_epoch_millis() {
    sjson_testhelpers::setup();

    let input = ENTITY.replace(r#""2019-09-06 18:15:10""#, "1560104110000");
    let entity: TestEntity = sjson::from_str(&input).unwrap();
    assert_eq!(entity.date.timestamp(), 1_560_104_110);
}

#[test]
fn decoding_with_question_mark() -> Result<(), IPanic> {
    sjson_testhelpers::setup();

    let entities: Vec<TestEntity> = decoder().decode_str(&format!("[{ENTITY}]"))?;
    let first = entities.first().map(|e| e.integer);
    assert_eq!(first, Some(8));
    Ok(())
}

#[test]
fn deeply_nested_input_is_released() {
    sjson_testhelpers::setup();

    let depth = 1_000_000;
    let input = "[".repeat(depth) + &"]".repeat(depth);
    let err = with_default(NoSubscriber::default(), || {
        decoder().decode_str::<TestEntity>(&input)
    })
    .unwrap_err();
    assert_eq!(
        err.kind,
        DecodeErrorKind::KeyNotFound {
            key: PathSegment::field("string")
        }
    );
}
