use crate::{parse, ErrorCode, Kind};

use quickcheck::QuickCheck;

use super::{assert_err, parse_err};

#[test]
fn negative_and_positive_integers() {
    let mut buf = b" [ 0, -1, 22] ".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    assert_eq!(3, root.len());

    for (index, expected) in [0, -1, 22].into_iter().enumerate() {
        let value = root.array_element(index);

        assert_eq!(Kind::Integer, value.kind());
        assert_eq!(expected, value.integer_value());
        assert_eq!(expected as f64, value.number_value());
    }
}

#[test]
fn integers() {
    let mut buf = b"[0,1,2,3,4,5,6,7,8,9,10]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    assert_eq!(11, root.len());

    for index in 0..11 {
        let value = root.array_element(index);

        assert_eq!(Kind::Integer, value.kind());
        assert_eq!(index as i32, value.integer_value());
    }
}

#[test]
fn integer_whitespace() {
    let mut buf = b" [ 0 , 0 ] ".to_vec();
    let document = parse(&mut buf).unwrap();

    let value = document.root().array_element(1);
    assert_eq!(Kind::Integer, value.kind());
    assert_eq!(0, value.integer_value());
}

#[test]
fn integer_bounds() {
    let mut buf = b"[2147483647,-2147483648]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    assert_eq!(i32::MAX, root.array_element(0).integer_value());
    assert_eq!(i32::MIN, root.array_element(1).integer_value());
}

#[test]
fn widening_matches_the_integer() {
    let mut buf = b"[0,-1,22,123456,-2147483648,2147483647]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    for value in root.elements() {
        assert_eq!(Kind::Integer, value.kind());
        assert_eq!(value.integer_value() as f64, value.double_value());
    }
}

#[test]
fn leading_zeroes_disallowed() {
    assert_err("[01]", 1, 3, ErrorCode::ExpectedComma);
}

#[test]
fn negative_zero_is_integer_zero() {
    let mut buf = b"[-0]".to_vec();
    let document = parse(&mut buf).unwrap();

    let value = document.root().array_element(0);
    assert_eq!(Kind::Integer, value.kind());
    assert_eq!(0, value.integer_value());
}

#[test]
fn doubles() {
    let mut buf = b"[-0,-1,-34.25]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    assert_eq!(3, root.len());

    let zero = root.array_element(0);
    assert_eq!(Kind::Integer, zero.kind());
    assert_eq!(0, zero.integer_value());

    let minus_one = root.array_element(1);
    assert_eq!(Kind::Integer, minus_one.kind());
    assert_eq!(-1, minus_one.integer_value());

    let fraction = root.array_element(2);
    assert_eq!(Kind::Double, fraction.kind());
    assert_eq!(-34.25, fraction.double_value());
}

#[test]
fn large_number() {
    let mut buf = b"[1496756396000]".to_vec();
    let document = parse(&mut buf).unwrap();

    let value = document.root().array_element(0);
    assert_eq!(Kind::Double, value.kind());
    assert_eq!(1496756396000.0, value.double_value());
    assert_eq!(Some(1496756396000), value.int53_value());
}

#[test]
fn exponents() {
    let mut buf = b"[2e+3,0.5E-5,10E+22]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();

    let first = root.array_element(0);
    assert_eq!(Kind::Double, first.kind());
    assert_eq!(2000.0, first.double_value());

    let second = root.array_element(1);
    assert_eq!(Kind::Double, second.kind());
    assert!((second.double_value() - 0.000005).abs() < 1e-20);

    let third = root.array_element(2);
    assert_eq!(Kind::Double, third.kind());
    assert_eq!(10e22, third.double_value());
}

#[test]
fn long_no_exponent() {
    let mut buf = b"[9999999999,99999999999]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();

    let first = root.array_element(0);
    assert_eq!(Kind::Double, first.kind());
    assert_eq!(9999999999.0, first.double_value());

    let second = root.array_element(1);
    assert_eq!(Kind::Double, second.kind());
    assert_eq!(99999999999.0, second.double_value());
}

#[test]
fn exponent_offset() {
    let mut buf = b"[0.005e3]".to_vec();
    let document = parse(&mut buf).unwrap();

    let value = document.root().array_element(0);
    assert_eq!(Kind::Double, value.kind());
    assert_eq!(5.0, value.double_value());
}

#[test]
fn missing_exponent() {
    assert_err("[0e]", 1, 4, ErrorCode::MssingExponent);
}

#[test]
fn missing_exponent_plus() {
    assert_err("[0e+]", 1, 5, ErrorCode::MssingExponent);
}

#[test]
fn int53_int32() {
    let mut buf = b"[-54]".to_vec();
    let document = parse(&mut buf).unwrap();

    assert_eq!(Some(-54), document.root().array_element(0).int53_value());
}

#[test]
fn int53_integer_double() {
    let mut buf = b"[10.0]".to_vec();
    let document = parse(&mut buf).unwrap();

    assert_eq!(Some(10), document.root().array_element(0).int53_value());
}

#[test]
fn int53_non_integer_double() {
    let mut buf = b"[10.5]".to_vec();
    let document = parse(&mut buf).unwrap();

    let value = document.root().array_element(0);
    assert_eq!(Kind::Double, value.kind());
    assert_eq!(10.5, value.double_value());
    assert_eq!(None, value.int53_value());
}

#[test]
fn int53_endpoints() {
    // one past 2^53 loses its low bit in a double, so the boundary is
    // tested one exactly-representable step out
    let mut buf =
        b"[-9007199254740992, 9007199254740992, -9007199254740994, 9007199254740994]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    assert_eq!(
        Some(-9007199254740992),
        root.array_element(0).int53_value()
    );
    assert_eq!(Some(9007199254740992), root.array_element(1).int53_value());
    assert_eq!(None, root.array_element(2).int53_value());
    assert_eq!(None, root.array_element(3).int53_value());
}

#[test]
fn ten_digits_is_a_double() {
    let mut buf = b"[9999999999]".to_vec();
    let document = parse(&mut buf).unwrap();

    assert_eq!(Kind::Double, document.root().array_element(0).kind());
}

#[test]
fn invalid_number() {
    for json in [
        "[-", "[-12", "[-12.", "[-12.3", "[-12e", "[-12e-", "[-12e+", "[-12e3",
    ] {
        let err = parse_err(json);
        assert_eq!(ErrorCode::UnexpectedEnd, err.code(), "code for {:?}", json);
    }
}

#[test]
fn minus_without_digits() {
    let err = parse_err("[-x]");
    assert_eq!(ErrorCode::ExpectedValue, err.code());
}

#[test]
fn fraction_without_digits() {
    let err = parse_err("[1.e3]");
    assert_eq!(ErrorCode::ExpectedValue, err.code());
}

#[test]
fn huge_exponents_saturate() {
    let mut buf = b"[1e999,-1e999,1e-999]".to_vec();
    let document = parse(&mut buf).unwrap();

    let root = document.root();
    assert_eq!(f64::INFINITY, root.array_element(0).double_value());
    assert_eq!(f64::NEG_INFINITY, root.array_element(1).double_value());
    assert_eq!(0.0, root.array_element(2).double_value());
}

#[test]
fn integers_round_trip() {
    fn prop(values: Vec<i32>) -> bool {
        let json = serde_json::to_vec(&values).unwrap();

        let mut buf = json;
        let document = parse(&mut buf).unwrap();
        let root = document.root();

        root.len() == values.len()
            && values.iter().enumerate().all(|(index, &expected)| {
                let value = root.array_element(index);

                value.kind() == Kind::Integer
                    && value.integer_value() == expected
                    && value.double_value() == expected as f64
                    && value.int53_value() == Some(expected as i64)
            })
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Vec<i32>) -> bool);
}
