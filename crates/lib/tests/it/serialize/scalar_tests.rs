//! Scalar coercion tests.

use configtree::{ConfigOptions, ConfigTree, Value, node::Scalar};
use url::Url;
use uuid::Uuid;

use crate::helpers::*;

// ===== INTEGERS =====

#[test]
fn test_hex_text_reads_as_integer() {
    assert_eq!(read_as::<u32>("0x2E9FA0D").unwrap(), 48888333);
    assert_eq!(read_as::<i64>("-0x10").unwrap(), -16);
    assert_eq!(read_as::<u8>("0b1010").unwrap(), 10);
}

#[test]
fn test_fractional_value_is_rejected() {
    let err = assert_coercion_error(read_as::<u32>(48888333.4));
    assert!(err.is_fractional());
    let err = assert_coercion_error(read_as::<i32>("2.5"));
    assert!(err.is_fractional());
}

#[test]
fn test_whole_floats_read_as_integers() {
    assert_eq!(read_as::<u16>(3.0).unwrap(), 3);
    assert_eq!(read_as::<i8>("-4.0").unwrap(), -4);
}

#[test]
fn test_out_of_range_is_rejected() {
    let err = assert_coercion_error(read_as::<u8>(348));
    assert!(err.is_out_of_range());
    assert!(assert_coercion_error(read_as::<i16>(40_000)).is_out_of_range());
    assert!(assert_coercion_error(read_as::<u64>(-1)).is_out_of_range());
    assert!(assert_coercion_error(read_as::<f32>(1e300)).is_out_of_range());
}

#[test]
fn test_every_integer_width() {
    assert_eq!(read_as::<i8>(-128).unwrap(), i8::MIN);
    assert_eq!(read_as::<i16>("1234").unwrap(), 1234);
    assert_eq!(read_as::<i32>(7).unwrap(), 7);
    assert_eq!(read_as::<i64>(i64::MAX).unwrap(), i64::MAX);
    assert_eq!(read_as::<u16>(65535).unwrap(), u16::MAX);
    assert_eq!(read_as::<usize>(12).unwrap(), 12);
    assert_eq!(read_as::<isize>(-12).unwrap(), -12);
}

#[test]
fn test_large_unsigned_round_trip() {
    let mut tree = ConfigTree::new();
    tree.node_mut("big").set_as(u64::MAX).unwrap();
    assert!(matches!(tree.node("big").scalar(), Some(Scalar::Text(_))));
    assert_eq!(tree.node("big").get_as::<u64>().unwrap(), u64::MAX);

    tree.node_mut("small").set_as(42u64).unwrap();
    assert!(matches!(tree.node("small").scalar(), Some(Scalar::Int(42))));
}

// ===== OTHER SCALARS =====

#[test]
fn test_floats() {
    assert_eq!(read_as::<f64>("2.5").unwrap(), 2.5);
    assert_eq!(read_as::<f64>(3).unwrap(), 3.0);
    assert_eq!(read_as::<f32>(1.5).unwrap(), 1.5f32);
    assert_coercion_error(read_as::<f64>("fast"));
}

#[test]
fn test_booleans() {
    assert!(read_as::<bool>(true).unwrap());
    assert!(read_as::<bool>("Yes").unwrap());
    assert!(!read_as::<bool>("off").unwrap());
    assert_coercion_error(read_as::<bool>("maybe"));
    assert_coercion_error(read_as::<bool>(1.5));
}

#[test]
fn test_chars() {
    assert_eq!(read_as::<char>("x").unwrap(), 'x');
    assert_eq!(read_as::<char>(65).unwrap(), 'A');
    assert_coercion_error(read_as::<char>("xy"));
}

#[test]
fn test_strings_accept_any_scalar() {
    assert_eq!(read_as::<String>("text").unwrap(), "text");
    assert_eq!(read_as::<String>(15).unwrap(), "15");
    assert_eq!(read_as::<String>(true).unwrap(), "true");
}

#[test]
fn test_uuid_url_and_regex() {
    let id = Uuid::new_v4();
    let mut tree = ConfigTree::new();
    tree.node_mut("id").set_as(id).unwrap();
    assert_eq!(tree.node("id").get_string(), Some(id.to_string()));
    assert_eq!(tree.node("id").get_as::<Uuid>().unwrap(), id);

    let url = read_as::<Url>("https://example.com/path").unwrap();
    assert_eq!(url.host_str(), Some("example.com"));
    assert!(read_as::<Url>("not a url").is_err());

    let pattern = read_as::<regex::Regex>("^[a-z]+$").unwrap();
    assert!(pattern.is_match("abc"));
    assert!(read_as::<regex::Regex>("(unclosed").is_err());
}

// ===== ABSENT VALUES =====

#[test]
fn test_missing_node_has_no_value() {
    let tree = server_config();
    let err = tree.node("missing").get_as::<u32>().unwrap_err();
    assert!(err.is_no_value());
    assert_eq!(tree.node("missing").get_as::<Option<u32>>().unwrap(), None);
    assert_eq!(tree.node("port").get_as::<Option<u32>>().unwrap(), Some(8080));
}

#[test]
fn test_writing_none_detaches() {
    let mut tree = server_config();
    tree.node_mut("port").set_as(None::<u16>).unwrap();
    assert!(tree.node("port").is_virtual());
}

#[test]
fn test_defaults_are_copied_when_enabled() {
    let mut tree = ConfigTree::new();
    assert_eq!(tree.node_mut("retries").get_as_or(3u32).unwrap(), 3);
    assert!(tree.node("retries").is_virtual());

    let mut tree = ConfigTree::with_options(ConfigOptions::default().with_copy_defaults(true));
    assert_eq!(tree.node_mut("retries").get_as_or(3u32).unwrap(), 3);
    assert_eq!(tree.node("retries").get_value(), Value::from(3));

    tree.node_mut("retries").set_value(5).unwrap();
    assert_eq!(tree.node_mut("retries").get_as_or(3u32).unwrap(), 5);
}
