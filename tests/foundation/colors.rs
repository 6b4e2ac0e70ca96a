//! Integration tests for colors
//!
//! Tests parsing of names, hex strings, and component tuples.

use scenetable_foundation::{AttrType, Color, Value};

#[test]
fn named_and_hex_colors() {
    assert_eq!(Color::parse("blue").unwrap().to_hex(), "#0000ff");
    assert_eq!(Color::parse("#00FF00").unwrap().to_hex(), "#00ff00");
    assert!(Color::parse("not-a-color").is_none());
}

#[test]
fn component_tuples() {
    assert_eq!(Color::from_components(&[1.0, 0.0, 0.0]).unwrap().to_hex(), "#ff0000");
    assert!(Color::from_components(&[1.0, 0.0]).is_none());
    assert!(Color::from_components(&[2.0, 0.0, 0.0]).is_none());
}

#[test]
fn color_attribute_accepts_lists() {
    let value = AttrType::Color
        .coerce("color", &Value::from(vec![0.0, 0.0, 1.0]))
        .unwrap();
    assert_eq!(value.as_color().unwrap().to_hex(), "#0000ff");
}

#[test]
fn default_is_red() {
    assert_eq!(Color::red().to_hex(), "#ff0000");
}
