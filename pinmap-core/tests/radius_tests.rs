// Tests for radius parsing and validation

use pinmap_core::radius::MAX_RADIUS_M;
use pinmap_core::{Radius, RadiusError, RadiusField};

#[test]
fn test_parse_plain_and_decimal() {
    assert_eq!("500".parse::<Radius>().unwrap().meters(), 500.0);
    assert_eq!(" 12.5 ".parse::<Radius>().unwrap().meters(), 12.5);
    assert_eq!("1e3".parse::<Radius>().unwrap().meters(), 1000.0);
    assert_eq!("0".parse::<Radius>().unwrap().meters(), 0.0);
}

#[test]
fn test_rejections() {
    assert_eq!("".parse::<Radius>(), Err(RadiusError::Empty));
    assert_eq!("   ".parse::<Radius>(), Err(RadiusError::Empty));
    assert_eq!(
        "12m".parse::<Radius>(),
        Err(RadiusError::NotANumber("12m".to_string()))
    );
    assert_eq!("NaN".parse::<Radius>(), Err(RadiusError::NotFinite));
    assert_eq!("inf".parse::<Radius>(), Err(RadiusError::NotFinite));
    assert_eq!("-1".parse::<Radius>(), Err(RadiusError::Negative(-1.0)));
    assert_eq!("3e7".parse::<Radius>(), Err(RadiusError::TooLarge(3e7)));
}

#[test]
fn test_max_radius_is_inclusive() {
    assert!(Radius::new(MAX_RADIUS_M).is_ok());
    assert!(Radius::new(MAX_RADIUS_M + 1.0).is_err());
}

#[test]
fn test_field_keeps_invalid_text() {
    let mut field = RadiusField::new("500");
    assert!(field.is_valid());

    let result = field.set_text("5x");
    assert!(result.is_err());
    assert_eq!(field.text(), "5x");
    assert!(!field.is_valid());

    field.set_text("50").unwrap();
    assert_eq!(field.value().unwrap().meters(), 50.0);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        RadiusError::Negative(-5.0).to_string(),
        "radius -5 m is negative"
    );
    assert_eq!(
        RadiusError::NotANumber("abc".into()).to_string(),
        "\"abc\" is not a number"
    );
}
