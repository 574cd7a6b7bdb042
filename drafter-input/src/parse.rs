//! Command-line text → [`InputValue`].
//!
//! | Text          | Value                                            |
//! |---------------|--------------------------------------------------|
//! | `x,y`         | absolute point                                   |
//! | `@dx,dy`      | point offset from the last input point           |
//! | `@dist<angle` | point at `dist` from the last input point, angle in degrees |
//! | `12.5`        | number                                           |
//! | anything else | text                                             |
//!
//! Relative forms measure from the origin when there is no last input point.

use drafter_core::Point;

use crate::value::InputValue;

pub fn parse_input(text: &str, last_point: Option<Point>) -> InputValue {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix('@') {
        Some(rest) => parse_relative(rest, last_point.unwrap_or(Point::ORIGIN)),
        None => parse_pair(trimmed)
            .map(|(x, y)| InputValue::Point(Point::new(x, y)))
            .or_else(|| parse_number(trimmed).map(InputValue::Number)),
    };
    parsed.unwrap_or_else(|| InputValue::Text(trimmed.to_string()))
}

fn parse_relative(rest: &str, base: Point) -> Option<InputValue> {
    if let Some((dist, angle)) = rest.split_once('<') {
        let dist = parse_number(dist)?;
        let angle = parse_number(angle)?.to_radians();
        return Some(InputValue::Point(base.polar(angle, dist)));
    }
    let (dx, dy) = parse_pair(rest)?;
    Some(InputValue::Point(base.offset(dx, dy)))
}

fn parse_pair(text: &str) -> Option<(f64, f64)> {
    let (x, y) = text.split_once(',')?;
    Some((parse_number(x)?, parse_number(y)?))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: InputValue) -> Point {
        value.as_point().expect("expected a point")
    }

    #[test]
    fn test_absolute_point() {
        assert_eq!(
            parse_input("10, -2.5", None),
            InputValue::Point(Point::new(10.0, -2.5))
        );
    }

    #[test]
    fn test_relative_point() {
        let p = point(parse_input("@5,5", Some(Point::new(1.0, 2.0))));
        assert_eq!(p, Point::new(6.0, 7.0));
    }

    #[test]
    fn test_polar_point() {
        let p = point(parse_input("@10<90", Some(Point::new(1.0, 1.0))));
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_without_last_point_uses_origin() {
        assert_eq!(point(parse_input("@3,4", None)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_number_and_text() {
        assert_eq!(parse_input(" 42 ", None), InputValue::Number(42.0));
        assert_eq!(parse_input("Close", None), InputValue::Text("Close".into()));
        assert_eq!(parse_input("nan", None), InputValue::Text("nan".into()));
        assert_eq!(parse_input("1,x", None), InputValue::Text("1,x".into()));
        assert_eq!(parse_input("@oops", None), InputValue::Text("@oops".into()));
    }
}
