/// Decoders for whitespace-separated numeric attribute text
use nom::{
    character::complete::{i64 as integer, multispace0},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

fn number(input: &str) -> IResult<&str, f64> {
    preceded(multispace0, double)(input)
}

fn whole_number(input: &str) -> IResult<&str, i64> {
    preceded(multispace0, integer)(input)
}

/// Leading integer, ignoring anything after it
pub fn parse_int(input: &str) -> Option<i64> {
    whole_number(input).ok().map(|(_, value)| value)
}

/// Leading float, ignoring anything after it
pub fn parse_float(input: &str) -> Option<f64> {
    number(input).ok().map(|(_, value)| value)
}

/// Every float up to the first token that is not a number
pub fn parse_floats(input: &str) -> Vec<f64> {
    many0(number)(input)
        .map(|(_, values)| values)
        .unwrap_or_default()
}

/// Every integer up to the first token that is not one
pub fn parse_ints(input: &str) -> Vec<i64> {
    many0(whole_number)(input)
        .map(|(_, values)| values)
        .unwrap_or_default()
}

/// Exactly `N` floats; missing trailing values read as zero and extra
/// values are ignored.
pub fn parse_fixed<const N: usize>(input: &str) -> [f64; N] {
    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(parse_floats(input)) {
        *slot = value;
    }
    out
}

/// A 4x4 matrix as 16 numbers in row-major reading order. Fewer than 16
/// numbers is not a matrix.
pub fn parse_matrix(input: &str) -> Option<[f64; 16]> {
    let values = parse_floats(input);
    if values.len() < 16 {
        return None;
    }
    let mut out = [0.0; 16];
    out.copy_from_slice(&values[..16]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_list_stops_at_garbage() {
        assert_eq!(parse_ints("0 1 2  3\n4"), vec![0, 1, 2, 3, 4]);
        assert_eq!(parse_ints(" 7 8 x 9"), vec![7, 8]);
        assert!(parse_ints("").is_empty());
    }

    #[test]
    fn test_float_list() {
        assert_eq!(parse_floats("1 -2.5 3e2"), vec![1.0, -2.5, 300.0]);
    }

    #[test]
    fn test_fixed_arity_pads_and_truncates() {
        assert_eq!(parse_fixed::<3>("0.5 0.25"), [0.5, 0.25, 0.0]);
        assert_eq!(parse_fixed::<2>("1 2 3"), [1.0, 2.0]);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_int(" 12 "), Some(12));
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("bone"), None);
        assert_eq!(parse_float("0.75"), Some(0.75));
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn test_matrix() {
        let m = parse_matrix("1 0 0 5  0 1 0 6  0 0 1 7  0 0 0 1").unwrap();
        assert_eq!(m[3], 5.0);
        assert_eq!(m[15], 1.0);
        assert!(parse_matrix("1 0 0").is_none());
    }
}
