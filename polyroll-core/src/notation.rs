/// Dice notation such as `3d6+2`
use nom::{
    character::complete::{digit1, multispace0, one_of},
    combinator::{all_consuming, map_res, opt},
    sequence::{pair, preceded},
    IResult,
};

use crate::dice::DieType;
use crate::error::{DiceError, Result};
use crate::roll::RollRequest;

/// Parse `[count]d<sides>[(+|-)modifier]` into a validated [`RollRequest`].
pub fn parse_notation(input: &str) -> Result<RollRequest> {
    let (_, (count, sides, modifier)) =
        all_consuming(notation)(input).map_err(|_| DiceError::InvalidNotation(input.to_string()))?;

    let die = DieType::try_from(sides).map_err(|_| DiceError::UnknownDieType(format!("d{sides}")))?;
    let modifier = match modifier {
        Some(('-', value)) => -value,
        Some((_, value)) => value,
        None => 0,
    };
    RollRequest::new(die, count.unwrap_or(1), modifier)
}

fn number<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse::<T>)(input)
}

fn notation(input: &str) -> IResult<&str, (Option<u32>, u32, Option<(char, i32)>)> {
    let (input, count) = preceded(multispace0, opt(number::<u32>))(input)?;
    let (input, _) = one_of("dD")(input)?;
    let (input, sides) = number::<u32>(input)?;
    let (input, modifier) = opt(pair(
        preceded(multispace0, one_of("+-")),
        preceded(multispace0, number::<i32>),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, (count, sides, modifier)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_die() {
        let request = parse_notation("d20").unwrap();
        assert_eq!(request, RollRequest::single(DieType::D20));
    }

    #[test]
    fn test_count_and_modifier() {
        let request = parse_notation("3d6+2").unwrap();
        assert_eq!((request.die, request.count, request.modifier), (DieType::D6, 3, 2));

        let request = parse_notation(" 2D8 - 1 ").unwrap();
        assert_eq!((request.die, request.count, request.modifier), (DieType::D8, 2, -1));
    }

    #[test]
    fn test_display_parses_back() {
        for text in ["d4", "10d10-7", "4d12+100"] {
            assert_eq!(parse_notation(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_malformed() {
        for input in ["", "d", "3x6", "d6+", "d6 extra", "++d6", "3d6+2+1", "-1d6"] {
            assert!(
                matches!(parse_notation(input), Err(DiceError::InvalidNotation(_))),
                "{input:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_unknown_sides() {
        match parse_notation("2d7") {
            Err(DiceError::UnknownDieType(id)) => assert_eq!(id, "d7"),
            other => panic!("expected UnknownDieType, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(parse_notation("0d6"), Err(DiceError::InvalidRoll(_))));
        assert!(matches!(parse_notation("101d6"), Err(DiceError::InvalidRoll(_))));
        assert!(matches!(parse_notation("d6-101"), Err(DiceError::InvalidRoll(_))));
    }
}
