use crate::Error;

/// Parses a single word. Accepts decimal (`-42`) or hexadecimal (`0x2a`, `-0x2a`). Hexadecimal
/// literals may use the full 32 bits, so `0xffffffff` is `-1`.
///
/// ```
/// use warden_common::utils::strings::parse_word;
///
/// assert_eq!(parse_word("42").expect("valid"), 42);
/// assert_eq!(parse_word("0x5A5A5A5A").expect("valid"), 0x5A5A5A5A);
/// assert_eq!(parse_word("0xffffffff").expect("valid"), -1);
/// assert!(parse_word("forty-two").is_err());
/// ```
pub fn parse_word(token: &str) -> Result<i32, Error> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map(|v| v as i32),
        None if negative => return token.parse::<i32>().map_err(|_| invalid_word(token)),
        None => digits.parse::<i32>(),
    }
    .map_err(|_| invalid_word(token))?;

    Ok(if negative { magnitude.wrapping_neg() } else { magnitude })
}

fn invalid_word(token: &str) -> Error {
    Error::ParseError(format!("invalid word '{token}'"))
}

/// Parses a word list. Words are separated by whitespace or commas, and `#` starts a comment
/// that runs to the end of the line.
///
/// ```
/// use warden_common::utils::strings::parse_words;
///
/// let words = parse_words("0, 5, # push 5\n3").expect("valid");
/// assert_eq!(words, vec![0, 5, 3]);
/// ```
pub fn parse_words(input: &str) -> Result<Vec<i32>, Error> {
    input
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .map(parse_word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_negative_forms() {
        assert_eq!(parse_word("-7").expect("valid"), -7);
        assert_eq!(parse_word("-0x10").expect("valid"), -16);
        assert_eq!(parse_word("-2147483648").expect("valid"), i32::MIN);
    }

    #[test]
    fn test_parse_word_rejects_overflow() {
        assert!(parse_word("2147483648").is_err());
        assert!(parse_word("0x100000000").is_err());
        assert!(parse_word("").is_err());
        assert!(parse_word("-").is_err());
    }

    #[test]
    fn test_parse_words_mixed_separators() {
        let words = parse_words("0 1\t2,3,,4\n  0xA").expect("valid");
        assert_eq!(words, vec![0, 1, 2, 3, 4, 10]);
    }

    #[test]
    fn test_parse_words_empty_and_comments() {
        assert_eq!(parse_words("").expect("valid"), Vec::<i32>::new());
        assert_eq!(parse_words("# nothing here\n").expect("valid"), Vec::<i32>::new());
    }

    #[test]
    fn test_parse_words_reports_bad_token() {
        let err = parse_words("0 1 two").expect_err("should fail");
        assert!(err.to_string().contains("'two'"));
    }
}
