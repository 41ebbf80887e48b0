use std::fs;

use tracing::{debug, error};

use crate::{utils::strings::parse_words, Error};

/// Given a target, determines whether it is a literal word list or a file path, and returns the
/// program words for the target.
///
/// A target that parses as a word list is used as-is; anything else is read from disk.
///
/// ```
/// use warden_common::program::get_program_from_target;
///
/// let words = get_program_from_target("0, 5, 3").expect("literal program");
/// assert_eq!(words, vec![0, 5, 3]);
/// ```
pub fn get_program_from_target(target: &str) -> Result<Vec<i32>, Error> {
    if let Ok(words) = parse_words(target) {
        if !words.is_empty() {
            debug!(words = words.len(), "target is a literal program");
            return Ok(words);
        }
    }

    let contents = fs::read_to_string(target).map_err(|e| {
        error!("failed to open file '{}' .", &target);
        Error::FilesystemError(e)
    })?;

    parse_words(&contents).map_err(|e| {
        error!("file '{}' doesn't contain a valid program.", &target);
        Error::ParseError(format!("file '{target}' doesn't contain a valid program: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::io::file::{delete_path, write_file};

    #[test]
    fn test_get_program_from_literal() {
        let words = get_program_from_target("0 0x2a 3").expect("literal program");
        assert_eq!(words, vec![0, 42, 3]);
    }

    #[test]
    fn test_get_program_from_file() {
        let path = "/tmp/warden_test_program.txt";
        write_file(path, "# push 7, ret\n0, 7,\n3\n").expect("unable to write file");

        let words = get_program_from_target(path).expect("program file");
        assert_eq!(words, vec![0, 7, 3]);
        delete_path(path);
    }

    #[test]
    fn test_get_program_from_invalid_file() {
        let path = "/tmp/warden_test_bad_program.txt";
        write_file(path, "push 7").expect("unable to write file");

        assert!(matches!(get_program_from_target(path), Err(Error::ParseError(_))));
        delete_path(path);
    }

    #[test]
    fn test_get_program_from_missing_file() {
        let result = get_program_from_target("/nonexistent/program.txt");
        assert!(matches!(result, Err(Error::FilesystemError(_))));
    }
}
