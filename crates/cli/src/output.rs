use std::env;

use eyre::{eyre, Result};

/// build a standardized output path for the given parameters. follows the following cases:
/// - if `output` is the default value (`output`), return `{cwd}/output/local/{filename}`
/// - if `output` is specified, return `{output}/{filename}`
///
/// `print` is handled by the caller and never reaches this function.
pub(crate) fn build_output_path(output: &str, filename: &str) -> Result<String> {
    // if output is the default value, build a path under the working directory
    if output == "output" {
        let cwd = env::current_dir()?
            .into_os_string()
            .into_string()
            .map_err(|_| eyre!("Unable to get current working directory"))?;

        return Ok(format!("{cwd}/output/local/{filename}"));
    }

    // output is specified, return the path
    Ok(format!("{output}/{filename}"))
}

/// The output file name, prefixed with the user supplied `name` when one was given.
pub(crate) fn output_filename(name: &str, default: &str) -> String {
    if name.is_empty() {
        default.to_string()
    } else {
        format!("{name}-{default}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_default_local() {
        let path = build_output_path("output", "disassembled.asm");
        assert!(path
            .expect("failed to build output path")
            .ends_with("/output/local/disassembled.asm"));
    }

    #[test]
    fn test_output_specified() {
        let path = build_output_path("/some_dir", "disassembled.asm");
        assert_eq!(
            path.expect("failed to build output path"),
            "/some_dir/disassembled.asm".to_string()
        );
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("", "disassembled.asm"), "disassembled.asm");
        assert_eq!(output_filename("gate", "disassembled.asm"), "gate-disassembled.asm");
    }
}
