//! Integration tests for disassemble functionality.

#[cfg(test)]
mod integration_tests {
    use warden_disassembler::{disassemble, DisassemblerArgs, DisassemblerArgsBuilder, Error};

    #[test]
    fn test_disassemble_nominal() {
        let program = "0 10 0 32 2 12 4 2 0 3";
        let expected = String::from(
            "000000 push 10\n000002 push 32\n000004 add\n000005 checksum_check 4 2 0\n000009 ret\n",
        );

        let assembly = disassemble(DisassemblerArgs {
            target: program.to_owned(),
            decimal_counter: false,
            name: String::from(""),
            output: String::from(""),
        })
        .expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_decimal_counter_nominal() {
        let program = "0x0, 0x7fffffff, 4, 0x5a, 11, 3";
        let expected = String::from("0 push 2147483647\n2 call_external 90\n4 timing_check\n5 ret\n");

        let assembly = disassemble(DisassemblerArgs {
            target: program.to_owned(),
            decimal_counter: true,
            name: String::from(""),
            output: String::from(""),
        })
        .expect("failed to disassemble");

        assert_eq!(expected, assembly);
    }

    #[test]
    fn test_disassemble_from_file() {
        let path = std::env::temp_dir().join("warden_disassemble_test.txt");
        std::fs::write(&path, "# a tiny program\n13 0 2\n9\n").expect("failed to write program");

        let args = DisassemblerArgsBuilder::new()
            .target(path.to_string_lossy().to_string())
            .build()
            .expect("failed to build args");
        let assembly = disassemble(args).expect("failed to disassemble");

        assert_eq!(assembly, "000000 checksum_push 0 2\n000003 xor\n");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_disassemble_missing_target() {
        let args = DisassemblerArgsBuilder::new()
            .target("/nonexistent/program.txt".to_string())
            .build()
            .expect("failed to build args");

        assert!(matches!(disassemble(args), Err(Error::Target(_))));
    }
}
