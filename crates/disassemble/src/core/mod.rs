use std::{fmt::Write, time::Instant};

use crate::{error::Error, interfaces::DisassemblerArgs};
use tracing::{debug, info, warn};
use warden_vm::core::{opcodes::Opcode, types::Word};

/// Disassembles a Warden program into readable assembly
///
/// The target is resolved to a word list and passed to [`disassemble_words`].
///
/// # Arguments
///
/// * `args` - Arguments specifying the target and disassembly options
///
/// # Returns
///
/// A string containing one line per instruction
pub fn disassemble(args: DisassemblerArgs) -> Result<String, Error> {
    let start_time = Instant::now();

    // get the program from the target
    let start_fetch_time = Instant::now();
    let program = args.get_program()?;
    debug!("fetching target program took {:?}", start_fetch_time.elapsed());

    let asm = disassemble_words(&program, args.decimal_counter);

    debug!("disassembly took {:?}", start_time.elapsed());
    Ok(asm)
}

/// Renders `program` as assembly, one `<address> <mnemonic> <immediates...>` line per
/// instruction.
///
/// Words that are not opcodes are rendered as `unknown` and occupy one address. The listing
/// stops at an instruction whose immediates run past the end of the program.
///
/// ```
/// use warden_disassembler::disassemble_words;
///
/// assert_eq!(disassemble_words(&[0, 5, 3], false), "000000 push 5\n000002 ret\n");
/// ```
pub fn disassemble_words(program: &[Word], decimal_counter: bool) -> String {
    let mut program_counter = 0;
    let mut asm = String::new();

    // iterate over the program, disassembling each instruction
    while program_counter < program.len() {
        let word = program[program_counter];
        let (name, immediates) = match Opcode::try_from(word) {
            Ok(opcode) => (opcode.name(), opcode.info().immediates() as usize),
            Err(_) => ("unknown", 0),
        };

        let operands =
            match program.get(program_counter + 1..program_counter + 1 + immediates) {
                Some(operands) => operands,
                None => {
                    warn!("truncated `{name}` at {program_counter}, stopping");
                    break;
                }
            };

        if decimal_counter {
            let _ = write!(asm, "{program_counter} {name}");
        } else {
            let _ = write!(asm, "{program_counter:06x} {name}");
        }
        for operand in operands {
            let _ = write!(asm, " {operand}");
        }
        asm.push('\n');

        program_counter += 1 + immediates;
    }

    info!("disassembled {} words successfully", program_counter);
    asm
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_vm::core::opcodes::*;

    #[test]
    fn test_unknown_words_take_one_address() {
        let asm = disassemble_words(&[99, -1, RET], false);
        assert_eq!(asm, "000000 unknown\n000001 unknown\n000002 ret\n");
    }

    #[test]
    fn test_truncated_operands_stop_listing() {
        let asm = disassemble_words(&[PUSH, 1, CHECKSUM_CHECK, 0, 4], false);
        assert_eq!(asm, "000000 push 1\n");
    }

    #[test]
    fn test_decimal_counter() {
        let words = [PUSH_JUNK, 0, MUTATE, 0, 8, TIMING_CHECK, ROTL, 5, RET];
        let asm = disassemble_words(&words, true);
        assert_eq!(asm, "0 push_junk 0\n2 mutate 0 8\n5 timing_check\n6 rotl 5\n8 ret\n");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(disassemble_words(&[], false), "");
    }
}
