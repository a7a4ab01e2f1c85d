use crate::codegen::{AsmWriter, CodeGenerator, safe_name, symbols::temp_name};

const STACK_BYTES: usize = 128;

const MESSAGES: [&str; 4] = [
    "msg_header DB 'Program Results:', 0Dh, 0Ah, '$'",
    "msg_equals DB ' = ', '$'",
    "msg_newline DB 0Dh, 0Ah, '$'",
    "msg_exit DB 'Press any key...', '$'",
];

/// Prints the signed word in `AX` in decimal.
const PRINT_NUMBER: &[&str] = &[
    "PrintNumber PROC",
    "    PUSH BX",
    "    PUSH CX",
    "    PUSH DX",
    "",
    "    MOV CX, 0",
    "    MOV BX, 10",
    "    CMP AX, 0",
    "    JGE PositiveNumber",
    "",
    "    PUSH AX",
    "    MOV DL, '-'",
    "    MOV AH, 02h",
    "    INT 21h",
    "    POP AX",
    "    NEG AX",
    "",
    "PositiveNumber:",
    "    CMP AX, 0",
    "    JNE ConvertLoop",
    "    MOV DL, '0'",
    "    MOV AH, 02h",
    "    INT 21h",
    "    JMP PrintEnd",
    "",
    "ConvertLoop:",
    "    CMP AX, 0",
    "    JE PrintLoop",
    "    XOR DX, DX",
    "    DIV BX",
    "    ADD DL, '0'",
    "    PUSH DX",
    "    INC CX",
    "    JMP ConvertLoop",
    "",
    "PrintLoop:",
    "    CMP CX, 0",
    "    JE PrintEnd",
    "    POP DX",
    "    MOV AH, 02h",
    "    INT 21h",
    "    DEC CX",
    "    JMP PrintLoop",
    "",
    "PrintEnd:",
    "    POP DX",
    "    POP CX",
    "    POP BX",
    "    RET",
];

pub(super) fn print_number(code: &mut AsmWriter) {
    code.blank();
    for line in PRINT_NUMBER {
        code.line(line);
    }
    code.line("PrintNumber ENDP");
}

pub(super) fn stack_segment(program: &mut AsmWriter) {
    program.line("STACKS SEGMENT");
    program.instr(&format!("DB {STACK_BYTES} DUP (?)"));
    program.line("STACKS ENDS");
}

impl CodeGenerator {
    pub(super) fn data_segment(&self, program: &mut AsmWriter) {
        program.line("DATAS SEGMENT");
        for name in &self.layout.variables {
            program.instr(&format!("{} DW 0", safe_name(name)));
        }
        for n in &self.layout.temporaries {
            program.instr(&format!("{} DW 0", temp_name(*n)));
        }
        program.blank();
        for message in MESSAGES {
            program.instr(message);
        }
        program.line("DATAS ENDS");
    }

    fn print_string(&mut self, message: &str) {
        self.code.instr(&format!("LEA DX, {message}"));
        self.code.instr("MOV AH, 09h");
        self.code.instr("INT 21h");
    }

    /// Prints `name = value` for each variable, then waits for a key and
    /// returns to DOS.
    pub(super) fn report_and_exit(&mut self) {
        self.print_string("msg_header");
        self.code.blank();

        let names: Vec<String> = self
            .layout
            .report_order()
            .into_iter()
            .map(str::to_owned)
            .collect();

        for name in names {
            for c in name.chars() {
                self.code.instr(&format!("MOV DL, '{c}'"));
                self.code.instr("MOV AH, 02h");
                self.code.instr("INT 21h");
            }
            self.print_string("msg_equals");
            self.code
                .instr(&format!("MOV AX, [{}]", safe_name(&name)));
            self.code.instr("CALL PrintNumber");
            self.print_string("msg_newline");
            self.code.blank();
        }

        self.print_string("msg_exit");
        self.code.instr("MOV AH, 01h");
        self.code.instr("INT 21h");
        self.code.instr("MOV AH, 4Ch");
        self.code.instr("INT 21h");
    }
}
