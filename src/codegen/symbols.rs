use std::{collections::BTreeSet, sync::LazyLock};

use fancy_regex::Regex;

use crate::ir::{Opcode, Operand, Quad};

/// Word slots the data segment reserves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataLayout {
    /// Source-level names in order of first appearance.
    pub variables: Vec<String>,
    /// Temporary numbers, ascending.
    pub temporaries: Vec<u32>,
}

impl DataLayout {
    pub fn discover(quads: &[Quad]) -> Self {
        let mut layout = DataLayout::default();
        let mut temporaries = BTreeSet::new();

        for quad in quads {
            if quad.op == Opcode::Declare
                && let Operand::Var(name) = &quad.result
            {
                layout.add_variable(name);
            }

            for operand in [&quad.arg1, &quad.arg2, &quad.result] {
                match operand {
                    Operand::Var(name) => layout.add_variable(name),
                    Operand::Temp(n) => {
                        temporaries.insert(*n);
                    }
                    _ => {}
                }
            }
        }

        layout.temporaries = temporaries.into_iter().collect();
        layout
    }

    fn add_variable(&mut self, name: &str) {
        if !self.variables.iter().any(|v| v == name) {
            self.variables.push(name.to_owned());
        }
    }

    pub fn slot_count(&self) -> usize {
        self.variables.len() + self.temporaries.len()
    }

    /// Variables in the order their final values are reported.
    pub fn report_order(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// Assembler is case-insensitive, so both patterns are too.
static RESERVED_RE: LazyLock<Result<Regex, fancy_regex::Error>> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:",
        r"[ABCD][XHL]|SI|DI|BP|SP|[CDES]S|IP",
        r"|MOV|ADD|SUB|MUL|IMUL|DIV|IDIV|CWD|NEG|INC|DEC|CMP|TEST|AND|OR|XOR|NOT",
        r"|SHL|SHR|SAL|SAR|JMP|J[NP]?[EZ]|J[GL]E?|JN[GL]E?|J[AB]E?|JN[AB]E?|LOOP|CALL|RET",
        r"|PUSH|POP|PUSHF|POPF|LEA|LDS|LES|INT|INTO|IRET|NOP|HLT|WAIT|ESC|LOCK",
        r"|ADC|SBB|CBW|ROL|ROR|RCL|RCR|XCHG|XLATB?|LAHF|SAHF|IN|OUT",
        r"|CLC|STC|CMC|CLD|STD|CLI|STI|AAA|AAD|AAM|AAS|DAA|DAS|JCXZ|LOOPN?[EZ]|RET[FN]",
        r"|REP|REPN?[EZ]|(?:MOVS|LODS|STOS|CMPS|SCAS)[BW]?",
        r"|DB|DW|DD|DQ|DT|DUP|PTR|WORD|BYTE|DWORD|QWORD|TBYTE|OFFSET|SEG|SEGMENT|ENDS",
        r"|PROC|ENDP|ASSUME|END|EQU|LABEL|ORG|EVEN|ALIGN|PAGE|PARA|STACK|GROUP|PUBLIC",
        r"|EXTRN|COMMON|AT|MEMORY|INCLUDE|MACRO|ENDM|LOCAL|REPT|IRPC?|EXITM|PURGE",
        r"|IF|ELSE|ENDIF|STRUC|RECORD|WIDTH|MASK|THIS|COMMENT|NAME|TITLE|SUBTTL",
        r"|TYPE|SIZE|LENGTH|MOD|HIGH|LOW|SHORT|NEAR|FAR|EQ|NE|LT|LE|GT|GE",
        r")$",
    ))
});

static GENERATED_RE: LazyLock<Result<Regex, fancy_regex::Error>> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:t\d+|L\d+|(?:TRUE|FALSE|END|SKIP)_\d+|(?:FUNC|msg|var)_\w*",
        r"|START|DATAS|STACKS|CODES",
        r"|PrintNumber|PositiveNumber|ConvertLoop|PrintLoop|PrintEnd)$",
    ))
});

fn matches(re: &LazyLock<Result<Regex, fancy_regex::Error>>, name: &str) -> bool {
    re.as_ref()
        .ok()
        .and_then(|re| re.is_match(name).ok())
        .unwrap_or(false)
}

/// The data-segment name for a source variable. Names the assembler would
/// read as a register, mnemonic or directive, and names that could clash
/// with generated ones, are prefixed with `var_`.
pub fn safe_name(name: &str) -> String {
    if matches(&RESERVED_RE, name) || matches(&GENERATED_RE, name) {
        format!("var_{name}")
    } else {
        name.to_owned()
    }
}

pub fn temp_name(n: u32) -> String {
    format!("t{n}")
}
