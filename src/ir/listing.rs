use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::{
    driver::DriverError,
    ir::{Label, Opcode, Operand, Quad, VAR_ESCAPE},
};

static LINE_RE: LazyLock<Result<Regex, fancy_regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*:\s*\((.*)\)\s*$"));

static OPERAND_RE: LazyLock<Result<Regex, fancy_regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?<empty>_)|t(?<temp>\d+)|L(?<label>\d+)|FUNC_(?<func>\w+)|(?<int>-?\d+)|(?<real>-?\d+\.\d*(?:[eE][+-]?\d+)?|-?\d+[eE][+-]?\d+)|(?<var>[A-Za-z_]\w*))$",
    )
});

fn regex(
    re: &'static LazyLock<Result<Regex, fancy_regex::Error>>,
) -> Result<&'static Regex, DriverError> {
    re.as_ref().map_err(|e| DriverError::Pattern(e.to_string()))
}

/// One quad per line: `<index>: (<op>, <arg1>, <arg2>, <result>)`.
pub fn listing(quads: &[Quad]) -> String {
    quads
        .iter()
        .enumerate()
        .map(|(i, quad)| format!("{i}: {quad}\n"))
        .collect()
}

/// Parses a listing produced by [`listing`]. Indices are not checked against
/// positions; quads keep their order in the text.
pub fn read_listing(text: &str) -> Result<Vec<Quad>, DriverError> {
    let line_re = regex(&LINE_RE)?;
    let mut quads = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let bad_line = |reason: String| DriverError::Listing {
            line: index + 1,
            reason,
        };

        let captures = line_re
            .captures(line)?
            .ok_or_else(|| bad_line("expected '<index>: (<op>, <a1>, <a2>, <res>)'".to_owned()))?;
        let body = captures.get(2).map_or("", |m| m.as_str());

        let fields: Vec<&str> = body.split(',').map(str::trim).collect();
        let [op, arg1, arg2, result] = fields.as_slice() else {
            return Err(bad_line(format!("expected 4 fields, found {}", fields.len())));
        };

        let op = Opcode::from_spelling(op).ok_or_else(|| bad_line(format!("unknown op '{op}'")))?;
        let arg1 = read_operand(arg1).map_err(|e| bad_line(e.to_string()))?;
        let arg2 = read_operand(arg2).map_err(|e| bad_line(e.to_string()))?;
        let result = if op.targets_label() {
            read_label(result).ok_or_else(|| bad_line(format!("'{result}' is not a label")))?
        } else {
            read_operand(result).map_err(|e| bad_line(e.to_string()))?
        };

        quads.push(Quad::new(op, arg1, arg2, result));
    }

    Ok(quads)
}

fn read_label(text: &str) -> Option<Operand> {
    if let Some(n) = text.strip_prefix('L').and_then(|n| n.parse().ok()) {
        return Some(Operand::Label(Label::Numbered(n)));
    }
    if let Some(name) = text.strip_prefix("FUNC_").filter(|name| !name.is_empty()) {
        return Some(Operand::Label(Label::Func(name.to_owned())));
    }
    None
}

fn read_operand(text: &str) -> Result<Operand, DriverError> {
    let operand_re = regex(&OPERAND_RE)?;
    let Some(captures) = operand_re.captures(text)? else {
        return Err(DriverError::Operand(text.to_owned()));
    };

    let group = |name: &str| captures.name(name).map(|m| m.as_str());
    let malformed = || DriverError::Operand(text.to_owned());

    let operand = if group("empty").is_some() {
        Operand::Empty
    } else if let Some(n) = group("temp") {
        Operand::Temp(n.parse().map_err(|_| malformed())?)
    } else if let Some(n) = group("label") {
        Operand::Label(Label::Numbered(n.parse().map_err(|_| malformed())?))
    } else if let Some(name) = group("func") {
        Operand::Label(Label::Func(name.to_owned()))
    } else if let Some(value) = group("int") {
        Operand::Int(value.parse().map_err(|_| malformed())?)
    } else if let Some(value) = group("real") {
        Operand::Real(value.parse().map_err(|_| malformed())?)
    } else if let Some(name) = group("var") {
        Operand::Var(name.strip_prefix(VAR_ESCAPE).unwrap_or(name).to_owned())
    } else {
        return Err(malformed());
    };

    Ok(operand)
}
