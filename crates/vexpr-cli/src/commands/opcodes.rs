use std::fmt::Write as _;

use vexpr_bytecode::{Opcode, Operands};
use vexpr_core::Colors;

pub struct OpcodesArgs {
    pub category: Option<String>,
    pub color: bool,
}

pub fn run(args: OpcodesArgs) {
    match render(args.category.as_deref(), Colors::new(args.color)) {
        Ok(listing) => print!("{}", listing),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

/// Category names in catalog order.
pub fn categories() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for op in Opcode::ALL {
        let name = op.category().as_str();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// One line per opcode: byte, name, category, stack effect, operand layout,
/// and for fast opcodes the generic fallback with its precondition.
pub fn render(category: Option<&str>, c: Colors) -> Result<String, String> {
    if let Some(name) = category
        && !categories().contains(&name)
    {
        return Err(format!(
            "unknown category '{}' (expected one of: {})",
            name,
            categories().join(", ")
        ));
    }

    let mut out = String::new();
    writeln!(
        out,
        "{}{:>2}  {:<13} {:<11} {:<9} {:<10} notes{}",
        c.dim, "op", "name", "category", "effect", "operands", c.reset
    )
    .unwrap();

    let selected = Opcode::ALL
        .into_iter()
        .filter(|op| category.is_none_or(|name| op.category().as_str() == name));
    for op in selected {
        let mut line = format!(
            "{}{:>2}{}  {}{:<13}{} {:<11} {:<9} {:<10}",
            c.dim,
            op.to_u8(),
            c.reset,
            c.blue,
            op.name(),
            c.reset,
            op.category().as_str(),
            op.stack_effect().to_string(),
            operands_label(op.operands()),
        );
        if let (Some(generic), Some(precondition)) = (op.generic(), op.precondition()) {
            write!(line, " {}fast {} when {}{}", c.yellow, generic, precondition, c.reset).unwrap();
        }
        writeln!(out, "{}", line.trim_end()).unwrap();
    }
    Ok(out)
}

fn operands_label(operands: Operands) -> &'static str {
    match operands {
        Operands::None => "",
        Operands::Const => "const",
        Operands::Offset => "offset",
        Operands::Argc => "argc",
        Operands::ConstArgc => "const,argc",
        Operands::Count => "count",
        Operands::Slot => "slot",
        Operands::Kind => "kind",
    }
}
