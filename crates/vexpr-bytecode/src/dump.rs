//! Human-readable program listing.
//!
//! Two sections: `[constants]` with one pool entry per line, then `[code]`
//! with one instruction per line, annotated with the referenced constant or
//! the resolved jump destination.

use std::fmt::Write as _;

use vexpr_core::Colors;

use crate::instruction::Instruction;
use crate::program::Program;

/// Column at which annotations start.
const COMMENT_COLUMN: usize = 16;

/// Generate a listing of `program`.
pub fn dump(program: &Program, colors: Colors) -> String {
    let mut out = String::new();
    dump_constants(&mut out, program, colors);
    out.push('\n');
    dump_code(&mut out, program, colors);
    out
}

/// Digits needed to print indices below `count`.
pub fn width_for_count(count: usize) -> usize {
    let max = count.saturating_sub(1);
    max.checked_ilog10().map_or(1, |d| d as usize + 1)
}

fn dump_constants(out: &mut String, program: &Program, c: Colors) {
    writeln!(out, "{}[constants]{}", c.blue, c.reset).unwrap();
    for (i, constant) in program.constants().iter().enumerate() {
        writeln!(
            out,
            "C{i} = {} {}{constant}{}",
            constant.kind_name(),
            c.green,
            c.reset
        )
        .unwrap();
    }
}

fn dump_code(out: &mut String, program: &Program, c: Colors) {
    let w = width_for_count(program.len());
    writeln!(out, "{}[code]{}", c.blue, c.reset).unwrap();
    for (ip, inst) in program.code().iter().enumerate() {
        let name = inst.opcode().name();
        let text = inst.to_string();
        let operands = &text[name.len()..];

        write!(
            out,
            "{}{ip:0w$}{}  {name}{}{operands}{}",
            c.dim, c.reset, c.yellow, c.reset
        )
        .unwrap();
        if let Some(comment) = annotate(program, ip, inst) {
            let pad = COMMENT_COLUMN.saturating_sub(text.len());
            write!(out, "{:pad$} {}; {comment}{}", "", c.dim, c.reset).unwrap();
        }
        out.push('\n');
    }
}

fn annotate(program: &Program, ip: usize, inst: &Instruction) -> Option<String> {
    if let Some(target) = inst.jump_target(ip) {
        return Some(if target == program.len() as i64 {
            "→ end".to_string()
        } else {
            format!("→ {target}")
        });
    }
    let id = inst.constant()?;
    Some(match program.constant(id) {
        Some(constant) => constant.to_string(),
        None => "<missing>".to_string(),
    })
}
