//! SystemVerilog serialization of a [`ModuleBody`].

use crate::body::ModuleBody;
use std::fmt::{self, Display, Write};
use stitch_ir::{Declaration, Instance, Statement};

const INDENT: &str = "  ";

/// Options controlling the preamble of the generated text.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    /// Comment lines written first, each prefixed with `// `.
    pub header: Vec<String>,
    /// Files `` `include``d before the body.
    pub includes: Vec<String>,
}

/// Renders `body` as text.
///
/// Sections are written in a fixed order: header, includes, declarations,
/// assignments, instances, constants, tie-offs.
pub fn render(body: &ModuleBody, opts: &EmitOptions) -> String {
    let text = Rendered { body, opts }.to_string();
    log::debug!(
        "rendered {} declarations, {} statements, {} instances ({} bytes)",
        body.declarations.len(),
        body.statement_count(),
        body.instances.len(),
        text.len()
    );
    text
}

struct Rendered<'a> {
    body: &'a ModuleBody,
    opts: &'a EmitOptions,
}

impl Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.opts.header {
            writeln!(f, "// {line}")?;
        }
        for include in &self.opts.includes {
            writeln!(f, "`include \"{include}\"")?;
        }
        if !self.opts.header.is_empty() || !self.opts.includes.is_empty() {
            writeln!(f)?;
        }

        let body = self.body;
        section(f, &body.declarations, write_declaration)?;
        section(f, &body.assignments, write_statement)?;
        blocks(f, &body.instances, write_instance)?;
        section(f, &body.constants, write_statement)?;
        section(f, &body.tie_offs, write_statement)?;
        Ok(())
    }
}

fn section<T, W: Write>(
    out: &mut W,
    items: &[T],
    write_item: fn(&mut W, &T) -> fmt::Result,
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    for item in items {
        write_item(out, item)?;
    }
    writeln!(out)
}

/// Like [`section`], with a blank line after every item.
fn blocks<T, W: Write>(
    out: &mut W,
    items: &[T],
    write_item: fn(&mut W, &T) -> fmt::Result,
) -> fmt::Result {
    for item in items {
        write_item(out, item)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_declaration<W: Write>(out: &mut W, decl: &Declaration) -> fmt::Result {
    write!(out, "wire ")?;
    if decl.width > 1 {
        write!(out, "[{}:0] ", decl.width - 1)?;
    }
    write!(out, "{}", decl.name)?;
    if decl.arity > 1 {
        write!(out, " [{}:0]", decl.arity - 1)?;
    }
    writeln!(out, ";")
}

fn write_statement<W: Write>(out: &mut W, stmt: &Statement) -> fmt::Result {
    match stmt {
        Statement::Assign { target, value } => writeln!(out, "assign {target} = {value};"),
        Statement::Clocked {
            clock,
            target,
            value,
        } => {
            writeln!(out, "always_ff @(posedge {clock}) begin")?;
            writeln!(out, "{INDENT}{target} <= {value};")?;
            writeln!(out, "end")
        }
    }
}

fn write_instance<W: Write>(out: &mut W, inst: &Instance) -> fmt::Result {
    write!(out, "{}", inst.module)?;
    if !inst.parameters.is_empty() {
        writeln!(out, " #(")?;
        write_list(
            out,
            inst.parameters.iter().map(|(name, value)| (name, value)),
        )?;
        write!(out, ")")?;
    }
    writeln!(out, " {} (", inst.name)?;
    write_list(out, inst.connections.iter().map(|c| (&c.port, &c.net)))?;
    writeln!(out, ");")
}

fn write_list<'a, W: Write>(
    out: &mut W,
    items: impl ExactSizeIterator<Item = (&'a String, &'a String)>,
) -> fmt::Result {
    let last = items.len().saturating_sub(1);
    for (idx, (name, value)) in items.enumerate() {
        let sep = if idx == last { "" } else { "," };
        writeln!(out, "{INDENT}.{name}({value}){sep}")?;
    }
    Ok(())
}
