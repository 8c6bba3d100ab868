// ----------------------------
// File: src/main.rs
// ----------------------------
use std::env;
use std::fs;
use std::io::{self, Write};

use cc386::back::{emit_cast_chain, Reg, X86Emitter};
use cc386::front::parser::{Item, Parser};
use cc386::front::semantics::{Diagnostics, Elaborator, TExprKind};
use cc386::front::token::TokenKind as K;

fn usage() { eprintln!("usage: cc386 <infile> [-o <outfile|->]"); }

fn main() {
    let mut args: Vec<String> = env::args().collect();
    args.remove(0);
    if args.is_empty() { usage(); std::process::exit(1); }

    let mut infile: Option<String> = None;
    let mut outfile: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => { if i + 1 >= args.len() { eprintln!("cc386: error: -o requires a value"); std::process::exit(1); } outfile = Some(args[i + 1].clone()); i += 2; }
            s if s.starts_with('-') => { eprintln!("cc386: error: unknown option: {}", s); std::process::exit(1); }
            s => { if infile.is_some() { eprintln!("cc386: error: multiple input files not supported"); std::process::exit(1); } infile = Some(s.to_string()); i += 1; }
        }
    }

    let infile = match infile { Some(f) => f, None => { usage(); std::process::exit(1); } };
    let source = match fs::read_to_string(&infile) { Ok(s) => s, Err(e) => { eprintln!("cc386: error: could not read {}: {}", infile, e); std::process::exit(1); } };

    let mut out: Box<dyn Write> = match outfile.as_deref() {
        Some("-") | None => Box::new(io::stdout()),
        Some(path) => match fs::File::create(path) { Ok(f) => Box::new(f), Err(e) => { eprintln!("cc386: error: could not create {}: {}", path, e); std::process::exit(1); } },
    };

    let mut parser = Parser::new(&source, &infile);
    let mut elab = Elaborator::new();
    let mut diags = Diagnostics::default();

    loop {
        match parser.ts.check(K::Eof) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => { diags.error(e.span, e.msg); break; }
        }
        if let Ok(true) = parser.ts.matches(K::Semicolon) { continue; }
        match parser.parse_item() {
            Err(e) => {
                diags.error(e.span, e.msg);
                parser.recover_to_semicolon();
            }
            Ok(Item::Decl(d)) => {
                if let Err(diag) = elab.declare(&d.name, d.ty.clone(), d.span) {
                    diags.error(diag.span, diag.msg);
                }
            }
            Ok(Item::Expr(e)) => {
                let span = e.span();
                match elab.elab(&e) {
                    Err(diag) => {
                        diags.error(diag.span, diag.msg);
                    }
                    Ok(te) => {
                        writeln!(out, "# {}:{}: type '{}'", infile, span.line, te.ty).ok();
                        if let Some(v) = const_text(&te.kind) {
                            writeln!(out, "#   constant {}", v).ok();
                        }
                        let chain = te.cast_chain();
                        if !chain.is_empty() {
                            for op in &chain {
                                writeln!(out, "#   cast {:?}", op).ok();
                            }
                            let mut em = X86Emitter::new();
                            let reg = emit_cast_chain(&te, &mut em);
                            let text = em.finish();
                            if !text.is_empty() { write!(out, "{}", text).ok(); }
                            writeln!(out, "#   result in {}", match reg { Reg::Gpr => "%eax", Reg::Fpu => "%st(0)" }).ok();
                        }
                    }
                }
            }
        }
    }

    if !diags.is_empty() {
        for d in &diags.errors {
            eprintln!("{}:{}:{}: error: {}", infile, d.span.line, d.span.col, d.msg);
        }
        eprintln!("cc386: {} error(s)", diags.errors.len());
        std::process::exit(1);
    }
}

fn const_text(k: &TExprKind) -> Option<String> {
    Some(match k {
        TExprKind::ConstLong(v) => format!("{}", v),
        TExprKind::ConstULong(v) => format!("{}u", v),
        TExprKind::ConstFloat(v) => format!("{:?}f", v),
        TExprKind::ConstDouble(v) => format!("{:?}", v),
        TExprKind::ConstPtr(v) => format!("(void *){:#x}", v),
        _ => return None,
    })
}
