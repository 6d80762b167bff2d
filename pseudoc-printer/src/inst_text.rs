use crate::options::PrinterOptions;
use pseudoc_ir::Inst;
use std::fmt::Write;

/// Render one instruction per [`PrinterOptions`], or `None` if it should be
/// elided entirely (dead and `--no-dead` was given).
pub fn render(inst: &Inst, opts: &PrinterOptions) -> Option<String> {
    if opts.no_dead && inst.dead {
        return None;
    }
    let mut s = String::new();
    if inst.dead {
        s.push_str("(dead) ");
    }
    if opts.repr {
        write!(s, "{inst:?}").unwrap();
    } else {
        write!(s, "{inst}").unwrap();
    }
    if opts.inst_addr {
        if let Some(addr) = inst.addr {
            write!(s, " @ 0x{addr:x}").unwrap();
        }
    }
    if !opts.no_comments {
        for comment in &inst.comments {
            write!(s, "  ; {comment}").unwrap();
        }
    }
    Some(s)
}
