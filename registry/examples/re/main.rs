use std::io::{self, BufRead};

use ere_registry::{CompileFlags, ExecFlags, Registry};

const USAGE: &str = "re [-i] [-G] [-d] PATTERN";

fn main() -> Result<(), String> {
    let (flags, debug, args) = std::env::args().skip(1).fold(
        (CompileFlags::EXTENDED, false, vec![]),
        |(flags, debug, mut args), arg| match arg.as_str() {
            "--debug" | "-d" => (flags, true, args),
            "--ignore-case" | "-i" => (flags | CompileFlags::ICASE, debug, args),
            "--basic-regexp" | "-G" => (flags - CompileFlags::EXTENDED, debug, args),
            _ => {
                args.push(arg);
                (flags, debug, args)
            }
        },
    );

    let pattern = match args.as_slice() {
        [pattern] => Ok(pattern.as_str()),
        _ => Err(USAGE.to_string()),
    }?;

    let registry = Registry::new();
    let (scoped, _) = registry
        .compile_scoped(pattern, flags)
        .map_err(|e| e.to_string())?;

    if debug {
        let compiled = registry
            .lookup(scoped.handle())
            .map_err(|e| e.to_string())?;

        println!(
            "DEBUG
--------
{}--------
",
            compiled.program()
        )
    }

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;

        match scoped.exec(line.as_bytes(), ExecFlags::empty()) {
            Ok(Some(_)) => println!("{}", line),
            Ok(None) => continue,
            Err(e) => return Err(e.to_string()),
        }
    }

    Ok(())
}
