use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};

/// Use `value` if given, otherwise ask on stdin.
///
/// Optional fields accept an empty answer.
pub fn field(label: &str, value: Option<String>, optional: bool) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let suffix = if optional { " (optional)" } else { "" };
    print!("{}{}: ", label, suffix);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 && !optional {
        bail!("{} is required", label);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Multi-line answer, ended by an empty line
pub fn paragraph(label: &str, value: Option<String>) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    println!("{} (finish with an empty line):", label);

    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
