use catpoint_core::error::CliError;

/// Split a shell line into words. Double or single quotes group words
/// (`sensor add "Back door" --type door`); a backslash escapes the next char.
pub fn split_line(line: &str) -> Result<Vec<String>, CliError> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let Some(next) = chars.next() else {
                    return Err(CliError::Command("trailing backslash".to_string()));
                };
                current.push(next);
                in_word = true;
            }
            '"' | '\'' if quote == Some(ch) => quote = None,
            '"' | '\'' if quote.is_none() => {
                quote = Some(ch);
                in_word = true;
            }
            c if c.is_whitespace() && quote.is_none() => {
                if in_word {
                    out.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(CliError::Command(format!("unterminated {q} quote")));
    }
    if in_word {
        out.push(current);
    }
    Ok(out)
}
