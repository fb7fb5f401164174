use owo_colors::OwoColorize;

use matscript_syntax::error::{Error, ErrorKind};

/// Prints `err` with the offending script line and a caret under its column.
pub fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.kind.to_string().red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len());
            marker.push_str(&" ".repeat(col.saturating_sub(1)));
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.kind);
}

pub fn provide_error_suggestions(kind: &ErrorKind) {
    match kind {
        ErrorKind::TypeMismatch(_) => {
            eprintln!("{}", "Help: Only strings can be joined with '+'.".yellow());
            eprintln!("    {}", "Example: @path = @workingDir + \"textures/\"".bright_black());
            eprintln!("    {}", "Numbers take a single, optionally negated, value: @n = -@m".bright_black());
        }
        ErrorKind::EmptyInitializer | ErrorKind::ExpectedAssignment => {
            eprintln!("{}", "Help: Variables are defined on one line.".yellow());
            eprintln!("    {}", "Example: @shine = 16".bright_black());
        }
        ErrorKind::DuplicateDeclaration { kind, .. } => {
            eprintln!("{}", format!("Help: Every {} needs a unique name.", kind).yellow());
        }
        ErrorKind::UnknownLayerType(_) => {
            eprintln!("{}", "Help: Texture layers are 'base', 'standard' or 'relief'.".yellow());
        }
        ErrorKind::MissingShaderVersion => {
            eprintln!("{}", "Help: Put the version before any source line.".yellow());
            eprintln!("    {}", "Example: vertex { version std330 source \"...\" }".bright_black());
        }
        ErrorKind::ReservedName(_) => {
            eprintln!(
                "{}",
                "Help: Names starting with 'vertexFormat' refer to built-in formats.".yellow()
            );
        }
        ErrorKind::UnbalancedBracket(_) => {
            eprintln!("{}", "Help: Check if braces, brackets and parentheses are balanced.".yellow());
        }
        ErrorKind::InvalidTokenStream => {
            eprintln!("{}", "Help: The script declares nothing.".yellow());
        }
        ErrorKind::UnterminatedString => {
            eprintln!("{}", "Help: String is missing closing quote.".yellow());
            eprintln!("    {}", "Strings may not span multiple lines".bright_black());
        }
        ErrorKind::ExpectedIdentifier => {
            eprintln!("{}", "Help: Declaration names are quoted strings.".yellow());
            eprintln!("    {}", "Example: material \"Rock\" { }".bright_black());
        }
        ErrorKind::TextureLoad(_) | ErrorKind::FileRead { .. } => {
            eprintln!("{}", "Help: File operation failed.".yellow());
            eprintln!(
                "    {}",
                "Check if the file exists and you have permission to read it".bright_black()
            );
        }
        _ => {}
    }
}

/// "1 stage", "3 stages".
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
