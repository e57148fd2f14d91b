use clap::Parser;
use colored::Colorize;
use sqlid_core::{canonicalize, decode, encode, NormalizationOptions, SqlId};
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// SQL ID — content-based identifiers for SQL statements
///
/// Calculate the SQL ID and hash of each statement given as an argument, a
/// file path, or on stdin. Statements that differ only in case, whitespace,
/// comments, a trailing semicolon, WITH-clause aliases or literal values get
/// the same ID.
#[derive(Parser)]
#[command(name = "sqlid", version, about, long_about = None)]
struct Cli {
    /// SQL statements, or paths to files holding one statement each
    inputs: Vec<String>,

    /// Only print the SQL hash
    #[arg(short = 'a', long = "hash", visible_alias = "only-hash")]
    only_hash: bool,

    /// Only print the SQL ID
    #[arg(short = 'i', long = "id", visible_aliases = ["only-id", "sqlid"])]
    only_id: bool,

    /// Don't print the input name
    #[arg(short = 'N', long)]
    no_name: bool,

    /// Case sensitive
    #[arg(short = 'I', long)]
    case: bool,

    /// Keep /* */ comments
    #[arg(short = 'C', long)]
    no_uncomment: bool,

    /// Keep whitespace as is (implies --no-uncomment)
    #[arg(short = 'Z', long)]
    no_compress: bool,

    /// Don't append a trailing newline
    #[arg(short = 'L', long)]
    no_newline: bool,

    /// Keep WITH-clause aliases intact
    #[arg(short = 'W', long)]
    keep_with: bool,

    /// Keep string and number literals
    #[arg(short = 'R', long)]
    keep_const: bool,

    /// Keep a trailing semicolon
    #[arg(short = 'S', long, visible_alias = "semi-colon")]
    semicolon: bool,

    /// Separate fields with tabs instead of spaces
    #[arg(short = 't', long = "tsv", visible_aliases = ["tabs", "as-tsv"])]
    tsv: bool,

    /// Also print the normal form
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Output format: i = SQL ID, h = hash, n = input name,
    /// q = normal form, s = original text; \n and \t are expanded
    #[arg(short = 'F', long, value_name = "STR")]
    format: Option<String>,

    /// Don't read a statement from stdin
    #[arg(short = 'x', long)]
    no_stdin: bool,

    /// Print one JSON object per statement
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Print the 32-bit value encoded by a SQL ID and exit
    #[arg(long, value_name = "ID")]
    decode: Option<String>,
}

impl Cli {
    fn normalization_options(&self) -> NormalizationOptions {
        NormalizationOptions {
            lowercase: !self.case,
            strip_comments: !self.no_uncomment && !self.no_compress,
            strip_trailing_semicolon: !self.semicolon,
            collapse_whitespace: !self.no_compress,
            append_trailing_newline: !self.no_newline,
            rewrite_with_aliases: !self.keep_with,
            blank_literals: !self.keep_const,
        }
    }

    fn separator(&self) -> &'static str {
        if self.tsv {
            "\t"
        } else {
            " "
        }
    }
}

/// One statement and the name it is reported under
struct Statement {
    name: String,
    text: String,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    };

    process::exit(exit_code);
}

/// Logs go to stderr so stdout stays parseable. Level comes from `SQLID_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SQLID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> sqlid_core::Result<()> {
    let mut out = io::stdout().lock();

    if let Some(id) = &cli.decode {
        let value = decode(id)?;
        writeln!(out, "{}", value)?;
        return Ok(());
    }

    let read_stdin = !cli.no_stdin && !io::stdin().is_terminal();
    let statements = collect_statements(cli, read_stdin)?;
    let stdin_only = read_stdin && statements.len() == 1;
    let options = cli.normalization_options();
    debug!(?options, count = statements.len(), "hashing statements");

    for stmt in &statements {
        if stmt.text.trim().is_empty() {
            continue;
        }
        let normal_form = canonicalize(&stmt.text, &options);
        let sqlid = encode(&normal_form);
        debug!(name = %stmt.name, id = %sqlid.id, hash = sqlid.hash, "computed");

        if cli.json {
            let record = serde_json::json!({
                "name": stmt.name,
                "id": sqlid.id,
                "hash": sqlid.hash,
                "normal_form": normal_form,
            });
            writeln!(out, "{}", record)?;
        } else if let Some(format) = &cli.format {
            out.write_all(render_format(format, stmt, &normal_form, &sqlid).as_bytes())?;
        } else {
            writeln!(out, "{}", render_line(cli, stmt, &normal_form, &sqlid, stdin_only))?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Arguments naming an existing file are read; anything else is SQL text.
/// Stdin, when read, is the last statement and is named `--`.
fn collect_statements(cli: &Cli, read_stdin: bool) -> sqlid_core::Result<Vec<Statement>> {
    let mut statements = Vec::with_capacity(cli.inputs.len() + 1);

    for (i, arg) in cli.inputs.iter().enumerate() {
        let statement = if Path::new(arg).is_file() {
            Statement {
                name: arg.clone(),
                text: std::fs::read_to_string(arg)
                    .map_err(|e| sqlid_core::Error::Io(format!("{}: {}", arg, e)))?,
            }
        } else {
            Statement {
                name: format!("arg[{}]", i),
                text: arg.clone(),
            }
        };
        statements.push(statement);
    }

    if read_stdin {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        statements.push(Statement {
            name: "--".to_string(),
            text,
        });
    }

    if cli.no_name {
        for stmt in &mut statements {
            stmt.name.clear();
        }
    }

    Ok(statements)
}

fn render_line(
    cli: &Cli,
    stmt: &Statement,
    normal_form: &str,
    sqlid: &SqlId,
    stdin_only: bool,
) -> String {
    let sep = cli.separator();
    if stdin_only {
        if cli.only_id {
            sqlid.id.clone()
        } else if cli.only_hash {
            sqlid.hash.to_string()
        } else {
            format!("{}{}{}", sqlid.id, sep, sqlid.hash)
        }
    } else if cli.only_id {
        format!("{}{}{}", sqlid.id, sep, stmt.name)
    } else if cli.only_hash {
        format!("{}{}{}", sqlid.hash, sep, stmt.name)
    } else if cli.verbose {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            sqlid.id,
            sqlid.hash,
            stmt.name,
            normal_form,
            sep = sep
        )
    } else {
        format!("{}{sep}{}{sep}{}", sqlid.id, sqlid.hash, stmt.name, sep = sep)
    }
}

/// Expand a `-F` format string. No newline is added; use `\n` for one.
fn render_format(format: &str, stmt: &Statement, normal_form: &str, sqlid: &SqlId) -> String {
    let format = format.replace("\\n", "\n").replace("\\t", "\t");
    let mut out = String::new();
    for directive in format.chars() {
        match directive {
            'i' => out.push_str(&sqlid.id),
            'h' => out.push_str(&sqlid.hash.to_string()),
            'n' => out.push_str(&stmt.name),
            'q' | 'c' => out.push_str(normal_form),
            's' => out.push_str(&stmt.text),
            other => out.push(other),
        }
    }
    out
}
