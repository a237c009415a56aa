use clap::{Parser, ValueEnum};
use printh_lib::{printh, Stylesheet, Template};
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// JSON array: the format string, then one style per placeholder.
    Json,
    /// A ready-to-paste `console.log(...)` statement.
    Js,
}

#[derive(Parser)]
#[command(name = "printh")]
#[command(about = "Convert HTML-tagged text into styled console.log arguments")]
struct Args {
    /// Template text; each `{}` takes the next --value.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    template: Option<String>,

    /// Read the template from a file instead.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Value for the next `{}` placeholder. Escaped before use.
    #[arg(short = 'v', long = "value")]
    values: Vec<String>,

    /// JSON stylesheet replacing the built-in one.
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn run(args: Args) -> printh_lib::Result<String> {
    let pattern = match (&args.template, &args.file) {
        (_, Some(path)) => fs::read_to_string(path)?,
        (Some(text), None) => text.clone(),
        (None, None) => String::new(),
    };

    let mut template = Template::parse(&pattern);
    for value in args.values {
        template = template.value(value);
    }
    if let Some(path) = &args.stylesheet {
        log::info!("using stylesheet {}", path.display());
        template = template.with_stylesheet(Stylesheet::from_path(path)?);
    }

    let console_args = printh(&template);
    let output = match args.format {
        Format::Json => serde_json::to_string(&console_args)?,
        Format::Js => console_args.to_js_call("console.log"),
    };
    Ok(output)
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    match run(args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("printh: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use printh_lib::Error;

    fn run_with(argv: &[&str]) -> printh_lib::Result<String> {
        let args = Args::try_parse_from(std::iter::once("printh").chain(argv.iter().copied()))
            .expect("valid arguments");
        run(args)
    }

    #[test]
    fn test_json_output() {
        let output = run_with(&["Hi <b>{}</b>", "-v", "<you>"]).unwrap();
        assert_eq!(output, r#"["%cHi %c<you>","","font-weight:bolder"]"#);
    }

    #[test]
    fn test_js_output() {
        let output = run_with(&["<em>{}</em>", "--value", "x", "--format", "js"]).unwrap();
        assert_eq!(output, r#"console.log("%cx", "font-style:italic");"#);
    }

    #[test]
    fn test_template_from_file_with_stylesheet() {
        let dir = tempfile::TempDir::new().unwrap();
        let template = dir.path().join("greeting.html");
        let sheet = dir.path().join("sheet.json");
        std::fs::write(&template, "<k>{}</k>").unwrap();
        std::fs::write(&sheet, r#"{"k": "color:red", "*": "font-size:12px"}"#).unwrap();

        let output = run_with(&[
            "--file",
            template.to_str().unwrap(),
            "--stylesheet",
            sheet.to_str().unwrap(),
            "-v",
            "key",
        ])
        .unwrap();
        assert_eq!(output, r#"["%ckey","font-size:12px;color:red"]"#);
    }

    #[test]
    fn test_missing_stylesheet_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let err = run_with(&["x", "--stylesheet", missing.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_template_and_file_conflict() {
        assert!(Args::try_parse_from(["printh", "x", "--file", "t.html"]).is_err());
        assert!(Args::try_parse_from(["printh"]).is_err());
    }
}
