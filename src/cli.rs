//! Minimal CLI: signature file + JSON argument lists → pass/fail report
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use ensure_json::notation::load_signature;
use ensure_json::{LoadError, Mode, Signature, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check JSON argument lists against a declared signature
#[derive(Parser, Debug)]
#[command(name = "ensure-json", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document against the signature
    Check(CheckOut),
    /// print the signature's parameters in human-readable form
    Describe(DescribeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON); a malformed line is
    /// reported as a failed document and the remaining lines are still checked
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to the argument list in each document (e.g. /request/args)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// signature file (JSON)
    #[arg(long, short)]
    signature: PathBuf,

    /// allow surplus arguments regardless of the signature file's mode
    #[arg(long)]
    minimum: bool,

    /// only print failures
    #[arg(long, short)]
    quiet: bool,
}

#[derive(clap::Parser, Debug)]
struct DescribeOut {
    /// signature file (JSON)
    #[arg(long, short)]
    signature: PathBuf,
}

/// One argument list to check, with where it came from. A document that
/// could not be decoded carries its load error and fails the check.
#[derive(Debug)]
struct Document {
    origin: String,
    args: Result<Vec<Value>, LoadError>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>, LoadError> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path).map_err(|source| LoadError::Io {
                path: source_path.clone(),
                source,
            })?;
            let origin = source_path.to_string_lossy().to_string();
            if self.ndjson {
                for (i, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    out.push(self.document(format!("{origin}:{}", i + 1), line));
                }
            } else {
                out.push(self.document(origin, &source));
            }
        }
        tracing::debug!(documents = out.len(), "loaded input documents");
        Ok(out)
    }

    fn document(&self, origin: String, source: &str) -> Document {
        let args = self.decode(source);
        if let Err(error) = &args {
            tracing::debug!(%origin, %error, "undecodable input document");
        }
        Document { origin, args }
    }

    fn decode(&self, source: &str) -> Result<Vec<Value>, LoadError> {
        let json_value: serde_json::Value = ensure_json::path_de::from_str_with_path(source)?;
        let selected = match self.json_pointer.as_deref() {
            None => &json_value,
            Some(pointer) => json_value.pointer(pointer).ok_or_else(|| LoadError::PointerMiss {
                pointer: pointer.to_string(),
            })?,
        };
        Ok(argument_list(selected))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::Describe(target) => target.run(),
        }
    }
}

impl CheckOut {
    fn run(&self) -> anyhow::Result<ExitCode> {
        let signature = load_signature(&self.signature)
            .with_context(|| format!("failed to load signature {}", self.signature.display()))?;
        let mode = if self.minimum { Mode::Minimum } else { signature.mode };
        let documents = self
            .input_settings
            .load_documents()
            .context("failed to load input documents")?;

        let results = check_documents(&signature, mode, &documents);

        let mut failures = 0usize;
        for (doc, result) in documents.iter().zip(&results) {
            match result {
                Ok(()) => {
                    if !self.quiet {
                        println!("{} {}", "✓".green(), doc.origin);
                    }
                }
                Err(error) => {
                    failures += 1;
                    println!("{} {}: {}", "✗".red(), doc.origin, error);
                }
            }
        }

        let summary = format!("{} checked, {} failed", documents.len(), failures);
        if failures == 0 {
            eprintln!("{}", summary.green());
            Ok(ExitCode::SUCCESS)
        } else {
            eprintln!("{}", summary.red().bold());
            Ok(ExitCode::FAILURE)
        }
    }
}

impl DescribeOut {
    fn run(&self) -> anyhow::Result<ExitCode> {
        let signature = load_signature(&self.signature)
            .with_context(|| format!("failed to load signature {}", self.signature.display()))?;
        println!("{}", describe_lines(&signature).join("\n"));
        Ok(ExitCode::SUCCESS)
    }
}

/// Documents are independent; results come back in input order.
fn check_documents(signature: &Signature, mode: Mode, documents: &[Document]) -> Vec<Result<(), String>> {
    documents
        .par_iter()
        .map(|doc| match &doc.args {
            Ok(args) => signature.check_with(mode, args).map_err(|error| error.to_string()),
            Err(error) => Err(error.to_string()),
        })
        .collect()
}

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("ENSURE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// A JSON array is the argument list; anything else is a single argument.
fn argument_list(json: &serde_json::Value) -> Vec<Value> {
    match json {
        serde_json::Value::Array(xs) => xs.iter().map(Value::from_json).collect(),
        other => vec![Value::from_json(other)],
    }
}

fn describe_lines(signature: &Signature) -> Vec<String> {
    let mode = match signature.mode {
        Mode::Exact => "exact",
        Mode::Minimum => "minimum",
    };
    let mut lines = vec![format!("mode: {mode}")];
    lines.extend(
        signature
            .describe()
            .into_iter()
            .map(|(name, expected)| format!("{name}: {expected}")),
    );
    lines
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, LoadError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern).map_err(|source| LoadError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            for entry in entries {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(LoadError::NoMatches(pattern.to_string()));
            }
        } else {
            out.push(Path::new(pattern).to_path_buf());
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use ensure_json::notation::parse_signature;
    use serde_json::json;

    fn settings(json_pointer: Option<&str>) -> InputSettings {
        InputSettings {
            ndjson: false,
            json_pointer: json_pointer.map(str::to_string),
            input: Vec::new(),
        }
    }

    #[test]
    fn arrays_are_argument_lists() {
        assert_eq!(argument_list(&json!(["a", 1])).len(), 2);
        assert_eq!(argument_list(&json!({"a": 1})).len(), 1);
        assert!(argument_list(&json!([])).is_empty());
    }

    #[test]
    fn json_pointer_selects_arguments() {
        let doc = settings(Some("/request/args"))
            .document("call.json".to_string(), r#"{"request": {"args": ["x", 2]}}"#);
        assert_eq!(doc.args.unwrap().len(), 2);

        let doc = settings(Some("/missing")).document("call.json".to_string(), "{}");
        assert!(matches!(doc.args, Err(LoadError::PointerMiss { .. })));
    }

    #[test]
    fn documents_check_against_signature() {
        let signature = parse_signature(
            r#"{"params": [{"name": "id", "type": "string"}, {"type": ["undefined", "number"]}]}"#,
        )
        .unwrap();
        let ok = settings(None).document("a".into(), r#"["ep-1"]"#).args.unwrap();
        let bad = settings(None).document("b".into(), r#"[1, 2]"#).args.unwrap();
        assert!(signature.check(&ok).is_ok());
        assert_eq!(
            signature.check(&bad).unwrap_err().to_string(),
            "id must be a string, but it was a number"
        );
    }

    // tiny helper: a fresh directory of fixture files for one test
    fn fixture_dir(test_name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ensure-json-{test_name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            std::fs::write(dir.join(name), contents).unwrap();
        }
        dir
    }

    fn check_out(dir: &Path, inputs: &[&str], ndjson: bool) -> CheckOut {
        CheckOut {
            input_settings: InputSettings {
                ndjson,
                json_pointer: None,
                input: inputs.iter().map(|name| dir.join(name).to_string_lossy().to_string()).collect(),
            },
            signature: dir.join("sig.json"),
            minimum: false,
            quiet: true,
        }
    }

    const SIGNATURE: &str = r#"{"params": [{"name": "id", "type": "string"}]}"#;

    #[test]
    fn ndjson_lines_become_documents() {
        let dir = fixture_dir("ndjson", &[("calls.ndjson", "[\"a\"]\n\n   \n[1,\n[\"b\"]\n")]);
        let mut input = settings(None);
        input.ndjson = true;
        input.input = vec![dir.join("calls.ndjson").to_string_lossy().to_string()];

        let documents = input.load_documents().unwrap();
        let origin = dir.join("calls.ndjson").to_string_lossy().to_string();
        let origins: Vec<&str> = documents.iter().map(|doc| doc.origin.as_str()).collect();
        assert_eq!(origins, [format!("{origin}:1"), format!("{origin}:4"), format!("{origin}:5")]);

        assert_eq!(documents[0].args.as_ref().unwrap().len(), 1);
        assert!(matches!(documents[1].args, Err(LoadError::Decode { .. })), "malformed line kept as a failure");
        assert_eq!(documents[2].args.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn input_files_are_read_in_order() {
        let dir = fixture_dir("files", &[("a.json", r#"["x"]"#), ("b.json", r#"{"args": 1}"#)]);
        let mut input = settings(None);
        input.input = vec![
            dir.join("b.json").to_string_lossy().to_string(),
            dir.join("a.json").to_string_lossy().to_string(),
        ];
        let documents = input.load_documents().unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].origin.ends_with("b.json"));
        assert!(documents[1].origin.ends_with("a.json"));

        input.input = vec![dir.join("missing.json").to_string_lossy().to_string()];
        assert!(matches!(input.load_documents(), Err(LoadError::Io { .. })));
    }

    #[test]
    fn parallel_results_keep_input_order() {
        let signature = parse_signature(SIGNATURE).unwrap();
        let documents: Vec<Document> = (0..64)
            .map(|i| {
                let source = if i % 3 == 0 { "[1]".to_string() } else { format!(r#"["doc-{i}"]"#) };
                settings(None).document(format!("doc-{i}"), &source)
            })
            .collect();

        let results = check_documents(&signature, Mode::Exact, &documents);
        assert_eq!(results.len(), documents.len());
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.is_err(), i % 3 == 0, "document {i}");
        }
        assert_eq!(results[0].as_ref().unwrap_err(), "id must be a string, but it was a number");
    }

    #[test]
    fn check_exit_status_reflects_failures() {
        let dir = fixture_dir("exit", &[
            ("sig.json", SIGNATURE),
            ("good.json", r#"["ep-1"]"#),
            ("bad.json", r#"[42]"#),
            ("mixed.ndjson", "[\"ep-2\"]\nnot json\n"),
        ]);
        let failure = format!("{:?}", ExitCode::FAILURE);
        let success = format!("{:?}", ExitCode::SUCCESS);

        let code = check_out(&dir, &["good.json"], false).run().unwrap();
        assert_eq!(format!("{code:?}"), success);

        let code = check_out(&dir, &["good.json", "bad.json"], false).run().unwrap();
        assert_eq!(format!("{code:?}"), failure);

        let code = check_out(&dir, &["mixed.ndjson"], true).run().unwrap();
        assert_eq!(format!("{code:?}"), failure, "malformed line fails the run");

        let mut missing_signature = check_out(&dir, &["good.json"], false);
        missing_signature.signature = dir.join("nope.json");
        assert!(missing_signature.run().is_err());
    }

    #[test]
    fn describe_lists_mode_and_params() {
        let signature = parse_signature(
            r#"{"mode": "minimum", "params": [{"name": "id", "type": "string"}, {"type": {"x": "number"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            describe_lines(&signature),
            vec!["mode: minimum", "id: a string", "Argument #2: an object"]
        );
    }

    #[test]
    fn glob_without_matches_is_an_error() {
        let err = resolve_file_path_patterns(["/nonexistent-dir-for-tests/*.json"]).unwrap_err();
        assert!(matches!(err, LoadError::NoMatches(_)));
        let literal = resolve_file_path_patterns(["plain.json"]).unwrap();
        assert_eq!(literal, vec![PathBuf::from("plain.json")]);
    }

    #[test]
    fn cli_parses_check_command() {
        let cli = CommandLineInterface::try_parse_from([
            "ensure-json", "check", "--signature", "sig.json", "--input", "a.json", "b.json", "--minimum",
        ])
        .unwrap();
        match cli.cmd {
            Command::Check(check) => {
                assert!(check.minimum);
                assert_eq!(check.input_settings.input, vec!["a.json", "b.json"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
