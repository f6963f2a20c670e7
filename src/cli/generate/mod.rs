//! Generate command - one-shot script generation from a JSON model description

use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use crate::domain::{CompileOutcome, DomainError, ModelDescription, ScriptCompiler};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the model description JSON file (reads stdin when omitted)
    pub input: Option<PathBuf>,
}

/// Compile a model description and print the training script to stdout.
/// Validation findings go to stderr; a rejected description exits nonzero.
pub fn run(args: &GenerateArgs) -> anyhow::Result<()> {
    let raw = read_input(args)?;
    let description: ModelDescription = serde_json::from_str(&raw)
        .map_err(|e| DomainError::malformed_request(format!("invalid model description: {}", e)))?;

    let compiler = ScriptCompiler::new();
    match compiler.compile(&description) {
        CompileOutcome::Success {
            document,
            advisories,
        } => {
            for finding in &advisories {
                eprintln!("warning: {}", finding);
            }
            print!("{}", document);
            Ok(())
        }
        CompileOutcome::Rejected { errors, advisories } => {
            for finding in &errors {
                eprintln!("error: {}", finding);
            }
            for finding in &advisories {
                eprintln!("warning: {}", finding);
            }
            Err(DomainError::validation(format!(
                "model description failed validation ({} errors)",
                errors.len()
            ))
            .into())
        }
    }
}

fn read_input(args: &GenerateArgs) -> anyhow::Result<String> {
    match &args.input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_from_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("modelforge_generate_test.json");
        std::fs::write(
            &path,
            r#"{"layers": [{"type": "Flatten"}, {"type": "Dense", "params": {"units": 10}}], "inputConfig": {"inputShape": "28,28,1"}}"#,
        )
        .unwrap();

        let args = GenerateArgs {
            input: Some(path.clone()),
        };
        assert!(run(&args).is_ok());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_generate_rejects_invalid_description() {
        let dir = std::env::temp_dir();
        let path = dir.join("modelforge_generate_invalid_test.json");
        std::fs::write(
            &path,
            r#"{"layers": [], "trainingConfig": {"learningRate": -1}}"#,
        )
        .unwrap();

        let args = GenerateArgs {
            input: Some(path.clone()),
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_generate_rejects_malformed_json() {
        let dir = std::env::temp_dir();
        let path = dir.join("modelforge_generate_malformed_test.json");
        std::fs::write(&path, r#"{"layers": "Dense"}"#).unwrap();

        let args = GenerateArgs {
            input: Some(path.clone()),
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::MalformedRequest { .. })
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_generate_missing_file() {
        let args = GenerateArgs {
            input: Some(PathBuf::from("/nonexistent/model.json")),
        };
        assert!(run(&args).is_err());
    }
}
