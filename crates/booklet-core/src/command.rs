//! JSON command envelope for scripted use

use crate::options::BookletOptions;
use crate::pipeline::{create_booklets, NoProgress};
use crate::source::{validate_pdf, InputFile, PdfInfo};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A file carried inline, base64-encoded
#[derive(Debug, Clone, Deserialize)]
pub struct EncodedFile {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum BookletCommand {
    Create {
        files: Vec<EncodedFile>,
        #[serde(default)]
        options: BookletOptions,
    },
    Inspect {
        file: EncodedFile,
    },
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ProcessResult {
    pub success: bool,
    /// Base64-encoded PDF data, one entry per booklet
    pub data: Vec<String>,
    /// Document info for `Inspect`
    pub info: Option<PdfInfo>,
    pub error: Option<String>,
    pub metrics: Option<ProcessMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessMetrics {
    pub input_size_bytes: usize,
    pub output_size_bytes: usize,
    pub page_count: u32,
    pub processing_time_ms: u64,
}

impl ProcessResult {
    fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

fn decode(file: &EncodedFile) -> Result<InputFile, String> {
    STANDARD
        .decode(file.data.as_bytes())
        .map(|bytes| InputFile::new(file.name.clone(), bytes))
        .map_err(|e| format!("{}: invalid base64: {}", file.name, e))
}

/// Execute a command. Failures are reported in the result, never panicked.
pub fn process_command(command: BookletCommand) -> ProcessResult {
    let started = Instant::now();

    match command {
        BookletCommand::Create { files, options } => {
            let inputs = match files.iter().map(decode).collect::<Result<Vec<_>, _>>() {
                Ok(inputs) => inputs,
                Err(e) => return ProcessResult::failure(e),
            };
            let input_size_bytes = inputs.iter().map(|i| i.bytes.len()).sum();

            match create_booklets(&inputs, &options, &NoProgress) {
                Ok(booklets) => ProcessResult {
                    success: true,
                    data: booklets.iter().map(|b| STANDARD.encode(&b.bytes)).collect(),
                    metrics: Some(ProcessMetrics {
                        input_size_bytes,
                        output_size_bytes: booklets.iter().map(|b| b.bytes.len()).sum(),
                        page_count: booklets.iter().map(|b| b.page_count).sum(),
                        processing_time_ms: started.elapsed().as_millis() as u64,
                    }),
                    ..Default::default()
                },
                Err(e) => ProcessResult::failure(e),
            }
        }
        BookletCommand::Inspect { file } => {
            let input = match decode(&file) {
                Ok(input) => input,
                Err(e) => return ProcessResult::failure(e),
            };
            match validate_pdf(&input.bytes) {
                Ok(info) => ProcessResult {
                    success: true,
                    info: Some(info),
                    ..Default::default()
                },
                Err(e) => ProcessResult::failure(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;

    fn encoded(name: &str, pages: u32) -> String {
        format!(
            r#"{{"name":"{}","data":"{}"}}"#,
            name,
            STANDARD.encode(create_test_pdf(pages, name))
        )
    }

    #[test]
    fn test_command_deserializes_create() {
        let json = r#"{"type":"Create","files":[]}"#;
        let cmd: BookletCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, BookletCommand::Create { .. }));
    }

    #[test]
    fn test_command_deserializes_inspect() {
        let json = r#"{"type":"Inspect","file":{"name":"a.pdf","data":""}}"#;
        let cmd: BookletCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, BookletCommand::Inspect { .. }));
    }

    #[test]
    fn test_create_command_produces_booklets() {
        let json = format!(
            r#"{{"type":"Create","files":[{},{}],"options":{{"split_booklet":true,"sheets_per_booklet":1}}}}"#,
            encoded("a.pdf", 3),
            encoded("b.pdf", 3)
        );
        let cmd: BookletCommand = serde_json::from_str(&json).unwrap();

        let result = process_command(cmd);
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.data.len(), 2);
        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.page_count, 4);
        assert!(metrics.output_size_bytes > 0);
    }

    #[test]
    fn test_inspect_command_reports_info() {
        let json = format!(r#"{{"type":"Inspect","file":{}}}"#, encoded("a.pdf", 7));
        let cmd: BookletCommand = serde_json::from_str(&json).unwrap();

        let result = process_command(cmd);
        assert!(result.success);
        assert_eq!(result.info.unwrap().page_count, 7);
    }

    #[test]
    fn test_bad_base64_is_reported() {
        let json = r#"{"type":"Create","files":[{"name":"a.pdf","data":"***"}]}"#;
        let cmd: BookletCommand = serde_json::from_str(json).unwrap();

        let result = process_command(cmd);
        assert!(!result.success);
        assert!(result.error.unwrap().contains("invalid base64"));
    }

    #[test]
    fn test_empty_create_is_reported() {
        let json = r#"{"type":"Create","files":[]}"#;
        let cmd: BookletCommand = serde_json::from_str(json).unwrap();

        let result = process_command(cmd);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No documents to process"));
    }
}
