use crate::prelude::{println, *};
use colored::Colorize;
use prettytable::row;
use std::path::{Path, PathBuf};

use crate::generator::QaGenerator;
use crate::providers::ProviderOptions;
use qagen_core::{GenerationRequest, QaPair};

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// Input text file
    pub input_file: String,

    /// Output JSON file name
    pub output_file: String,

    /// Number of question-answer pairs to generate
    pub max_questions: usize,

    /// Use the local Ollama endpoint instead of the hosted chat provider
    #[clap(long)]
    pub use_ollama: bool,

    /// Directory where output files are written
    #[arg(long, env = "QAGEN_OUTPUT_DIR", default_value = "qa_pairs")]
    pub output_dir: String,

    /// Print the generated pairs to stdout as JSON
    #[arg(long)]
    pub json: bool,

    #[clap(flatten)]
    pub provider: ProviderOptions,
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    if options.max_questions == 0 {
        return Err(eyre!("max_questions must be a positive number"));
    }

    if global.verbose {
        let provider = if options.use_ollama { "ollama" } else { "openai" };
        println!("Provider: {provider}");
        println!("Reading {}...", options.input_file);
    }

    let pairs = generate_file_data(&options).await?;

    let output_path =
        write_pairs(Path::new(&options.output_dir), &options.output_file, &pairs).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else if !pairs.is_empty() {
        print!("{}", format_pairs_table(&pairs));
    }

    println!(
        "{} {} QA pairs and saved to {}",
        "Generated".green().bold(),
        pairs.len(),
        output_path.display().to_string().cyan()
    );

    Ok(())
}

/// Read the input file and run one generation against the selected provider.
pub async fn generate_file_data(options: &GenerateOptions) -> Result<Vec<QaPair>> {
    let source_text = tokio::fs::read_to_string(&options.input_file)
        .await
        .map_err(|e| eyre!("Failed to read file '{}': {}", options.input_file, e))?;

    let request = GenerationRequest {
        source_text,
        requested_count: options.max_questions,
    };

    let generator = QaGenerator::new(options.provider.select(options.use_ollama));
    generator.generate(&request).await
}

/// Write the pairs as indented JSON under the output directory, creating
/// the directory if absent. Returns the full output path.
///
/// serde_json's pretty writer uses 2-space indentation and leaves non-ASCII
/// characters unescaped, which is the on-disk format callers read back.
pub async fn write_pairs(
    output_dir: &Path,
    output_file: &str,
    pairs: &[QaPair],
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
        eyre!(
            "Failed to create output directory '{}': {}",
            output_dir.display(),
            e
        )
    })?;

    let path = output_dir.join(output_file);
    let json = serde_json::to_string_pretty(pairs)?;

    tokio::fs::write(&path, json)
        .await
        .map_err(|e| eyre!("Failed to write '{}': {}", path.display(), e))?;

    Ok(path)
}

/// Render a preview table of the generated pairs.
fn format_pairs_table(pairs: &[QaPair]) -> String {
    let mut table = new_table();
    table.set_titles(row!["#", "Question", "Answer"]);

    for (idx, pair) in pairs.iter().enumerate() {
        table.add_row(row![
            idx + 1,
            truncate_text(&pair.question, 60),
            truncate_text(&pair.answer, 60),
        ]);
    }

    table.to_string()
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(question: &str, answer: &str) -> QaPair {
        QaPair {
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_pairs_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let pairs = vec![
            pair("What is 2+2?", "4"),
            pair("Capital of France?", "Paris"),
        ];

        let path = write_pairs(dir.path(), "out.json", &pairs).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Vec<QaPair> = serde_json::from_str(&written).unwrap();

        assert_eq!(parsed, pairs);
    }

    #[tokio::test]
    async fn test_write_pairs_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("qa_pairs");

        let path = write_pairs(&nested, "out.json", &[pair("Q", "A")])
            .await
            .unwrap();

        assert!(nested.is_dir());
        assert_eq!(path, nested.join("out.json"));
    }

    #[tokio::test]
    async fn test_write_pairs_preserves_non_ascii() {
        let dir = tempfile::TempDir::new().unwrap();
        let pairs = vec![pair("Qu'est-ce qu'un café?", "Un petit noir à Paris")];

        let path = write_pairs(dir.path(), "out.json", &pairs).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();

        // Unescaped UTF-8 on disk, not \u sequences.
        assert!(written.contains("café"));
        assert!(written.contains("à Paris"));
    }

    #[tokio::test]
    async fn test_write_pairs_empty_result_is_empty_array() {
        let dir = tempfile::TempDir::new().unwrap();

        let path = write_pairs(dir.path(), "out.json", &[]).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();

        assert_eq!(written, "[]");
    }

    #[test]
    fn test_format_pairs_table_lists_pairs() {
        let table = format_pairs_table(&[pair("What is 2+2?", "4"), pair("Q2", "A2")]);

        assert!(table.contains("Question"));
        assert!(table.contains("What is 2+2?"));
        assert!(table.contains("A2"));
    }

    #[test]
    fn test_truncate_text_short_passes_through() {
        assert_eq!(truncate_text("short", 60), "short");
    }

    #[test]
    fn test_truncate_text_long_is_clipped() {
        let long = "x".repeat(80);
        let truncated = truncate_text(&long, 60);

        assert_eq!(truncated.len(), 63);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_text_multibyte_safe() {
        let text = "é".repeat(70);
        let truncated = truncate_text(&text, 60);

        assert_eq!(truncated.chars().count(), 63);
    }
}
