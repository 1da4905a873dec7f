use crate::prelude::{eprintln, *};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::generator::QaGenerator;
use crate::providers::ProviderOptions;
use qagen_core::{GenerationRequest, QaPair};

const WEB_MIN_QUESTIONS: usize = 1;
const WEB_MAX_QUESTIONS: usize = 20;
const DEFAULT_NUM_QUESTIONS: usize = 5;

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[clap(flatten)]
    pub provider: ProviderOptions,
}

struct WebState {
    provider: ProviderOptions,
    verbose: bool,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let addr = format!("{}:{}", options.host, options.port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(WebState {
        provider: options.provider,
        verbose: global.verbose,
    });

    let app_router = Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(generate_handler))
        .layer(cors)
        .with_state(state);

    if global.verbose {
        eprintln!("QA generator listening on http://{}", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct FlashParams {
    flash: Option<String>,
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    text: Option<String>,
    num_questions: Option<String>,
    model: Option<String>,
}

async fn index_handler(Query(params): Query<FlashParams>) -> Html<String> {
    let flash = params
        .flash
        .as_deref()
        .map(|message| (message, params.level.as_deref().unwrap_or("warning")));

    Html(render_index(flash))
}

async fn generate_handler(
    State(state): State<Arc<WebState>>,
    Form(form): Form<GenerateForm>,
) -> Response {
    let request = match validate_form(&form) {
        Ok(request) => request,
        Err(message) => return redirect_with_flash(&message, "warning").into_response(),
    };

    let use_ollama = form.model.as_deref() == Some("ollama");

    if state.verbose {
        eprintln!(
            "Generating {} pairs with {}...",
            request.requested_count,
            if use_ollama { "ollama" } else { "openai" }
        );
    }

    let generator = QaGenerator::new(state.provider.select(use_ollama));

    match generator.generate(&request).await {
        Err(err) => {
            redirect_with_flash(&format!("An error occurred: {err}"), "danger").into_response()
        }
        Ok(pairs) if pairs.is_empty() => {
            redirect_with_flash("Failed to generate QA pairs. Please try again.", "danger")
                .into_response()
        }
        Ok(pairs) => Html(render_results(&pairs)).into_response(),
    }
}

/// Validate the form fields into a generation request.
///
/// The count defaults to 5 when the field is absent or blank, must parse as
/// an integer, and must lie in [1, 20]. No provider call happens on
/// rejection.
fn validate_form(form: &GenerateForm) -> Result<GenerationRequest, String> {
    let text = form.text.as_deref().unwrap_or("").trim();
    if text.is_empty() {
        return Err("Please provide some text to generate questions from.".to_string());
    }

    let num_questions = match form.num_questions.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_NUM_QUESTIONS,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| "Number of questions must be a whole number.".to_string())?,
    };

    if !(WEB_MIN_QUESTIONS..=WEB_MAX_QUESTIONS).contains(&num_questions) {
        return Err("Number of questions must be between 1 and 20.".to_string());
    }

    Ok(GenerationRequest {
        source_text: text.to_string(),
        requested_count: num_questions,
    })
}

/// Flash messages ride back to the form in query parameters.
fn flash_location(message: &str, level: &str) -> String {
    format!("/?flash={}&level={}", urlencoding::encode(message), level)
}

fn redirect_with_flash(message: &str, level: &str) -> Redirect {
    Redirect::to(&flash_location(message, level))
}

const PAGE_STYLE: &str = "\
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
textarea { width: 100%; min-height: 12rem; }
label { display: block; margin-top: 1rem; font-weight: bold; }
button { margin-top: 1rem; padding: 0.5rem 1.5rem; }
.flash { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.flash.warning { background: #fff3cd; border: 1px solid #ffe69c; }
.flash.danger { background: #f8d7da; border: 1px solid #f1aeb5; }
.pair { border-bottom: 1px solid #ddd; padding: 0.75rem 0; }
.question { font-weight: bold; margin: 0; }
.answer { margin: 0.25rem 0 0 0; }";

/// Render the input form, with an optional flash banner above it.
fn render_index(flash: Option<(&str, &str)>) -> String {
    let banner = match flash {
        Some((message, level)) => {
            let class = if level == "danger" { "danger" } else { "warning" };
            format!(
                "<div class=\"flash {class}\">{}</div>\n",
                html_escape::encode_text(message)
            )
        }
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>QA Pair Generator</title><style>{PAGE_STYLE}</style></head>\n\
         <body>\n\
         <h1>QA Pair Generator</h1>\n\
         {banner}\
         <form method=\"post\" action=\"/generate\">\n\
         <label for=\"text\">Source text</label>\n\
         <textarea id=\"text\" name=\"text\" placeholder=\"Paste the text to generate questions from\"></textarea>\n\
         <label for=\"num_questions\">Number of questions (1-20)</label>\n\
         <input id=\"num_questions\" name=\"num_questions\" type=\"number\" min=\"1\" max=\"20\" value=\"{DEFAULT_NUM_QUESTIONS}\">\n\
         <label for=\"model\">Model</label>\n\
         <select id=\"model\" name=\"model\">\n\
         <option value=\"openai\">OpenAI</option>\n\
         <option value=\"ollama\">Ollama</option>\n\
         </select>\n\
         <button type=\"submit\">Generate</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    )
}

/// Render the generated pairs, escaped, with a back link.
fn render_results(pairs: &[QaPair]) -> String {
    let mut items = String::new();
    for (idx, pair) in pairs.iter().enumerate() {
        items.push_str(&format!(
            "<div class=\"pair\">\n\
             <p class=\"question\">Q{n}: {question}</p>\n\
             <p class=\"answer\">A{n}: {answer}</p>\n\
             </div>\n",
            n = idx + 1,
            question = html_escape::encode_text(&pair.question),
            answer = html_escape::encode_text(&pair.answer),
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>QA Pair Generator</title><style>{PAGE_STYLE}</style></head>\n\
         <body>\n\
         <h1>Generated {count} QA pairs</h1>\n\
         {items}\
         <p><a href=\"/\">Generate more</a></p>\n\
         </body>\n\
         </html>\n",
        count = pairs.len(),
    )
}
