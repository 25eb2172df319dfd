use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde_json::json;
use url::Url;

use gemini_gateway::gemini::{GeminiClient, GeminiRequest, StatusClass};
use gemini_gateway::gemtext;
use gemini_gateway::http::response::MediaType;

#[derive(Parser)]
#[command(name = "gemini-fetch")]
#[command(about = "Fetch one Gemini resource", long_about = None)]
struct Cli {
    /// Resource to fetch, e.g. gemini://example.org/
    url: String,

    /// Query to send (percent-encoded before sending)
    #[arg(short, long)]
    query: Option<String>,

    /// Render gemtext bodies to HTML
    #[arg(long)]
    html: bool,

    /// Print a JSON summary instead of the body
    #[arg(long)]
    json: bool,

    /// Whole-exchange deadline in seconds (0 = none)
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Maximum body bytes to keep
    #[arg(long, default_value_t = gemini_gateway::gemini::response::DEFAULT_MAX_BODY)]
    max_body: usize,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut url = Url::parse(&cli.url)?;
    if url.scheme() != "gemini" {
        return Err(format!("unsupported scheme: {}", url.scheme()).into());
    }
    if let Some(query) = &cli.query {
        url.set_query(Some(query));
    }
    let host = url.host_str().ok_or("URL has no host")?;
    let path = match url.path() {
        "" => "/",
        path => path,
    };

    let mut request = GeminiRequest::new(host, path);
    if let Some(port) = url.port() {
        request = request.port(u32::from(port));
    }
    if let Some(query) = url.query() {
        request = request.query(query);
    }

    let client = GeminiClient::new()?
        .with_max_body_size(cli.max_body)
        .with_deadline((cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)));
    let response = client.request(&request).await?;

    eprintln!("{} {}", response.status(), response.header());

    if cli.json {
        let summary = json!({
            "url": response.url(),
            "status": response.status().code(),
            "class": response.status_class(),
            "header": response.header(),
            "body_bytes": response.body().map(<[u8]>::len),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(body) = response.body() {
        let mut stdout = std::io::stdout().lock();
        if cli.html && MediaType::parse(response.header()).is_gemtext() {
            let html = gemtext::to_html(&String::from_utf8_lossy(body));
            writeln!(stdout, "{html}")?;
        } else {
            stdout.write_all(body)?;
        }
        stdout.flush()?;
    }

    Ok(match response.status_class() {
        StatusClass::Success => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
