use std::io::Write;

use courier::client::HttpClient;
use courier::config::Config;
use courier::http::headers::Headers;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut client = HttpClient::connect(&cfg.client).await?;
    println!("connected to {}:{}", cfg.client.host, cfg.client.port);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(method) = prompt(&mut lines, "method (GET/POST): ").await? else {
            break;
        };
        let method = method.trim().to_uppercase();

        let Some(path) = prompt(&mut lines, "path (e.g. /hello, /echo): ").await? else {
            break;
        };

        let body = if method == "POST" {
            match prompt(&mut lines, "body (e.g. username=test&password=123): ").await? {
                Some(body) => body,
                None => break,
            }
        } else {
            String::new()
        };

        let response = client
            .send(&method, path.trim(), body.as_bytes(), &Headers::new())
            .await?;

        println!("status: {} {}", response.status, response.reason);
        for (name, value) in response.headers.iter() {
            println!("{name}: {value}");
        }
        if !response.body.is_empty() {
            println!("body: {}", String::from_utf8_lossy(&response.body));
        }

        let Some(again) = prompt(&mut lines, "send another request? (y/n): ").await? else {
            break;
        };
        if !again.trim().eq_ignore_ascii_case("y") {
            break;
        }
    }

    println!("session ended");
    Ok(())
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    text: &str,
) -> anyhow::Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
