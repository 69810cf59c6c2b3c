use std::path::{Path, PathBuf};
use std::time::Duration;

use thumbgen::config::{DEFAULT_FONT_DIR, DEFAULT_FONT_FALLBACK_DIR, DEFAULT_PORT};
use thumbgen::render::{render, FontResolver, RenderContext, Variant, DEFAULT_WATERMARK};
use thumbgen::ThumbnailPayload;

fn die(msg: &str) -> ! {
    eprintln!("ERROR: {msg}");
    std::process::exit(1);
}

fn usage() -> ! {
    eprintln!(
        r#"thumbctl - thumbgen CLI

Usage:
  thumbctl [--font-dir <dir>] [--url <base_url>] <command> <focus|card> [options]

Commands:
  render                 Draw locally and write the PNG
  post                   Send the request to a running thumbgen server

Options:
  --text <text>          Keyword (focus) or title (card)
  --keyword <text>       Badge text (card only)
  --from <hex>           Top gradient color (default #667eea)
  --to <hex>             Bottom gradient color (default #764ba2)
  --out <file.png>       Output path (required)

Config resolution (if omitted):
  - fonts: --font-dir > THUMBGEN_FONT_DIR env > /var/task/fonts, then ./fonts
  - url:   --url > THUMBGEN_URL env > http://127.0.0.1:<THUMBGEN_PORT|3000>
"#
    );
    std::process::exit(2);
}

/// `THUMBGEN_PORT` from a `.env` file, if one sets it.
fn port_from_env_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == "THUMBGEN_PORT")
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn resolve_font_dirs(arg: Option<String>) -> Vec<PathBuf> {
    let primary = arg
        .or_else(|| non_empty_env("THUMBGEN_FONT_DIR"))
        .unwrap_or_else(|| DEFAULT_FONT_DIR.to_string());
    vec![PathBuf::from(primary), PathBuf::from(DEFAULT_FONT_FALLBACK_DIR)]
}

fn resolve_base_url(arg: Option<String>) -> String {
    if let Some(url) = arg {
        let url = url.trim().to_string();
        if !url.is_empty() {
            return url.trim_end_matches('/').to_string();
        }
    }

    if let Some(url) = non_empty_env("THUMBGEN_URL") {
        return url.trim_end_matches('/').to_string();
    }

    let port = non_empty_env("THUMBGEN_PORT")
        .or_else(|| port_from_env_file(Path::new(".env")))
        .and_then(|s| s.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    format!("http://127.0.0.1:{port}")
}

struct RenderArgs {
    variant: Variant,
    payload: ThumbnailPayload,
    out: PathBuf,
}

fn parse_render_args(args: &[String]) -> RenderArgs {
    let Some(variant) = args.first().and_then(|v| Variant::from_name(v)) else {
        die("expected variant: focus | card");
    };

    let mut text: Option<String> = None;
    let mut payload = ThumbnailPayload::default();
    let mut out: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--text" => text = value,
            "--keyword" => payload.keyword = value,
            "--from" => payload.bg_color1 = value,
            "--to" => payload.bg_color2 = value,
            "--out" => out = value.map(PathBuf::from),
            other => die(&format!("unknown option: {other}")),
        }
        i += 2;
    }

    match variant {
        Variant::FocusKeyword => payload.keyword = text.or(payload.keyword),
        Variant::TitleCard => payload.title = text,
    }

    let Some(out) = out else {
        die("missing --out <file.png>");
    };
    RenderArgs {
        variant,
        payload,
        out,
    }
}

fn write_png(path: &Path, bytes: &[u8]) {
    if let Err(e) = std::fs::write(path, bytes) {
        die(&format!("write {}: {e}", path.display()));
    }
    println!("wrote {} ({} bytes)", path.display(), bytes.len());
}

fn render_local(args: RenderArgs, font_dirs: Vec<PathBuf>) {
    let watermark = non_empty_env("THUMBGEN_WATERMARK").unwrap_or_else(|| DEFAULT_WATERMARK.to_string());
    let ctx = RenderContext::new(FontResolver::new(font_dirs), watermark);

    let request = args
        .payload
        .into_request(args.variant)
        .unwrap_or_else(|e| die(&e.to_string()));
    let image = render(args.variant, &request, &ctx).unwrap_or_else(|e| die(&e.to_string()));
    write_png(&args.out, &image.bytes);
}

async fn post_remote(args: RenderArgs, base_url: &str) -> Result<(), String> {
    let path = match args.variant {
        Variant::FocusKeyword => "api/thumbnail",
        Variant::TitleCard => "api/thumbnail/card",
    };
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| format!("build client failed: {e}"))?;

    let resp = client
        .post(format!("{base_url}/{path}"))
        .json(&args.payload)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;

    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| format!("read response failed: {e}"))?;
    if !status.is_success() {
        let text = String::from_utf8_lossy(&body);
        return Err(format!("HTTP {status}: {text}"));
    }

    write_png(&args.out, &body);
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct GlobalFlags {
    font_dir: Option<String>,
    base_url: Option<String>,
}

/// Leading `--font-dir` / `--url` flags; returns them and the remaining args.
fn split_global_flags(args: Vec<String>) -> Result<(GlobalFlags, Vec<String>), String> {
    let mut flags = GlobalFlags::default();
    let mut rest = args.into_iter().peekable();

    while let Some(arg) = rest.peek() {
        let slot = match arg.as_str() {
            "--help" | "-h" => usage(),
            "--font-dir" => &mut flags.font_dir,
            "--url" => &mut flags.base_url,
            _ => break,
        };
        let Some(flag) = rest.next() else { break };
        let Some(value) = rest.next() else {
            return Err(format!("missing value for {flag}"));
        };
        *slot = Some(value);
    }

    Ok((flags, rest.collect()))
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let (globals, args) = split_global_flags(args).unwrap_or_else(|e| die(&e));
    if args.is_empty() {
        usage();
    }

    match args[0].as_str() {
        "render" => {
            let parsed = parse_render_args(&args[1..]);
            render_local(parsed, resolve_font_dirs(globals.font_dir));
        }
        "post" => {
            let parsed = parse_render_args(&args[1..]);
            let base_url = resolve_base_url(globals.base_url);
            post_remote(parsed, &base_url)
                .await
                .unwrap_or_else(|e| die(&e));
        }
        _ => usage(),
    }
}
