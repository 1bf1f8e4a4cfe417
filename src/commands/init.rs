use std::path::Path;

use crate::{
    InitArgs,
    build::SyntaxHighlighter,
    config::{Config, DEFAULT_CONFIG_FILE},
};

const DEFAULT_LAYOUT: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ page.title }} | {{ site.name }}</title>
  <link rel="stylesheet" href="/assets/style.css">
  <link rel="stylesheet" href="/assets/highlight.css">
</head>
<body>
  <header><a href="/">{{ site.name }}</a></header>
  <main>
{{ content }}
  </main>
</body>
</html>
"#;

const INDEX_PAGE: &str = r#"---
title: Home
layout: default
paginate: posts
---
# Welcome

{% for post in paginator.items %}
- [{{ post.title }}]({{ post.url }}){% if post.excerpt %}: {{ post.excerpt }}{% endif %}
{% endfor %}

{% if paginator.previous_url %}[Newer posts]({{ paginator.previous_url }}){% endif %}
{% if paginator.next_url %}[Older posts]({{ paginator.next_url }}){% endif %}
"#;

const STYLESHEET: &str = r#"---
---
body {
  font-family: system-ui, sans-serif;
  max-width: 42rem;
  margin: 0 auto;

  & header a {
    font-weight: bold;
    text-decoration: none;
  }
}
"#;

fn welcome_post(date: &str) -> String {
    format!(
        "---\ntitle: Welcome to kiln\nlayout: default\ndate: {date}\n---\n\
         This post was generated by `kiln init`.\n\n\
         Edit or delete it, then run `kiln serve` to preview your site.\n"
    )
}

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    println!("Initializing project in {}", path.display());

    let config = Config::default();
    let config_text = serde_yaml::to_string(&config)?;
    write_new(&path.join(DEFAULT_CONFIG_FILE), &config_text).await?;

    let today = chrono::Local::now().date_naive();
    let highlight_css = SyntaxHighlighter::new(&config.markdown.highlight_theme)
        .theme_css()
        .unwrap_or_default();

    write_new(&path.join("_layouts/default.html"), DEFAULT_LAYOUT).await?;
    write_new(&path.join("index.md"), INDEX_PAGE).await?;
    write_new(
        &path.join(format!("posts/{}-welcome.md", today.format("%Y-%m-%d"))),
        &welcome_post(&today.format("%Y-%m-%d").to_string()),
    )
    .await?;
    write_new(&path.join("assets/style.scss"), STYLESHEET).await?;
    write_new(&path.join("assets/highlight.css"), &highlight_css).await?;

    Ok(())
}

/// Write a starter file, leaving existing files alone.
async fn write_new(path: &Path, contents: &str) -> Result<(), anyhow::Error> {
    if tokio::fs::try_exists(path).await? {
        println!("Skipped {} (already exists)", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    println!("Created {}", path.display());
    Ok(())
}
