use ammonia::Builder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Tags of the body markup subset
const ALLOWED_TAGS: &[&str] = &["b", "i", "u", "a", "img", "br"];
/// Tags that never take a closing tag
const VOID_TAGS: &[&str] = &["img", "br"];

static TAG: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r#"<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)((?:\s+[A-Za-z_:][-A-Za-z0-9_:.]*\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*(/?)\s*>"#)
    .expect("tag pattern")
});

static ENTITY: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^&(?:amp|lt|gt|quot|apos|#[0-9]+|#x[0-9A-Fa-f]+);").expect("entity pattern")
});

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("strip pattern"));

/// Notification body ready for a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyText {
  /// Well-formed markup in the supported subset
  Markup(String),
  /// Text to be shown literally
  Plain(String),
}

impl BodyText {
  /// Markup form of the body; plain text is escaped.
  pub fn to_markup(&self) -> String {
    match self {
      BodyText::Markup(markup) => markup.clone(),
      BodyText::Plain(text) => escape_text(text),
    }
  }

  pub fn is_empty(&self) -> bool {
    match self {
      BodyText::Markup(s) | BodyText::Plain(s) => s.is_empty(),
    }
  }
}

/// Interpret a body: supported markup is kept (sanitized), anything else is plain text.
pub fn body_text(body: &str) -> BodyText {
  if is_valid_markup(body) {
    BodyText::Markup(sanitize_markup(body))
  } else {
    BodyText::Plain(body.to_string())
  }
}

/// Whether `text` is well-formed markup using only b, i, u, a, img and br.
pub fn is_valid_markup(text: &str) -> bool {
  let mut open: Vec<String> = Vec::new();
  let mut rest = text;

  while let Some(pos) = rest.find(['<', '&']) {
    rest = &rest[pos..];

    if rest.starts_with('&') {
      match ENTITY.find(rest) {
        Some(m) => rest = &rest[m.end()..],
        None => return false,
      }
      continue;
    }

    let Some(caps) = TAG.captures(rest).filter(|c| c.get(0).is_some_and(|m| m.start() == 0))
    else {
      return false;
    };
    let closing = !caps[1].is_empty();
    let name = caps[2].to_ascii_lowercase();
    let self_closing = !caps[4].is_empty();

    if !ALLOWED_TAGS.contains(&name.as_str()) {
      return false;
    }

    if closing {
      if open.pop().as_deref() != Some(name.as_str()) {
        return false;
      }
    } else if !self_closing && !VOID_TAGS.contains(&name.as_str()) {
      open.push(name);
    }

    rest = &rest[caps[0].len()..];
  }

  open.is_empty()
}

/// Sanitize markup to the supported subset.
///
/// Only `href` on links and `src`/`alt` on images survive; URLs are
/// limited to http, https, mailto and file.
pub fn sanitize_markup(markup: &str) -> String {
  let tags: HashSet<&str> = ALLOWED_TAGS.iter().copied().collect();
  let tag_attributes: HashMap<&str, HashSet<&str>> = [
    ("a", ["href"].into_iter().collect()),
    ("img", ["src", "alt"].into_iter().collect()),
  ]
  .into_iter()
  .collect();
  let url_schemes: HashSet<&str> = ["http", "https", "mailto", "file"].into_iter().collect();

  Builder::default()
    .tags(tags)
    .link_rel(None)
    .url_schemes(url_schemes)
    .generic_attributes(HashSet::new())
    .tag_attributes(tag_attributes)
    .clean(markup)
    .to_string()
}

/// Escape text so it renders literally inside markup.
pub fn escape_text(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      c => escaped.push(c),
    }
  }
  escaped
}

/// Strip all tags, returning plain text.
pub fn strip_markup(markup: &str) -> String {
  let without_tags = ANY_TAG.replace_all(markup, "");

  without_tags
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
    .replace("&apos;", "'")
    .replace("&amp;", "&") // Must be last to avoid double-decoding
}
