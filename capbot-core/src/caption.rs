//! Caption transform: replacements, escaping, tag wrapping, outer template.
//!
//! [`transform`] is pure and never fails. Running it twice stacks the tags; callers
//! must only feed it the original caption of a post.

use regex::{NoExpand, Regex, RegexBuilder};
use tracing::warn;

use crate::channel_config::{ChannelConfig, Replacement, CAPTION_PLACEHOLDER};

/// Escapes `&`, `<` and `>` for Telegram HTML text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Like [`escape_html`], also escaping quotes for attribute values.
pub fn escape_html_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compiles a rule into a case-insensitive matcher. Literal rules are escaped first.
pub fn compile_rule(rule: &Replacement) -> Result<Regex, regex::Error> {
    let pattern = if rule.regex {
        rule.from.clone()
    } else {
        regex::escape(&rule.from)
    };
    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

/// Applies enabled rules in list order. Each rule sees the previous rule's output.
pub fn apply_replacements(text: &str, rules: &[Replacement]) -> String {
    let mut current = text.to_string();
    for (index, rule) in rules.iter().enumerate() {
        if !rule.enabled {
            continue;
        }
        if rule.from.is_empty() {
            warn!(index, "Skipping replacement with empty pattern");
            continue;
        }
        match compile_rule(rule) {
            Ok(re) => {
                current = re.replace_all(&current, NoExpand(&rule.to)).into_owned();
            }
            Err(e) => {
                warn!(index, pattern = %rule.from, error = %e, "Skipping replacement that does not compile");
            }
        }
    }
    current
}

/// Builds the outbound HTML caption for `raw` under `config`.
pub fn transform(raw: &str, config: &ChannelConfig) -> String {
    let body = if config.replacements_enabled {
        apply_replacements(raw, &config.replacements)
    } else {
        raw.to_string()
    };

    let mut lines: Vec<String> = Vec::with_capacity(3);
    if let Some(prefix) = config.prefix.as_deref().filter(|p| !p.is_empty()) {
        lines.push(config.pre_format.wrap(&escape_html(prefix)));
    }
    if !body.is_empty() {
        lines.push(config.caption_format.wrap(&escape_html(&body)));
    }
    if let Some(suffix) = config.suffix.as_deref().filter(|s| !s.is_empty()) {
        lines.push(config.suf_format.wrap(&escape_html(suffix)));
    }
    let caption = lines.join("\n");

    if config.style_caption {
        apply_template(&config.style_template, &caption)
    } else {
        caption
    }
}

/// Substitutes the first placeholder; a template without one is returned unchanged.
fn apply_template(template: &str, caption: &str) -> String {
    template.replacen(CAPTION_PLACEHOLDER, caption, 1)
}
