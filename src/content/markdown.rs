//! Markdown rendering with code blocks, diagrams and embeds

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

lazy_static! {
    static ref IFRAME_RE: Regex = Regex::new(r"(?is)<iframe\b[^>]*?(?:/>|>.*?</iframe>)").unwrap();
}

/// Fence language that is handed to the diagram renderer instead of shown as code
const DIAGRAM_LANG: &str = "mermaid";

/// Markdown renderer
///
/// Raw HTML in the source is passed through untouched. Posts are first-party
/// content; this is not a sanitization boundary.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, highlight: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            highlight,
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_options(&config.theme, config.enable)
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();
        let mut diagrams: HashMap<String, usize> = HashMap::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let html = match code_block_lang.as_deref() {
                        Some(lang) if lang.eq_ignore_ascii_case(DIAGRAM_LANG) => {
                            let seen = diagrams.entry(code_block_content.clone()).or_insert(0);
                            let html = render_diagram(&code_block_content, *seen);
                            *seen += 1;
                            html
                        }
                        Some(lang) => self.render_code_block(&code_block_content, lang),
                        None => format!(
                            "<pre><code>{}</code></pre>\n",
                            html_escape(&code_block_content)
                        ),
                    };
                    events.push(Event::Html(CowStr::from(html)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ if in_code_block => {}
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        wrap_iframes(&html_output)
    }

    /// Code block with a language label and a copy button.
    /// Copy state lives on the button and is reset only by re-rendering.
    fn render_code_block(&self, code: &str, lang: &str) -> String {
        let lang_attr = html_escape(lang);
        let body = self
            .highlight_code(code, lang)
            .unwrap_or_else(|| {
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang_attr,
                    html_escape(code)
                )
            });

        format!(
            concat!(
                r#"<div class="code-block" data-lang="{lang}">"#,
                r#"<div class="code-header"><span class="code-lang">{lang}</span>"#,
                r#"<button type="button" class="copy-button" data-copied="false">Copy</button></div>"#,
                "{body}</div>\n"
            ),
            lang = lang_attr,
            body = body
        )
    }

    /// Highlight a code block. `None` means render it plain.
    fn highlight_code(&self, code: &str, lang: &str) -> Option<String> {
        if !self.highlight {
            return None;
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))?;

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())?;

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => Some(highlighted),
            Err(e) => {
                tracing::warn!("Highlighting {} block failed: {}", lang, e);
                None
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fence info string, e.g. `rust` from "rust,ignore"
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(|lang| lang.to_string())
}

/// Stable anchor id for a diagram: same source, same id across renders.
/// Repeats of one source on a page get an occurrence suffix.
fn diagram_id(source: &str, occurrence: usize) -> String {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    let hash = hasher.finish();

    if occurrence == 0 {
        format!("mermaid-{:016x}", hash)
    } else {
        format!("mermaid-{:016x}-{}", hash, occurrence)
    }
}

/// Diagram container; the page script renders the embedded source into it
fn render_diagram(source: &str, occurrence: usize) -> String {
    format!(
        r#"<div class="mermaid-diagram" id="{}" data-name="mermaid"><pre class="mermaid-source" hidden>{}</pre></div>
"#,
        diagram_id(source, occurrence),
        html_escape(source)
    )
}

/// Wrap every iframe, paired or self-closing, in a fixed 16:9 container
fn wrap_iframes(html: &str) -> String {
    IFRAME_RE
        .replace_all(
            html,
            r#"<div class="iframe-wrapper" style="position:relative;width:100%;aspect-ratio:16/9">$0</div>"#,
        )
        .into_owned()
}
