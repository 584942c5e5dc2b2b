//! Markdown-subset to HTML markup formatter.
//!
//! Gemini replies arrive as loosely markdown-shaped text. One line-scanning
//! algorithm renders both document shapes: the categorized grocery list
//! (headings open `<div class="grocery-category">` blocks) and the sectioned
//! recipe (headings steer a class hint onto the next `<ul>`). The shapes are
//! selected through [`FormatOptions`] rather than separate implementations.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::UlamError;

/// Compiled once; the patterns are valid literals so init cannot fail at runtime.
static HEADING_RE: OnceLock<Regex> = OnceLock::new();
static CATEGORY_RE: OnceLock<Regex> = OnceLock::new();
static SECTION_KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
static ITEM_RE: OnceLock<Regex> = OnceLock::new();
static ORDERED_ITEM_RE: OnceLock<Regex> = OnceLock::new();
static BOLD_RE: OnceLock<Regex> = OnceLock::new();

fn heading_re() -> &'static Regex {
    HEADING_RE.get_or_init(|| Regex::new(r"^#{1,3}\s+").expect("valid literal regex"))
}

/// Trailing-`**` category header, e.g. `Produce**` or `**Dairy**`.
fn category_re() -> &'static Regex {
    CATEGORY_RE.get_or_init(|| Regex::new(r"^(?:\*\*)?[^*]+\*\*$").expect("valid literal regex"))
}

/// Bare section keyword lines recognized as recipe headings.
fn section_keyword_re() -> &'static Regex {
    SECTION_KEYWORD_RE.get_or_init(|| {
        Regex::new(r"(?i)^(ingredients|preparation|instructions):?$").expect("valid literal regex")
    })
}

fn item_re() -> &'static Regex {
    ITEM_RE.get_or_init(|| Regex::new(r"^[-*]\s+(.+)$").expect("valid literal regex"))
}

fn ordered_item_re() -> &'static Regex {
    ORDERED_ITEM_RE
        .get_or_init(|| Regex::new(r"^(?:-|\*|\d+\.)\s+(.+)$").expect("valid literal regex"))
}

fn bold_re() -> &'static Regex {
    BOLD_RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid literal regex"))
}

/// What to do with `**text**` emphasis markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Remove the markers, keep the text.
    Strip,
    /// Render as `<strong>text</strong>`.
    Bold,
}

impl FromStr for Emphasis {
    type Err = UlamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strip" => Ok(Self::Strip),
            "bold" => Ok(Self::Bold),
            other => Err(UlamError::InvalidEmphasisMode {
                value: other.to_owned(),
            }),
        }
    }
}

/// Knobs selecting the document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub emphasis: Emphasis,
    /// Track section headings (`Ingredients`, `Preparation`, …) and attach a
    /// class hint to the next opened list. Also enables `N.` item markers
    /// and bare section-keyword headings.
    pub section_aware: bool,
    /// Wrap each heading and its following content in a
    /// `<div class="grocery-category">` block, and recognize
    /// trailing-`**` lines as headings.
    pub category_blocks: bool,
}

impl FormatOptions {
    /// Flat categorized list: emphasis stripped, category containers.
    pub fn grocery() -> Self {
        Self {
            emphasis: Emphasis::Strip,
            section_aware: false,
            category_blocks: true,
        }
    }

    /// Sectioned recipe: emphasis rendered bold, section-aware lists.
    pub fn recipe() -> Self {
        Self {
            emphasis: Emphasis::Bold,
            section_aware: true,
            category_blocks: false,
        }
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }
}

/// HTML-escape. `&` must go first so the other substitutions' output is not
/// double-escaped.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Apply the emphasis mode to inline text and escape the result.
fn render_inline(text: &str, emphasis: Emphasis) -> String {
    match emphasis {
        Emphasis::Strip => escape(&text.replace("**", "")),
        Emphasis::Bold => {
            let mut out = String::new();
            let mut last = 0;
            for caps in bold_re().captures_iter(text) {
                let m = caps.get(0).expect("whole-match group always present");
                out.push_str(&escape(&text[last..m.start()]));
                out.push_str("<strong>");
                out.push_str(&escape(&caps[1]));
                out.push_str("</strong>");
                last = m.end();
            }
            out.push_str(&escape(&text[last..]));
            out
        }
    }
}

struct Renderer<'a> {
    opts: &'a FormatOptions,
    out: String,
    in_list: bool,
    in_category: bool,
    /// Lowercased text of the most recent heading; picks the class hint for
    /// the next opened list in section-aware mode.
    section: String,
}

impl<'a> Renderer<'a> {
    fn new(opts: &'a FormatOptions) -> Self {
        Self {
            opts,
            out: String::new(),
            in_list: false,
            in_category: false,
            section: String::new(),
        }
    }

    fn close_list(&mut self) {
        if self.in_list {
            self.out.push_str("</ul>");
            self.in_list = false;
        }
    }

    fn close_category(&mut self) {
        self.close_list();
        if self.in_category {
            self.out.push_str("</div>");
            self.in_category = false;
        }
    }

    fn emit_heading(&mut self, text: &str) {
        self.close_category();
        if self.opts.section_aware {
            self.section = text.to_lowercase();
        }
        if self.opts.category_blocks {
            self.out.push_str("<div class=\"grocery-category\">");
            self.in_category = true;
        }
        self.out.push_str("<h3>");
        self.out.push_str(&escape(text));
        self.out.push_str("</h3>");
    }

    fn open_list(&mut self) {
        let class = if self.opts.category_blocks {
            Some("grocery-items")
        } else if self.opts.section_aware && self.section.contains("ingredient") {
            Some("ingredients-list")
        } else if self.opts.section_aware
            && (self.section.contains("preparation") || self.section.contains("instruction"))
        {
            Some("steps-list")
        } else {
            None
        };
        match class {
            Some(c) => {
                self.out.push_str("<ul class=\"");
                self.out.push_str(c);
                self.out.push_str("\">");
            }
            None => self.out.push_str("<ul>"),
        }
        self.in_list = true;
    }

    fn line(&mut self, line: &str) {
        let trimmed = line.trim();

        // Blank lines close an open list but never a category block.
        if trimmed.is_empty() {
            self.close_list();
            return;
        }

        if heading_re().is_match(trimmed)
            || (self.opts.category_blocks && category_re().is_match(trimmed))
        {
            let cleaned = heading_re().replace(trimmed, "").replace("**", "");
            self.emit_heading(cleaned.trim());
            return;
        }

        if self.opts.section_aware && section_keyword_re().is_match(trimmed) {
            let cleaned = trimmed.trim_end_matches(':');
            self.emit_heading(cleaned);
            return;
        }

        let item = if self.opts.section_aware {
            ordered_item_re().captures(trimmed)
        } else {
            item_re().captures(trimmed)
        };
        if let Some(caps) = item {
            if !self.in_list {
                self.open_list();
            }
            self.out.push_str("<li>");
            self.out.push_str(&render_inline(&caps[1], self.opts.emphasis));
            self.out.push_str("</li>");
            return;
        }

        self.close_list();
        self.out.push_str("<p>");
        self.out.push_str(&render_inline(trimmed, self.opts.emphasis));
        self.out.push_str("</p>");
    }

    fn finish(mut self) -> String {
        self.close_category();
        self.out
    }
}

/// Render a raw generated-text block into HTML markup per `opts`.
pub fn format_markup(raw: &str, opts: &FormatOptions) -> String {
    let mut renderer = Renderer::new(opts);
    for line in raw.lines() {
        renderer.line(line);
    }
    renderer.finish()
}
