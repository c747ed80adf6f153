//! Structured descriptors from pre-rendered implementor markup.
//!
//! The markup is a single impl line with anchors around trait and type names,
//! e.g. `impl&lt;V:&nbsp;<a class="trait" ...>Hash</a>&gt; <a class="trait"
//! ...>Hash</a> for <a class="struct" ...>VecMap</a>&lt;V&gt;`.

use implreg_types::{Implementor, ImplementorDescriptor, ImplementorTable, TypeKind};
use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use url::Url;

use crate::error::{Error, Result};

/// Descriptors for one library's implementors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescribedLibrary {
    pub library: String,
    pub implementors: Vec<ImplementorDescriptor>,
}

/// An anchor found in the markup, with byte offsets into the plain text.
#[derive(Debug)]
struct Anchor {
    start: usize,
    text: String,
    classes: Vec<String>,
    href: Option<String>,
    title: Option<String>,
}

impl Anchor {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn kind(&self) -> Option<TypeKind> {
        self.classes.iter().find_map(|class| class.parse().ok())
    }

    /// Item path from a title such as `struct vec_map::VecMap`.
    fn path(&self) -> Option<String> {
        let title = self.title.as_deref()?;
        let path = title.split_once(' ').map_or(title, |(_, path)| path);
        Some(path.to_string())
    }
}

/// Parses one implementor's markup.
pub fn parse_markup(markup: &str) -> Result<ImplementorDescriptor> {
    let fragment = Html::parse_fragment(markup);
    let mut plain = String::new();
    let mut anchors = Vec::new();
    collect(fragment.root_element(), &mut plain, &mut anchors);

    let lead = plain.len() - plain.trim_start().len();
    let text = plain.trim();
    let not_an_impl = || Error::NotAnImpl(text.to_string());

    let rest = text.strip_prefix("impl").ok_or_else(not_an_impl)?;
    let mut pos = "impl".len();
    let mut generics = None;

    if rest.starts_with('<') {
        let close = matching_close(text, pos).ok_or_else(not_an_impl)?;
        generics = Some(text[pos + 1..close].trim().to_string());
        pos = close + 1;
    } else if !rest.starts_with(char::is_whitespace) {
        return Err(not_an_impl());
    }

    pos += text[pos..].len() - text[pos..].trim_start().len();
    let split = find_top_level(text, pos, " for ").ok_or_else(not_an_impl)?;

    let trait_text = text[pos..split].trim();
    let negative = trait_text.starts_with('!');
    let trait_name = trait_text.trim_start_matches('!').trim().to_string();

    let self_start = split + " for ".len();
    let self_end = find_top_level(text, self_start, " where ").unwrap_or(text.len());
    let self_type = text[self_start..self_end].trim().to_string();

    // Anchor offsets are relative to the untrimmed text.
    let in_range = |anchor: &&Anchor, from: usize, to: usize| {
        let start = anchor.start.saturating_sub(lead);
        start >= from && start < to
    };

    let trait_anchor = anchors
        .iter()
        .filter(|anchor| anchor.has_class("trait") && in_range(anchor, pos, split))
        .last();
    let self_anchor = anchors
        .iter()
        .find(|anchor| anchor.kind().is_some() && in_range(anchor, self_start, self_end));

    Ok(ImplementorDescriptor {
        text: text.to_string(),
        generics,
        negative,
        trait_name: if trait_name.is_empty() {
            trait_anchor.map(|a| a.text.clone()).unwrap_or_default()
        } else {
            trait_name
        },
        trait_path: trait_anchor.and_then(Anchor::path),
        trait_href: trait_anchor.and_then(|a| a.href.clone()),
        self_type,
        self_kind: self_anchor.and_then(Anchor::kind),
        self_path: self_anchor.and_then(Anchor::path),
        self_href: self_anchor.and_then(|a| a.href.clone()),
    })
}

pub fn describe(implementor: &Implementor) -> Result<ImplementorDescriptor> {
    parse_markup(implementor.as_str())
}

/// Describes every implementor in `table`, resolving references against
/// `base` when given.
pub fn describe_table(table: &ImplementorTable, base: Option<&Url>) -> Result<Vec<DescribedLibrary>> {
    table
        .iter()
        .map(|(library, implementors)| {
            let implementors = implementors
                .iter()
                .map(|implementor| {
                    let mut descriptor = describe(implementor)?;
                    if let Some(base) = base {
                        resolve_refs(&mut descriptor, base)?;
                    }
                    Ok::<_, Error>(descriptor)
                })
                .collect::<Result<Vec<_>>>()?;

            Ok::<_, Error>(DescribedLibrary {
                library: library.to_string(),
                implementors,
            })
        })
        .collect()
}

/// Rewrites relative references in `descriptor` as absolute URLs.
pub fn resolve_refs(descriptor: &mut ImplementorDescriptor, base: &Url) -> Result<()> {
    for href in [&mut descriptor.trait_href, &mut descriptor.self_href]
        .into_iter()
        .flatten()
    {
        let resolved = base.join(href).map_err(|source| Error::InvalidReference {
            href: href.clone(),
            source,
        })?;
        *href = resolved.to_string();
    }
    Ok(())
}

fn collect(element: ElementRef<'_>, plain: &mut String, anchors: &mut Vec<Anchor>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => plain.push_str(&text.replace('\u{a0}', " ")),
            Node::Element(el) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                // Where clauses on their own line carry no leading space.
                if el.classes().any(|class| class == "where")
                    && !plain.is_empty()
                    && !plain.ends_with(char::is_whitespace)
                {
                    plain.push(' ');
                }
                if el.name() != "a" {
                    collect(child, plain, anchors);
                    continue;
                }

                let start = plain.len();
                collect(child, plain, anchors);
                anchors.push(Anchor {
                    start,
                    text: plain[start..].to_string(),
                    classes: el.classes().map(str::to_string).collect(),
                    href: el.attr("href").map(str::to_string),
                    title: el.attr("title").map(str::to_string),
                });
            }
            _ => {}
        }
    }
}

/// Byte offset of the `>` closing the `<` at `open`.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut prev = '\0';
    for (offset, c) in text[open..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' if prev != '-' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
        prev = c;
    }
    None
}

/// Byte offset of the first `needle` at bracket depth zero, from `from`.
fn find_top_level(text: &str, from: usize, needle: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut prev = '\0';
    for (offset, c) in text[from..].char_indices() {
        let at = from + offset;
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' if prev == '-' => {}
            '>' | ')' | ']' => depth -= 1,
            _ if depth == 0 && text[at..].starts_with(needle) => return Some(at),
            _ => {}
        }
        prev = c;
    }
    None
}
