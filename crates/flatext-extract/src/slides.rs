//! Presentation backend for `.pptx` files.
//!
//! A `.pptx` is a zip of XML parts. Slide order comes from the `p:sldIdLst` in
//! `ppt/presentation.xml`, resolved to slide parts through
//! `ppt/_rels/presentation.xml.rels`. Each slide's shape tree is parsed into
//! [`Shape`] values; only top-level shapes that expose text contribute.

use flatext_core::{ExtractedText, FormatKind};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

use crate::error::FormatError;
use crate::traits::FormatExtractor;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Character written for an `a:br` line break.
const VERTICAL_TAB: char = '\u{b}';

// ============================================================================
// Shape model
// ============================================================================

/// Capability of shapes whose content can be read as plain text.
pub trait HasText {
    /// The text content, paragraphs separated by `\n` and line breaks
    /// within a paragraph written as `\v`.
    fn text(&self) -> String;
}

/// Text body of a shape: one string per `a:p` paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFrame {
    paragraphs: Vec<String>,
}

impl TextFrame {
    /// Paragraph texts in order.
    #[must_use]
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}

impl HasText for TextFrame {
    fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// A top-level element of a slide's shape tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `p:sp`: auto shape, text box or placeholder.
    AutoShape(TextFrame),
    /// `p:pic`
    Picture,
    /// `p:graphicFrame`: table, chart or diagram.
    GraphicFrame,
    /// `p:grpSp`
    Group,
    /// `p:cxnSp`
    Connector,
}

impl Shape {
    /// The text capability of this shape, if it has one.
    #[must_use]
    pub fn as_text(&self) -> Option<&dyn HasText> {
        match self {
            Self::AutoShape(frame) => Some(frame),
            Self::Picture | Self::GraphicFrame | Self::Group | Self::Connector => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeTag {
    AutoShape,
    Picture,
    GraphicFrame,
    Group,
    Connector,
}

impl ShapeTag {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::AutoShape),
            b"pic" => Some(Self::Picture),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::Group),
            b"cxnSp" => Some(Self::Connector),
            _ => None,
        }
    }
}

/// A shape whose closing tag has not been seen yet.
struct OpenShape {
    tag: ShapeTag,
    depth: usize,
    frame: Option<TextFrame>,
    paragraph: Option<String>,
    in_text: bool,
}

impl OpenShape {
    fn new(tag: ShapeTag, depth: usize) -> Self {
        Self {
            tag,
            depth,
            frame: None,
            paragraph: None,
            in_text: false,
        }
    }

    fn start(&mut self, name: &[u8]) {
        match name {
            b"txBody" if self.tag == ShapeTag::AutoShape && self.frame.is_none() => {
                self.frame = Some(TextFrame::default());
            }
            b"p" if self.frame.is_some() => self.paragraph = Some(String::new()),
            b"t" if self.paragraph.is_some() => self.in_text = true,
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        match name {
            b"txBody" if self.tag == ShapeTag::AutoShape && self.frame.is_none() => {
                self.frame = Some(TextFrame::default());
            }
            b"p" => {
                if let Some(frame) = self.frame.as_mut() {
                    frame.paragraphs.push(String::new());
                }
            }
            // Soft line break within a paragraph, kept distinct from `\n`.
            b"br" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.push(VERTICAL_TAB);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.push_str(text);
            }
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"p" => {
                if let (Some(frame), Some(paragraph)) = (self.frame.as_mut(), self.paragraph.take())
                {
                    frame.paragraphs.push(paragraph);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Shape {
        match self.tag {
            ShapeTag::AutoShape => Shape::AutoShape(self.frame.unwrap_or_default()),
            ShapeTag::Picture => Shape::Picture,
            ShapeTag::GraphicFrame => Shape::GraphicFrame,
            ShapeTag::Group => Shape::Group,
            ShapeTag::Connector => Shape::Connector,
        }
    }
}

/// Parse the top-level shapes of one slide part.
pub fn parse_slide(xml: &str) -> Result<Vec<Shape>, FormatError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut open: Option<OpenShape> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = e.local_name();
                if let Some(shape) = open.as_mut() {
                    shape.start(name.as_ref());
                } else if tree_depth.is_none() && name.as_ref() == b"spTree" {
                    tree_depth = Some(depth);
                } else if tree_depth.is_some_and(|d| depth == d + 1) {
                    if let Some(tag) = ShapeTag::from_local_name(name.as_ref()) {
                        open = Some(OpenShape::new(tag, depth));
                    }
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if let Some(shape) = open.as_mut() {
                    shape.empty(name.as_ref());
                } else if tree_depth == Some(depth) {
                    if let Some(tag) = ShapeTag::from_local_name(name.as_ref()) {
                        shapes.push(OpenShape::new(tag, depth + 1).finish());
                    }
                }
            }
            Event::Text(t) => {
                if let Some(shape) = open.as_mut() {
                    shape.text(&t.unescape()?);
                }
            }
            Event::End(e) => {
                match open.take() {
                    Some(shape) if shape.depth == depth => shapes.push(shape.finish()),
                    Some(mut shape) => {
                        shape.end(e.local_name().as_ref());
                        open = Some(shape);
                    }
                    None if tree_depth == Some(depth) => break,
                    None => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

// ============================================================================
// Package navigation
// ============================================================================

/// Relationship ids of the slides, in presentation order.
fn slide_relationship_ids(xml: &str) -> Result<Vec<String>, FormatError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = relationship_id(&e)? {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ids)
}

/// The namespaced `r:id` attribute; the bare `id` is the slide's numeric id.
fn relationship_id(e: &BytesStart<'_>) -> Result<Option<String>, FormatError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Map of relationship id to target path from a `.rels` part.
fn relationship_targets(xml: &str) -> Result<HashMap<String, String>, FormatError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr.unescape_value()?.into_owned()),
                        b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(targets)
}

/// Resolve a relationship target against the `ppt/` directory.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = vec!["ppt"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn read_part(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String, FormatError> {
    let mut part = archive.by_name(name)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

// ============================================================================
// Backend
// ============================================================================

/// Backend for `.pptx` files.
pub struct SlideshowExtractor;

impl SlideshowExtractor {
    /// Create a new slideshow extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SlideshowExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatExtractor for SlideshowExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Slideshow
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let mut archive = ZipArchive::new(Cursor::new(content))?;
        let presentation = read_part(&mut archive, PRESENTATION_PART)?;
        let targets = relationship_targets(&read_part(&mut archive, PRESENTATION_RELS_PART)?)?;
        let slide_ids = slide_relationship_ids(&presentation)?;
        debug!("Extracting pptx: {} slides", slide_ids.len());

        let mut text = ExtractedText::new();
        for rel_id in &slide_ids {
            let target = targets.get(rel_id).ok_or_else(|| {
                FormatError::Malformed(format!("slide relationship {rel_id} has no target"))
            })?;
            let part = resolve_target(target);
            let shapes = parse_slide(&read_part(&mut archive, &part)?)?;
            debug!("{}: {} top-level shapes", part, shapes.len());

            for shape in &shapes {
                if let Some(body) = shape.as_text() {
                    let shape_text = body.text();
                    if !shape_text.is_empty() {
                        text.push_line(&shape_text);
                    }
                }
            }
        }

        Ok(text)
    }
}
