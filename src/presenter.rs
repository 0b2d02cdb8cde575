use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use unicode_width::UnicodeWidthStr;

use crate::font::{BannerFont, FontError, FontLoader};

/// Block-letter rendering of one string. Rows are padded to a common
/// display width so the whole block can be centered as a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextGeometry {
    pub lines: Vec<String>,
    /// Display columns, not bytes.
    pub width: usize,
}

/// Opaque ticket for engine-owned geometry. Whoever holds one must hand
/// it back through `release` when replacing it or tearing down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle(u64);

/// Spacing applied when laying glyphs side by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphStyle {
    pub letter_spacing: usize,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self { letter_spacing: 1 }
    }
}

#[derive(Debug)]
pub enum PresentError {
    /// The typeface has not resolved yet, or failed to load.
    FontUnavailable,
    /// The font has no usable glyph for this character.
    MissingGlyph(char),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontUnavailable => write!(f, "typeface is not available"),
            Self::MissingGlyph(ch) => write!(f, "typeface has no glyph for {:?}", ch),
        }
    }
}

impl std::error::Error for PresentError {}

/// Builds and owns text geometry. The production implementation lays
/// banner-font glyphs into row strings; tests substitute their own.
pub trait GlyphEngine {
    fn build(&mut self, text: &str, style: &GlyphStyle) -> Result<GeometryHandle, PresentError>;
    fn release(&mut self, handle: GeometryHandle);
    fn geometry(&self, handle: GeometryHandle) -> Option<&TextGeometry>;
}

enum FontSlot {
    Loading(FontLoader),
    Ready(BannerFont),
    Failed(FontError),
}

/// Glyph engine backed by a banner typeface that resolves asynchronously.
/// Until the font arrives every build reports `FontUnavailable`; a load
/// failure is terminal and exposed once for the status line.
pub struct BannerEngine {
    font: FontSlot,
    store: HashMap<u64, TextGeometry>,
    next_id: u64,
}

impl BannerEngine {
    pub fn new(loader: FontLoader) -> Self {
        Self {
            font: FontSlot::Loading(loader),
            store: HashMap::new(),
            next_id: 0,
        }
    }

    /// Engine with an already-resolved font. Used by tests and headless
    /// drivers that have no use for the loader thread.
    pub fn with_font(font: BannerFont) -> Self {
        Self {
            font: FontSlot::Ready(font),
            store: HashMap::new(),
            next_id: 0,
        }
    }

    /// Drain the loader channel. Ready and Failed are terminal states.
    fn poll_font(&mut self) {
        if let FontSlot::Loading(loader) = &self.font {
            match loader.poll() {
                Some(Ok(font)) => self.font = FontSlot::Ready(font),
                Some(Err(err)) => self.font = FontSlot::Failed(err),
                None => {}
            }
        }
    }

    pub fn font_ready(&mut self) -> bool {
        self.poll_font();
        matches!(self.font, FontSlot::Ready(_))
    }

    /// The permanent load failure, if there is one.
    pub fn font_error(&mut self) -> Option<&FontError> {
        self.poll_font();
        match &self.font {
            FontSlot::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Geometry rows still alive in the store. Every handle handed out
    /// and not yet released accounts for exactly one entry.
    pub fn live_geometries(&self) -> usize {
        self.store.len()
    }

    fn rasterize(
        font: &BannerFont,
        text: &str,
        style: &GlyphStyle,
    ) -> Result<TextGeometry, PresentError> {
        let mut rows = vec![String::new(); font.height];
        let mut first = true;
        for ch in text.chars() {
            let glyph = font.glyph(ch).ok_or(PresentError::MissingGlyph(ch))?;
            let glyph_width = glyph
                .iter()
                .map(|row| UnicodeWidthStr::width(row.as_str()))
                .max()
                .unwrap_or(0);
            for (row, part) in rows.iter_mut().zip(glyph.iter()) {
                if !first {
                    row.push_str(&" ".repeat(style.letter_spacing));
                }
                row.push_str(part);
                let pad = glyph_width.saturating_sub(UnicodeWidthStr::width(part.as_str()));
                row.push_str(&" ".repeat(pad));
            }
            first = false;
        }
        let width = rows
            .iter()
            .map(|row| UnicodeWidthStr::width(row.as_str()))
            .max()
            .unwrap_or(0);
        Ok(TextGeometry { lines: rows, width })
    }
}

impl GlyphEngine for BannerEngine {
    fn build(&mut self, text: &str, style: &GlyphStyle) -> Result<GeometryHandle, PresentError> {
        self.poll_font();
        let geometry = match &self.font {
            FontSlot::Ready(font) => Self::rasterize(font, text, style)?,
            _ => return Err(PresentError::FontUnavailable),
        };
        let id = self.next_id;
        self.next_id += 1;
        self.store.insert(id, geometry);
        Ok(GeometryHandle(id))
    }

    fn release(&mut self, handle: GeometryHandle) {
        self.store.remove(&handle.0);
    }

    fn geometry(&self, handle: GeometryHandle) -> Option<&TextGeometry> {
        self.store.get(&handle.0)
    }
}

/// Owns the single live geometry handle for one on-screen text element.
///
/// Geometry is rebuilt only when the text changes. A replacement is
/// built first and the predecessor released immediately after, so a
/// failed build keeps the old geometry on screen instead of blanking
/// the element. Nothing is shown until the first successful build.
pub struct TextPresenter {
    style: GlyphStyle,
    current: Option<(String, GeometryHandle)>,
    warning: Option<String>,
    warned: bool,
}

impl TextPresenter {
    pub fn new(style: GlyphStyle) -> Self {
        Self {
            style,
            current: None,
            warning: None,
            warned: false,
        }
    }

    /// The handle to draw this frame, or `None` while nothing can be
    /// shown yet.
    pub fn refresh(
        &mut self,
        engine: &mut dyn GlyphEngine,
        text: &str,
    ) -> Option<GeometryHandle> {
        if let Some((shown, handle)) = &self.current {
            if shown == text {
                return Some(*handle);
            }
        }
        match engine.build(text, &self.style) {
            Ok(handle) => {
                if let Some((_, old)) = self.current.take() {
                    engine.release(old);
                }
                self.current = Some((text.to_string(), handle));
                self.warned = false;
                Some(handle)
            }
            Err(PresentError::FontUnavailable) => self.handle(),
            Err(err @ PresentError::MissingGlyph(_)) => {
                if !self.warned {
                    self.warned = true;
                    self.warning = Some(format!("{}; keeping previous text", err));
                }
                self.handle()
            }
        }
    }

    pub fn handle(&self) -> Option<GeometryHandle> {
        self.current.as_ref().map(|(_, handle)| *handle)
    }

    /// One-shot warning for the status line, if a build failed since
    /// the last drain.
    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    /// Release the retained handle. Must run before the engine goes
    /// away on teardown.
    pub fn teardown(&mut self, engine: &mut dyn GlyphEngine) {
        if let Some((_, handle)) = self.current.take() {
            engine.release(handle);
        }
    }
}

/// Multi-line geometry flattened for logs and assertions.
pub fn geometry_to_string(geometry: &TextGeometry) -> String {
    geometry.lines.iter().join("\n")
}
