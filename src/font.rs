use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

static FONT_DIR: Dir = include_dir!("src/fonts");

/// A block-letter typeface: every glyph is exactly `height` rows of
/// text cells. Glyph widths may vary; rows within one glyph are padded
/// to a common width at rasterization time.
#[derive(Deserialize, Clone, Debug)]
pub struct BannerFont {
    pub name: String,
    pub height: usize,
    glyphs: HashMap<String, Vec<String>>,
}

#[derive(Debug)]
pub enum FontError {
    /// No embedded typeface with this name.
    UnknownFont(String),
    Io(String),
    Parse(String),
    /// A glyph's row count disagrees with the font height.
    BadGlyph {
        glyph: String,
        rows: usize,
        expected: usize,
    },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFont(name) => write!(f, "no embedded typeface named '{}'", name),
            Self::Io(msg) => write!(f, "could not read typeface: {}", msg),
            Self::Parse(msg) => write!(f, "could not parse typeface: {}", msg),
            Self::BadGlyph {
                glyph,
                rows,
                expected,
            } => write!(
                f,
                "glyph '{}' has {} rows, font height is {}",
                glyph, rows, expected
            ),
        }
    }
}

impl std::error::Error for FontError {}

impl BannerFont {
    pub fn parse(data: &str) -> Result<Self, FontError> {
        let font: BannerFont =
            serde_json::from_str(data).map_err(|e| FontError::Parse(e.to_string()))?;
        font.validate()?;
        Ok(font)
    }

    fn validate(&self) -> Result<(), FontError> {
        if self.height == 0 {
            return Err(FontError::Parse("font height must be non-zero".into()));
        }
        for (key, rows) in &self.glyphs {
            if key.chars().count() != 1 {
                return Err(FontError::Parse(format!(
                    "glyph key '{}' is not a single character",
                    key
                )));
            }
            if rows.len() != self.height {
                return Err(FontError::BadGlyph {
                    glyph: key.clone(),
                    rows: rows.len(),
                    expected: self.height,
                });
            }
        }
        Ok(())
    }

    /// Load one of the typefaces embedded in the binary.
    pub fn embedded(name: &str) -> Result<Self, FontError> {
        let file = FONT_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| FontError::UnknownFont(name.to_string()))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| FontError::Io("embedded typeface is not utf-8".into()))?;
        Self::parse(text)
    }

    pub fn from_path(path: &Path) -> Result<Self, FontError> {
        let text = std::fs::read_to_string(path).map_err(|e| FontError::Io(e.to_string()))?;
        Self::parse(&text)
    }

    /// Rows for one character. Lowercase falls back to its uppercase
    /// form when the font carries no lowercase glyphs.
    pub fn glyph(&self, ch: char) -> Option<&[String]> {
        if let Some(rows) = self.glyphs.get(ch.to_string().as_str()) {
            return Some(rows.as_slice());
        }
        let upper: String = ch.to_uppercase().collect();
        self.glyphs.get(upper.as_str()).map(|rows| rows.as_slice())
    }
}

/// Where a typeface comes from.
#[derive(Clone, Debug)]
pub enum FontSource {
    Embedded(String),
    File(PathBuf),
}

/// Loads a typeface off the main thread. Mirrors the engine contract
/// where a font resolves some time after the owning element mounts, or
/// fails permanently; the result is polled, never awaited.
pub struct FontLoader {
    rx: Receiver<Result<BannerFont, FontError>>,
}

impl FontLoader {
    pub fn spawn(source: FontSource) -> Self {
        let (tx, rx) = channel();
        thread::spawn(move || {
            let loaded = match source {
                FontSource::Embedded(name) => BannerFont::embedded(&name),
                FontSource::File(path) => BannerFont::from_path(&path),
            };
            // the receiver may already be gone on teardown
            let _ = tx.send(loaded);
        });
        Self { rx }
    }

    /// Non-blocking poll. `None` while the load is still in flight.
    pub fn poll(&self) -> Option<Result<BannerFont, FontError>> {
        self.rx.try_recv().ok()
    }
}
