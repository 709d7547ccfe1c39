//! Font discovery and loading.
//!
//! `genpdf` measures text with TrueType metrics, so a font family has to be
//! loaded from disk even when the PDF itself only references the built-in
//! Helvetica fonts.  Families are looked up in this order:
//!
//! 1. the directory set on [`FontConfig`], exclusively, when present;
//! 2. `$EASY_PDF_FONTS_DIR`;
//! 3. `assets/fonts` next to the running executable;
//! 4. `assets/fonts` inside this crate;
//! 5. Liberation Sans and DejaVu Sans in the usual Unix font directories;
//! 6. Arial in the Windows fonts directory.
//!
//! Directories in steps 1–4 must contain `{family}-Regular.ttf`,
//! `{family}-Bold.ttf`, `{family}-Italic.ttf` and `{family}-BoldItalic.ttf`.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};
use printpdf::BuiltinFont;

use crate::error::{PdfError, Result};

/// Environment variable naming an extra font directory.
pub const FONTS_DIR_ENV: &str = "EASY_PDF_FONTS_DIR";

/// Family name expected in font directories unless configured otherwise.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

struct SystemFamily {
    name: &'static str,
    directories: &'static [&'static str],
    files: [&'static str; 4],
}

const UNIX_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "Liberation Sans",
        directories: &[
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/truetype/liberation2",
            "/usr/share/fonts/liberation-sans",
            "/usr/share/fonts/TTF",
        ],
        files: [
            "LiberationSans-Regular.ttf",
            "LiberationSans-Bold.ttf",
            "LiberationSans-Italic.ttf",
            "LiberationSans-BoldItalic.ttf",
        ],
    },
    SystemFamily {
        name: "DejaVu Sans",
        directories: &[
            "/usr/share/fonts/truetype/dejavu",
            "/usr/share/fonts/dejavu",
            "/usr/share/fonts/TTF",
        ],
        files: [
            "DejaVuSans.ttf",
            "DejaVuSans-Bold.ttf",
            "DejaVuSans-Oblique.ttf",
            "DejaVuSans-BoldOblique.ttf",
        ],
    },
];

/// Base-14 faces referenced instead of the loaded files, in
/// regular, bold, italic, bold italic order.
const BUILTIN_FACES: [BuiltinFont; 4] = [
    BuiltinFont::Helvetica,
    BuiltinFont::HelveticaBold,
    BuiltinFont::HelveticaOblique,
    BuiltinFont::HelveticaBoldOblique,
];

const WINDOWS_FAMILY: SystemFamily = SystemFamily {
    name: "Arial",
    directories: &[],
    files: ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"],
};

/// Where to find fonts and how to reference them in the PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontConfig {
    directory: Option<PathBuf>,
    family: String,
    builtin: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            directory: None,
            family: DEFAULT_FONT_FAMILY_NAME.to_owned(),
            builtin: false,
        }
    }
}

impl FontConfig {
    /// Creates the default configuration: search all locations, embed fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the search to `directory`. No fallback is attempted.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Sets the family name used to build file names inside font directories.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    /// When `true`, text is written with the PDF base-14 Helvetica fonts
    /// instead of embedding the loaded TrueType files.
    ///
    /// Built-in fonts only cover the WinAnsi character set.
    pub fn with_builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }

    /// Returns the configured directory, if any.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Returns the configured family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Returns whether built-in PDF fonts are used.
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }
}

/// The four files making up a font family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFiles {
    /// Human-readable origin, used in log and error messages.
    pub origin: String,
    /// Regular face.
    pub regular: PathBuf,
    /// Bold face.
    pub bold: PathBuf,
    /// Italic face.
    pub italic: PathBuf,
    /// Bold italic face.
    pub bold_italic: PathBuf,
}

impl FontFiles {
    fn named<S: AsRef<Path>>(origin: String, directory: &Path, files: [S; 4]) -> Self {
        let [regular, bold, italic, bold_italic] = files.map(|file| directory.join(file));
        Self {
            origin,
            regular,
            bold,
            italic,
            bold_italic,
        }
    }

    fn in_directory(directory: &Path, family: &str) -> Self {
        Self::named(
            directory.display().to_string(),
            directory,
            [
                format!("{family}-Regular.ttf"),
                format!("{family}-Bold.ttf"),
                format!("{family}-Italic.ttf"),
                format!("{family}-BoldItalic.ttf"),
            ],
        )
    }

    fn paths(&self) -> [&Path; 4] {
        [&self.regular, &self.bold, &self.italic, &self.bold_italic]
    }

    fn missing(&self) -> Vec<&Path> {
        self.paths()
            .into_iter()
            .filter(|path| !path.is_file())
            .collect()
    }

    /// Loads all four faces.
    pub fn load(&self, builtin: bool) -> std::result::Result<FontFamily<FontData>, Error> {
        let load = |path: &Path, face: BuiltinFont| {
            FontData::load(path, builtin.then_some(face)).map_err(|err| {
                Error::new(
                    format!("Failed to load font {}: {}", path.display(), err),
                    io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
                )
            })
        };

        let [regular, bold, italic, bold_italic] = BUILTIN_FACES;
        Ok(FontFamily {
            regular: load(&self.regular, regular)?,
            bold: load(&self.bold, bold)?,
            italic: load(&self.italic, italic)?,
            bold_italic: load(&self.bold_italic, bold_italic)?,
        })
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}

fn windows_font_directory() -> Option<PathBuf> {
    ["WINDIR", "SystemRoot"]
        .into_iter()
        .filter_map(env_path)
        .map(|root| root.join("Fonts"))
        .find(|candidate| candidate.is_dir())
}

fn directory_candidates(family: &str) -> Vec<FontFiles> {
    let mut directories = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        directories.push(path);
    }

    if let Some(bin_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        directories.push(bin_dir.join("assets/fonts"));
    }

    directories.push(bundled_fonts_dir());
    directories.dedup();

    directories
        .iter()
        .map(|directory| FontFiles::in_directory(directory, family))
        .collect()
}

fn system_candidates() -> Vec<FontFiles> {
    let mut candidates: Vec<FontFiles> = UNIX_FAMILIES
        .iter()
        .flat_map(|family| {
            family.directories.iter().map(move |directory| {
                FontFiles::named(
                    format!("{} in {}", family.name, directory),
                    Path::new(directory),
                    family.files,
                )
            })
        })
        .collect();

    if let Some(directory) = windows_font_directory() {
        candidates.push(FontFiles::named(
            format!("{} in {}", WINDOWS_FAMILY.name, directory.display()),
            &directory,
            WINDOWS_FAMILY.files,
        ));
    }

    candidates
}

/// Directory holding fonts shipped alongside the crate sources.
pub fn bundled_fonts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

/// Finds the first complete font family allowed by `config`.
pub fn resolve_font_files(config: &FontConfig) -> std::result::Result<FontFiles, Error> {
    if let Some(directory) = config.directory() {
        let files = FontFiles::in_directory(directory, config.family());
        let missing = files.missing();
        if missing.is_empty() {
            return Ok(files);
        }
        return Err(Error::new(
            format!(
                "Configured font directory {} is missing {}",
                directory.display(),
                join_paths(&missing)
            ),
            io::Error::new(io::ErrorKind::NotFound, "configured fonts missing"),
        ));
    }

    let mut attempts = Vec::new();

    for files in directory_candidates(config.family()) {
        let missing = files.missing();
        if missing.is_empty() {
            debug!("Using fonts from {}", files.origin);
            return Ok(files);
        }
        attempts.push(format!("{} (missing {})", files.origin, join_paths(&missing)));
    }

    if let Some(files) = system_candidates()
        .into_iter()
        .find(|files| files.missing().is_empty())
    {
        warn!(
            "Font family '{}' not found ({}); falling back to {}",
            config.family(),
            attempts.join(", "),
            files.origin
        );
        return Ok(files);
    }

    Err(Error::new(
        format!(
            "Unable to locate a usable font family. Checked: {}, plus system fonts. Set {} or copy fonts into {}.",
            attempts.join(", "),
            FONTS_DIR_ENV,
            bundled_fonts_dir().display()
        ),
        io::Error::new(io::ErrorKind::NotFound, "no font family found"),
    ))
}

fn join_paths(paths: &[&Path]) -> String {
    paths
        .iter()
        .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves and loads the font family described by `config`.
pub fn load_font_family(config: &FontConfig) -> Result<FontFamily<FontData>> {
    let files = resolve_font_files(config).map_err(PdfError::FontLoad)?;
    files.load(config.is_builtin()).map_err(PdfError::FontLoad)
}

/// Whether [`load_font_family`] can find fonts with the default configuration.
pub fn default_fonts_available() -> bool {
    resolve_font_files(&FontConfig::default()).is_ok()
}
