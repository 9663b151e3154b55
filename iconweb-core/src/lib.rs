/// iconweb-core: SVG icons in, a webfont kit out
///
/// Point it at a folder of SVG icons and it hands back everything a website
/// needs to use them as a font: the font binaries, a stylesheet with one
/// class per icon, an HTML preview page and a JSON map of icon names to
/// codepoints.
///
/// ## One Pipeline, Eight Stages
///
/// **Resolve**: caller options are layered over the documented defaults
/// into a fresh [`options::Options`]; nothing the caller passed is mutated.
///
/// **Validate**: paths, output directory, templates and the codepoint file
/// are checked in a fixed order before anything touches the disk.
///
/// **Configure**: artifact paths, the font URL prefix and the template
/// variables are derived into a [`config::GeneratorConfig`].
///
/// **Compile**: a [`engine::FontEngine`] writes the fonts (SVG, TTF, WOFF,
/// WOFF2, EOT) and renders the stylesheet and preview.
///
/// **Tidy up**: formats nobody asked for are deleted from the output
/// directory, and the codepoint map is written as JSON.
///
/// ## A Sample Run
///
/// ```rust,no_run
/// use iconweb_core::generate::generate;
/// use iconweb_core::options::{FontType, GenerationOptions};
///
/// # async fn run() -> iconweb_core::error::Result<()> {
/// let options = GenerationOptions::new()
///     .with_paths(["icons/home.svg", "icons/user.svg"])
///     .with_output_dir("dist/fonts")
///     .with_types(vec![FontType::Woff2, FontType::Woff]);
///
/// let summary = generate(&options).await?;
/// for (name, codepoint) in summary.codepoints.iter().flatten() {
///     println!("{name}: U+{codepoint:04X}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Errors
///
/// Validation problems come back as [`error::Error::Validation`] with a short
/// message meant for the person at the keyboard. Everything else (engine and
/// filesystem failures) keeps its full cause chain.
///
/// ---
///
/// Crafted with care at FontLab https://www.fontlab.com/

pub mod cleanup;
pub mod codepoint;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod generate;
pub mod options;
pub mod paths;
pub mod report;
pub mod selector;
pub mod validate;
