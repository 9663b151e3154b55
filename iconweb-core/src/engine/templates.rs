//! Stylesheet and preview rendering with tera.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;
use tera::{Context, Tera};
use xxhash_rust::xxh3::xxh3_64;

use crate::codepoint::CodepointMap;
use crate::config::GeneratorConfig;
use crate::options::FontType;

pub const DEFAULT_CSS_TEMPLATE: &str = r#"@font-face {
	font-family: "{{ fontName }}";
	src: {{ src }};
}

{% if baseSelector %}{{ baseSelector }}:before{% else %}{{ baseTag }}[class^="{{ classPrefix }}"]:before, {{ baseTag }}[class*=" {{ classPrefix }}"]:before{% endif %} {
	font-family: "{{ fontName }}" !important;
	font-style: normal;
	font-weight: normal !important;
	font-variant: normal;
	text-transform: none;
	line-height: 1;
	-webkit-font-smoothing: antialiased;
	-moz-osx-font-smoothing: grayscale;
}
{%- for icon in icons %}

.{{ classPrefix }}{{ icon.name }}:before {
	content: "\{{ icon.codepoint }}";
}
{%- endfor %}
"#;

pub const DEFAULT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
	<meta charset="UTF-8">
	<title>{{ fontName }}</title>
	<link rel="stylesheet" type="text/css" href="{{ htmlCssRelativePath }}{{ cssFile }}">
	<style>
		body { font-family: sans-serif; margin: 0; padding: 2em; }
		.icons { display: flex; flex-wrap: wrap; }
		.icon { width: 8em; margin: 0.5em; text-align: center; }
		.icon {{ baseTag }} { font-size: 2.5em; }
		.name { font-size: 0.8em; word-break: break-all; }
		.code { font-size: 0.7em; color: #888; }
	</style>
</head>
<body>
	<h1>{{ fontName }}</h1>
	<div class="icons">
{%- for icon in icons %}
		<div class="icon">
			<{{ baseTag }} class="{% if baseClassNames %}{{ baseClassNames }} {% endif %}{{ classPrefix }}{{ icon.name }}"></{{ baseTag }}>
			<div class="name">{{ icon.name }}</div>
			<div class="code">{{ icon.codepoint }}</div>
		</div>
{%- endfor %}
	</div>
</body>
</html>
"#;

/// Order in which formats appear in the `@font-face` src list.
const SRC_ORDER: [FontType; 5] = [
    FontType::Eot,
    FontType::Woff2,
    FontType::Woff,
    FontType::Ttf,
    FontType::Svg,
];

#[derive(Debug, Serialize)]
struct IconEntry<'a> {
    name: &'a str,
    codepoint: String,
}

/// A compiled font file ready to be listed in the stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct FontSource<'a> {
    pub font_type: FontType,
    pub data: &'a [u8],
}

/// The `@font-face` src value, each URL carrying a content hash.
pub fn font_src(config: &GeneratorConfig, fonts: &[FontSource<'_>]) -> String {
    SRC_ORDER
        .iter()
        .filter_map(|font_type| fonts.iter().find(|f| f.font_type == *font_type))
        .map(|font| {
            let url = format!(
                "{}{}.{}?{:016x}",
                config.css_fonts_url,
                config.font_name,
                font.font_type.extension(),
                xxh3_64(font.data)
            );
            match font.font_type {
                FontType::Eot => format!("url(\"{url}#iefix\") format(\"embedded-opentype\")"),
                FontType::Woff2 => format!("url(\"{url}\") format(\"woff2\")"),
                FontType::Woff => format!("url(\"{url}\") format(\"woff\")"),
                FontType::Ttf => format!("url(\"{url}\") format(\"truetype\")"),
                FontType::Svg => {
                    format!("url(\"{url}#{}\") format(\"svg\")", config.font_name)
                }
            }
        })
        .collect::<Vec<_>>()
        .join(",\n\t\t")
}

/// Variables shared by both templates.
pub fn template_context(config: &GeneratorConfig, codepoints: &CodepointMap, src: &str) -> Context {
    let icons: Vec<IconEntry<'_>> = codepoints
        .iter()
        .map(|(name, cp)| IconEntry {
            name,
            codepoint: format!("{cp:x}"),
        })
        .collect();
    let hex: indexmap::IndexMap<&str, String> = codepoints
        .iter()
        .map(|(name, cp)| (name.as_str(), format!("{cp:x}")))
        .collect();
    let options = &config.template_options;
    let css_file = config
        .css_dest
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut ctx = Context::new();
    ctx.insert("fontName", &config.font_name);
    ctx.insert("src", src);
    ctx.insert("icons", &icons);
    ctx.insert("codepoints", &hex);
    ctx.insert("baseTag", &options.base_tag);
    ctx.insert("baseSelector", &options.base_selector);
    ctx.insert("baseClassNames", &options.base_class_names);
    ctx.insert("classPrefix", &options.class_prefix);
    ctx.insert("htmlCssRelativePath", &options.html_css_relative_path);
    ctx.insert("cssFile", &css_file);
    ctx
}

pub fn render_css(config: &GeneratorConfig, ctx: &Context) -> Result<String> {
    render("stylesheet.css.tera", config.css_template.as_deref(), DEFAULT_CSS_TEMPLATE, ctx)
}

pub fn render_html(config: &GeneratorConfig, ctx: &Context) -> Result<String> {
    render("preview.html.tera", config.html_template.as_deref(), DEFAULT_HTML_TEMPLATE, ctx)
}

fn render(name: &str, custom: Option<&Path>, fallback: &str, ctx: &Context) -> Result<String> {
    let source = match custom {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading template {}", path.display()))?,
        None => fallback.to_string(),
    };
    let mut tera = Tera::default();
    tera.add_raw_template(name, &source)
        .with_context(|| format!("compiling {name} template"))?;
    tera.render(name, ctx)
        .with_context(|| format!("rendering {name} template"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build_config;
    use crate::extract::extract_codepoints;
    use crate::options::GenerationOptions;
    use tempfile::tempdir;

    fn config(opts: GenerationOptions) -> GeneratorConfig {
        build_config(&opts.with_output_dir("/srv/fonts").resolve(), CodepointMap::new()).unwrap()
    }

    fn codepoints() -> CodepointMap {
        let mut map = CodepointMap::new();
        map.insert("home".into(), 0xF101);
        map.insert("arrow-left".into(), 0xF102);
        map
    }

    #[test]
    fn default_css_is_scrapable() {
        let config = config(GenerationOptions::new());
        let ctx = template_context(&config, &codepoints(), "url(\"icons.ttf\")");
        let css = render_css(&config, &ctx).unwrap();

        assert!(css.contains("font-family: \"icons\";"));
        assert!(css.contains("i[class^=\"icon-\"]:before, i[class*=\" icon-\"]:before {"));
        let scraped = extract_codepoints(&css);
        let pairs: Vec<(&str, &str)> = scraped.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("home", "f101"), ("arrow-left", "f102")]);
    }

    #[test]
    fn base_selector_replaces_the_attribute_rule() {
        let config = config(GenerationOptions {
            base_selector: Some("span.glyph".into()),
            ..GenerationOptions::new()
        });
        let ctx = template_context(&config, &codepoints(), "");
        let css = render_css(&config, &ctx).unwrap();
        assert!(css.contains("span.glyph:before {"));

        let html = render_html(&config, &ctx).unwrap();
        assert!(html.contains("<span class=\"glyph icon-home\"></span>"));
        assert!(html.contains("href=\"icons.css\""));
    }

    #[test]
    fn src_lists_requested_formats_in_fixed_order() {
        let config = config(GenerationOptions {
            fonts_path: Some("/static/".into()),
            ..GenerationOptions::new()
        });
        let fonts = [
            FontSource { font_type: FontType::Ttf, data: b"ttf" },
            FontSource { font_type: FontType::Woff2, data: b"woff2" },
        ];
        let src = font_src(&config, &fonts);
        let woff2_at = src.find("icons.woff2?").unwrap();
        let ttf_at = src.find("icons.ttf?").unwrap();
        assert!(woff2_at < ttf_at);
        assert!(src.starts_with("url(\"/static/icons.woff2?"));
        assert!(src.contains(&format!("{:016x}", xxh3_64(b"ttf"))));
    }

    #[test]
    fn custom_templates_are_read_from_disk() {
        let tmp = tempdir().unwrap();
        let template = tmp.path().join("custom.css.tera");
        fs::write(
            &template,
            "{% for icon in icons %}{{ icon.name }}={{ icon.codepoint }};{% endfor %}{{ codepoints.home }}",
        )
        .unwrap();

        let mut config = config(GenerationOptions::new());
        config.css_template = Some(template);
        let ctx = template_context(&config, &codepoints(), "");
        assert_eq!(render_css(&config, &ctx).unwrap(), "home=f101;arrow-left=f102;f101");
    }
}
