//! Republishing exported HTML notebooks.
//!
//! An exported notebook embeds its figures either inline, as base64 data
//! URIs, or as files under an `assets/` folder next to the HTML. Content
//! management systems want neither: they want a fragment of HTML whose images
//! live at a public address. Republishing does that in two stages:
//!
//! 1. [`Republisher::plan`] parses the notebook, keeps only its body (as a
//!    `div`, with the MathJax configuration moved into it), and rewrites every
//!    recognized `<img src>` to `{public_address}/{name}/img/{filename}`.
//!    Nothing is written yet.
//! 2. [`Publication::write`] creates the output folders, purges inline images
//!    from earlier runs, then writes the HTML, the decoded inline images and
//!    copies of the asset images.
//!
//! Inline images are named after a hash of their payload, so reruns produce
//! the same files. Asset copies keep their path relative to `assets/` and are
//! never purged.
//!
//! ```no_run
//! let report = nbpress::republish("notebook.html", "https://cdn.example.com", "dist")?;
//! for path in report.written_files() {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), nbpress::Error>(())
//! ```

mod image;
mod output;
mod patterns;

pub use image::{ImageSource, InlineImage, check_asset_path, inline_filename};
pub use output::{Action, Report};

use std::fs;
use std::path::{Path, PathBuf};

use crate::dom::{parse_html, to_pretty_html};
use crate::error::{Error, Result};
use crate::util::decode_text;

/// Filename prefix of images extracted from data URIs.
pub const IMG_PREFIX: &str = "nb_img_";

/// Folder under the notebook's output folder holding its images.
pub const IMG_SUBDIR: &str = "img";

/// Folder next to the input HTML holding asset images.
pub const ASSETS_DIR: &str = "assets";

/// `type` of the script element carrying the MathJax configuration.
pub const MATHJAX_CONFIG_TYPE: &str = "text/x-mathjax-config";

/// Number of hex digits of the payload hash used in inline filenames.
pub const HASH_PREFIX_LEN: usize = 16;

/// Republish `input_html` into `output_dir` with images served from
/// `public_address`.
pub fn republish(
    input_html: impl AsRef<Path>,
    public_address: &str,
    output_dir: impl AsRef<Path>,
) -> Result<Report> {
    Republisher::new(public_address).run(input_html, output_dir)
}

/// Rewrites notebooks for one public address.
#[derive(Debug, Clone)]
pub struct Republisher {
    public_address: String,
}

impl Republisher {
    pub fn new(public_address: impl Into<String>) -> Self {
        Self {
            public_address: public_address.into(),
        }
    }

    pub fn public_address(&self) -> &str {
        &self.public_address
    }

    /// Plan and write in one go.
    pub fn run(&self, input_html: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<Report> {
        self.plan(input_html)?.write(output_dir)
    }

    /// Read and transform a notebook file without writing anything.
    pub fn plan(&self, input_html: impl AsRef<Path>) -> Result<Publication> {
        let input = input_html.as_ref();
        if !input.is_file() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }
        let basename = input
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidInput(input.to_path_buf()))?;

        let bytes = fs::read(input)?;
        let mut publication = self.transform(&decode_text(&bytes), basename)?;
        publication.input_dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(publication)
    }

    /// Transform notebook HTML as if it were read from a file named
    /// `basename` in the current directory.
    pub fn transform(&self, html: &str, basename: &str) -> Result<Publication> {
        let subdir = Path::new(basename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(basename)
            .to_string();

        let mut dom = parse_html(html);

        let mathjax = dom.find_by_tag_attr("script", "type", MATHJAX_CONFIG_TYPE);
        if let Some(script) = mathjax {
            dom.detach(script);
        }

        let body = dom.find_by_tag("body").ok_or(Error::MissingBody)?;
        dom.set_root(body);
        dom.rename(body, "div");
        if let Some(script) = mathjax {
            dom.append(body, script);
        }

        let url_prefix = format!("{}/{subdir}/{IMG_SUBDIR}", self.public_address);
        let mut inline_images: Vec<InlineImage> = Vec::new();
        let mut asset_images: Vec<String> = Vec::new();

        for (index, img) in dom.elements_by_tag(body, "img").into_iter().enumerate() {
            let src = dom.get_attr(img, "src").ok_or(Error::MissingSource(index))?;

            let filename = match ImageSource::classify(src) {
                ImageSource::Inline { format, payload } => {
                    let image = InlineImage::decode(format, payload)?;
                    let filename = image.filename.clone();
                    if !inline_images.iter().any(|i| i.filename == filename) {
                        inline_images.push(image);
                    }
                    filename
                }
                ImageSource::Asset { path } => {
                    check_asset_path(path)?;
                    let path = path.to_string();
                    if !asset_images.contains(&path) {
                        asset_images.push(path.clone());
                    }
                    path
                }
                ImageSource::Unrecognized => {
                    log::debug!("leaving image source as is: {src}");
                    continue;
                }
            };

            dom.set_attr(img, "src", &format!("{url_prefix}/{filename}"));
        }

        log::debug!(
            "{basename}: {} inline images, {} asset images",
            inline_images.len(),
            asset_images.len()
        );

        Ok(Publication {
            basename: basename.to_string(),
            subdir,
            input_dir: PathBuf::new(),
            html: to_pretty_html(&dom),
            inline_images,
            asset_images,
        })
    }
}

/// A transformed notebook, ready to be written.
#[derive(Debug, Clone)]
pub struct Publication {
    /// Input file name, reused for the output HTML.
    pub basename: String,
    /// Input file name without extension.
    pub subdir: String,
    /// Folder holding the input HTML and its `assets/`.
    pub input_dir: PathBuf,
    /// Rewritten HTML fragment.
    pub html: String,
    /// Decoded inline images, one per distinct payload.
    pub inline_images: Vec<InlineImage>,
    /// Asset paths relative to `assets/`, one per distinct path.
    pub asset_images: Vec<String>,
}

impl Publication {
    /// Image folder relative to the output folder (`{subdir}/img`).
    pub fn image_subdir(&self) -> PathBuf {
        Path::new(&self.subdir).join(IMG_SUBDIR)
    }

    /// Folder asset images are copied from.
    pub fn assets_dir(&self) -> PathBuf {
        self.input_dir.join(ASSETS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "https://cdn.example.com";

    fn transform(html: &str) -> Publication {
        Republisher::new(ADDR).transform(html, "page.html").unwrap()
    }

    #[test]
    fn test_inline_image_is_rewritten() {
        let publication = transform(r#"<p><img src="data:image/png;base64,QUJD"></p>"#);
        let filename = inline_filename("png", "QUJD");

        assert_eq!(publication.inline_images.len(), 1);
        assert_eq!(publication.inline_images[0].filename, filename);
        assert_eq!(publication.inline_images[0].data, b"ABC");
        assert!(
            publication
                .html
                .contains(&format!(r#"<img src="{ADDR}/page/img/{filename}">"#))
        );
        assert!(!publication.html.contains("base64"));
    }

    #[test]
    fn test_asset_image_is_rewritten() {
        let publication = transform(r#"<img src="/assets/diagrams/fig1.png">"#);
        assert_eq!(publication.asset_images, vec!["diagrams/fig1.png"]);
        assert!(
            publication
                .html
                .contains(r#"<img src="https://cdn.example.com/page/img/diagrams/fig1.png">"#)
        );
    }

    #[test]
    fn test_unrecognized_source_is_untouched() {
        let publication = transform(r#"<img src="https://example.com/pic.jpg" alt="x">"#);
        assert!(publication.inline_images.is_empty());
        assert!(publication.asset_images.is_empty());
        assert!(
            publication
                .html
                .contains(r#"<img src="https://example.com/pic.jpg" alt="x">"#)
        );
    }

    #[test]
    fn test_body_becomes_div() {
        let publication = transform(
            "<!DOCTYPE html><html><head><title>T</title></head>\
             <body class=\"jp-Notebook\"><p>Hi</p></body></html>",
        );
        let html = &publication.html;
        assert!(html.starts_with("<div class=\"jp-Notebook\">\n"));
        assert!(html.ends_with("</div>\n"));
        assert!(!html.contains("<body"));
        assert!(!html.contains("<html"));
        assert!(!html.contains("<title>"));
        assert!(!html.contains("DOCTYPE"));
    }

    #[test]
    fn test_mathjax_config_moves_into_div() {
        let publication = transform(
            r#"<html><head>
            <script type="text/x-mathjax-config">MathJax.Hub.Config({tex2jax: {inlineMath: [['$','$']]}});</script>
            <script src="other.js"></script>
            </head><body><p>$x$</p></body></html>"#,
        );
        let html = &publication.html;
        let script = html
            .find(r#"<script type="text/x-mathjax-config">"#)
            .expect("config kept");
        assert!(script > html.find("<p>").unwrap());
        assert!(html.contains("MathJax.Hub.Config({tex2jax: {inlineMath: [['$','$']]}});"));
        assert!(!html.contains("other.js"));
    }

    #[test]
    fn test_without_mathjax_config() {
        let publication = transform("<p>plain</p>");
        assert!(!publication.html.contains("<script"));
    }

    #[test]
    fn test_missing_src_fails() {
        let err = Republisher::new(ADDR)
            .transform(r#"<img src="a.png"><img alt="none">"#, "page.html")
            .unwrap_err();
        assert!(matches!(err, Error::MissingSource(1)));
    }

    #[test]
    fn test_frameset_document_has_no_body() {
        let err = Republisher::new(ADDR)
            .transform("<html><frameset><frame></frameset></html>", "page.html")
            .unwrap_err();
        assert!(matches!(err, Error::MissingBody));
    }

    #[test]
    fn test_asset_path_outside_assets_fails() {
        for src in ["assets//abs/file.png", "/assets/../../secret.png"] {
            let err = Republisher::new(ADDR)
                .transform(&format!(r#"<img src="{src}">"#), "page.html")
                .unwrap_err();
            assert!(matches!(err, Error::UnsafeAssetPath(_)), "{src}");
        }
    }

    #[test]
    fn test_duplicates_recorded_once() {
        let publication = transform(
            r#"<img src="data:image/png;base64,QUJD"><img src="data:image/png;base64,QUJD">
               <img src="assets/a.png"><img src="/assets/a.png">"#,
        );
        assert_eq!(publication.inline_images.len(), 1);
        assert_eq!(publication.asset_images, vec!["a.png"]);

        let rewritten = format!("{ADDR}/page/img/{}", inline_filename("png", "QUJD"));
        assert_eq!(publication.html.matches(&rewritten).count(), 2);
        assert_eq!(publication.html.matches("/page/img/a.png").count(), 2);
    }

    #[test]
    fn test_subdir_from_basename() {
        let publication = Republisher::new(ADDR)
            .transform(r#"<img src="assets/a.png">"#, "lecture-03.html")
            .unwrap();
        assert_eq!(publication.subdir, "lecture-03");
        assert_eq!(publication.image_subdir(), Path::new("lecture-03").join("img"));
        assert!(publication.html.contains(&format!("{ADDR}/lecture-03/img/a.png")));
    }
}
