//! # nbpress
//!
//! Helpers for publishing notebooks to a blog.
//!
//! The main job is [`republish`]: take an HTML export of a notebook and
//! turn it into a fragment a content-management system will accept, with
//! inline and `assets/` images moved into a folder served from a public
//! address.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Writes dist/lecture.html and dist/lecture/img/*
//! nbpress::republish("lecture.html", "https://cdn.example.com/notebooks", "dist")?;
//! # Ok::<(), nbpress::Error>(())
//! ```
//!
//! Planning and writing can also be separated, to inspect the rewritten
//! HTML first:
//!
//! ```
//! use nbpress::Republisher;
//!
//! let html = r#"<body><img src="data:image/png;base64,QUJD"></body>"#;
//! let publication = Republisher::new("https://cdn.example.com")
//!     .transform(html, "page.html")
//!     .unwrap();
//!
//! assert_eq!(publication.inline_images[0].data, b"ABC");
//! assert!(publication.html.contains("https://cdn.example.com/page/img/nb_img_"));
//! ```
//!
//! ## Notebook helpers
//!
//! - [`palette`]: the blog's colours and the plot colour cycle
//! - [`waterfall`]: geometry for 3D cascading waveform plots
//! - [`numeric`]: integrator snapshots and truncated SVD reconstruction
//! - `fetch` (feature `fetch`): download and decode a remote image

pub mod dom;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod numeric;
pub mod palette;
pub mod republish;
pub(crate) mod util;
pub mod waterfall;

pub use error::{Error, Result};
pub use republish::{Publication, Report, Republisher, republish};
