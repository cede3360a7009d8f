//! `mdnize_core` pulls documentation out of source code comments and merges
//! it into a markdown document.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source tree
//!   → Tree walker (visits every entry, skips `.md` files)
//!   → Fragment scanner (finds `// md:` … `// :md` regions per comment syntax)
//!   → Placeholder router (assigns each file to a `<!-- mdnize[prefix]: -->` region)
//!   → Document merger (rewrites each region's interior)
//! ```
//!
//! ## Source markers
//!
//! ```js
//! // md: A single line of documentation.
//!
//! // md:[js]
//! console.log("shown as a fenced js block");
//! // :md
//! ```
//!
//! ## Destination markers
//!
//! ```markdown
//! <!-- mdnize[api]: -->
//! everything in here is replaced by files under src/api
//! <!-- :mdnize -->
//!
//! <!-- mdnize: -->
//! everything else lands here
//! <!-- :mdnize -->
//! ```
//!
//! Keys are matched against paths relative to the scanned target. With
//! `src` as the target, the `api` key above claims everything in `src/api`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use mdnize_core::MdnizeOptions;
//! use mdnize_core::run;
//!
//! let outcome = run(Path::new("src"), Path::new("README.md"), &MdnizeOptions::default()).unwrap();
//! println!("merged {} file(s)", outcome.leaf_count);
//! ```

pub use comment_syntax::*;
pub use config::*;
pub use diagnostics::*;
pub use engine::*;
pub use error::*;
pub use merger::*;
pub use router::*;
pub use scanner::*;
pub use tree::*;

pub mod comment_syntax;
pub mod config;
pub mod diagnostics;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod merger;
pub mod router;
pub mod scanner;
pub mod tree;
