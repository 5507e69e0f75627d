//! Tola Feed - render RSS 2.0, Atom 1.0 and JSON Feed 1.1 from one model.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── feed/          # Renderers and the format dispatcher
//! │   ├── rss        # RSS 2.0 channel document + renderer
//! │   ├── atom       # Atom 1.0 feed document + renderer
//! │   └── json       # JSON Feed 1.1 document + renderer
//! ├── model          # Canonical FeedModel / Item
//! ├── config         # [feed] section of the config file
//! ├── error          # FeedError
//! ├── logger         # log!/debug! macros
//! └── utils/         # DateTimeUtc, XML fragment assembly
//! ```
//!
//! # Example
//!
//! ```
//! use tola_feed::{FeedModel, Item, render};
//!
//! let model = FeedModel {
//!     title: "T".into(),
//!     description: Some("D".into()),
//!     id: "https://x".into(),
//!     link: Some("https://x".into()),
//!     items: vec![Item {
//!         title: Some("Hello".into()),
//!         link: Some("https://x/hello".into()),
//!         ..Item::default()
//!     }],
//!     ..FeedModel::default()
//! };
//!
//! let xml = render("rss", &model).unwrap();
//! assert!(xml.contains("<title>Hello</title>"));
//! ```
//!
//! Rendering is a pure transform: the only outside input is the clock, read
//! when a timestamp is missing. Use [`Feeds::render_at`] to pin it.

pub mod config;
pub mod error;
pub mod feed;
pub mod logger;
pub mod model;
pub mod utils;

pub use config::FeedConfig;
pub use error::{FeedError, Result};
pub use feed::{
    FeedFormat, Feeds,
    atom::{AtomFeed, AtomRenderer},
    json::{JsonFeed, JsonFeedRenderer},
    render,
    rss::{RssChannel, RssRenderer},
};
pub use model::{Enclosure, FeedLinks, FeedModel, Image, Item, Person, Source};
pub use utils::date::DateTimeUtc;
