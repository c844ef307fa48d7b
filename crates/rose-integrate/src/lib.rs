//! Layout and in-place editing engine for rose rich-text markup.
//!
//! An [`Integrate`] engine owns a markup source string and the [`Item`]s laid
//! out from it. Three views of a document are kept in exact correspondence:
//!
//! - the **source**, the only persisted representation;
//! - the **items**, each recording the source bytes it came from;
//! - the **layout**, each item's pixel rectangle and row band.
//!
//! In editable mode the engine maps pixels to carets and carets to source
//! offsets, and produces the new source (plus the new cursor) for every
//! insertion, deletion and selection edit.
//!
//! # Example
//!
//! ```
//! use rose_integrate::{Environment, Integrate, IntegrateConfig};
//!
//! let config = IntegrateConfig::new(400, 14).with_editable(true);
//! let engine = Integrate::new("Hello\nWorld", config, Environment::default()).unwrap();
//! assert_eq!(engine.get_size().h, 2 * engine.min_row_height());
//!
//! let edit = engine.insert_str(0, 0, ">> ");
//! assert_eq!(edit.source, ">> Hello\nWorld");
//! ```

pub mod builder;
pub mod config;
pub mod edit;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod item;
pub mod layout;
pub mod linebreak;
pub mod metrics;
pub mod paint;
pub mod resources;

pub use config::IntegrateConfig;
pub use edit::{Caret, EditResult, ItemLocation, SelectionAction, SelectionOutcome};
pub use engine::Integrate;
pub use error::IntegrateError;
pub use geometry::{Point, Rect, Size};
pub use item::{Align, Content, Item};
pub use metrics::{ApproximateMetrics, TextMetrics, TextStyle};
pub use paint::{DisplayCommand, DisplayList, Painter};
pub use resources::{AnimationHandle, AnimationHost, Environment, ImageSource, LinkResolver};
