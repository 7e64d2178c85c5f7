pub mod node;
pub mod show;
pub mod resolve;
pub mod model;
pub mod extract;
pub mod sigshow;
pub mod query;
pub mod snapshot;
pub mod report;
pub mod rules;

pub use crate::extract::{Extractor, extract, extract_node, function_signature};
pub use crate::node::*;
pub use crate::resolve::resolve;
pub use crate::show::{render, render_signature};
pub use crate::sigshow::{Sigshow, SigshowBuilder, SigshowError};
pub use crate::model::*;
pub use crate::query::*;
pub use crate::snapshot::*;
pub use crate::report::*;
pub use crate::rules::*;
