pub mod cli;
pub mod codegen;
pub mod error;
pub mod export;
pub mod graph;
pub mod logging;
pub mod path_de;
pub mod persist;
pub mod preprocess;
pub mod report;
pub mod schema;
pub mod traverse;

pub use error::{Error, Result};
pub use graph::{Arg, Edge, Graph, Kind, Node, Operation, Path, Root, Step};
