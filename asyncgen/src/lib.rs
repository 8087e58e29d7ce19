//! # asyncgen
//!
//! Compile asynchronous API documents into a linked artifact graph and
//! select the protocol variants that apply to each server, channel and
//! message.
//!
//! ## Features
//!
//! - **`compiler`** (default) - walker, promises, linker and selection
//! - **`runtime`** - worker groups and fan-out/fan-in for generated clients
//!
//! ## Example
//!
//! ```rust,ignore
//! use asyncgen::prelude::*;
//!
//! let doc = parse_document_file("asyncapi.json")?;
//! let graph = Project::new(CompileOptions::default(), &NoExternalDocuments)?
//!     .build("asyncapi.json", &doc)?;
//! let selection = Selection::new(&graph);
//! for channel in selection.units(ArtifactKind::Channel) {
//!     println!("{} {:?}", graph.display_name(channel), selection.channel_protocols(channel));
//! }
//! ```

pub use asyncgen_spec as spec;

#[cfg(feature = "compiler")]
pub use asyncgen_compiler as compiler;

#[cfg(feature = "runtime")]
pub use asyncgen_runtime as runtime;

/// Prelude module for convenient imports
pub mod prelude {
    pub use asyncgen_spec::{parse_document_content, parse_document_file, AsyncApi};

    #[cfg(feature = "compiler")]
    pub use asyncgen_compiler::{
        ArtifactKind, BuildError, CompileOptions, DocumentResolver, InMemoryResolver,
        LinkedGraph, NoExternalDocuments, Project, ProtocolBuilder, ProtocolRegistry, Selection,
    };

    #[cfg(feature = "runtime")]
    pub use asyncgen_runtime::{FanIn, FanOut, WorkerConfig, WorkerGroup};
}

#[cfg(all(test, feature = "compiler"))]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_builds_a_graph() {
        let doc = parse_document_content(
            r#"{
                "servers": { "broker": { "url": "broker:9092", "protocol": "kafka" } },
                "channels": { "orders": { "subscribe": { "message": { "payload": { "type": "object" } } } } }
            }"#,
        )
        .unwrap();
        let graph = Project::new(CompileOptions::default(), &NoExternalDocuments)
            .unwrap()
            .build("main.json", &doc)
            .unwrap();
        let selection = Selection::new(&graph);
        let channels = selection.units(ArtifactKind::Channel);
        assert_eq!(channels.len(), 1);
        assert_eq!(selection.channel_protocols(channels[0]), vec!["kafka"]);
    }
}
