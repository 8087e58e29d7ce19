//! Protocol selection over a linked graph.
//!
//! Every server, channel and message carries one pre-built variant per
//! registered protocol. Which of them apply is only known after linking:
//! a channel speaks the protocols of the servers it is bound to, a message
//! the protocols of every channel whose operations carry it. The channels a
//! server carries are derived from the same bindings, so a channel reached
//! through a reference counts under the servers its target names.

use crate::artifact::{ArtifactId, ArtifactKind, Body};
use crate::entities::ChannelServers;
use crate::error::Diagnostic;
use crate::link::LinkedGraph;
use crate::location::Location;
use crate::protocol::ProtoVariant;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;

pub struct Selection<'g> {
    graph: &'g LinkedGraph,
    channels: HashMap<ArtifactId, IndexSet<&'g str>>,
    messages: HashMap<ArtifactId, IndexSet<&'g str>>,
    servers: HashMap<ArtifactId, IndexSet<ArtifactId>>,
}

impl<'g> Selection<'g> {
    pub fn new(graph: &'g LinkedGraph) -> Self {
        let mut channels = HashMap::new();
        let mut messages: HashMap<ArtifactId, IndexSet<&'g str>> = HashMap::new();
        let mut carried: HashMap<ArtifactId, IndexSet<ArtifactId>> = HashMap::new();

        for (id, artifact) in graph.artifacts() {
            let Body::Channel(channel) = artifact.body() else {
                continue;
            };

            let servers: Vec<_> = match &channel.servers {
                ChannelServers::Named(promises) => promises.iter().map(|p| graph.resolve(p)).collect(),
                ChannelServers::All(promise) => graph.resolve_list(promise),
            };
            for (server_id, _) in &servers {
                carried.entry(*server_id).or_default().insert(id);
            }
            let protocols: IndexSet<&'g str> = servers
                .into_iter()
                .filter(|(server_id, _)| graph.is_visible(*server_id))
                .map(|(_, server)| server.protocol.as_str())
                .collect();

            for operation in channel.operations() {
                let (_, operation) = graph.resolve(operation);
                for message in &operation.messages {
                    let (message_id, _) = graph.resolve(message);
                    messages
                        .entry(message_id)
                        .or_default()
                        .extend(protocols.iter().copied());
                }
            }
            channels.insert(id, protocols);
        }

        Self {
            graph,
            channels,
            messages,
            servers: carried,
        }
    }

    pub fn graph(&self) -> &'g LinkedGraph {
        self.graph
    }

    /// Protocols a channel is served over, in server order.
    pub fn channel_protocols(&self, id: ArtifactId) -> Vec<&'g str> {
        collect(self.channels.get(&self.graph.deref(id)))
    }

    /// Channels bound to a server, in store order.
    pub fn server_channels(&self, id: ArtifactId) -> Vec<ArtifactId> {
        self.servers
            .get(&self.graph.deref(id))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Protocols a message travels over, in channel order.
    pub fn message_protocols(&self, id: ArtifactId) -> Vec<&'g str> {
        collect(self.messages.get(&self.graph.deref(id)))
    }

    /// Applicable protocols of any artifact. Empty for kinds without
    /// protocol variants.
    pub fn protocols(&self, id: ArtifactId) -> Vec<&'g str> {
        let id = self.graph.deref(id);
        match self.graph.artifact(id).body() {
            Body::Server(server) => vec![server.protocol.as_str()],
            Body::Channel(_) => self.channel_protocols(id),
            Body::Message(_) => self.message_protocols(id),
            _ => Vec::new(),
        }
    }

    pub fn variant(&self, id: ArtifactId, protocol: &str) -> Option<&'g ProtoVariant> {
        let graph = self.graph;
        let variants = match graph.artifact(graph.deref(id)).body() {
            Body::Server(server) => &server.variants,
            Body::Channel(channel) => &channel.variants,
            Body::Message(message) => &message.variants,
            _ => return None,
        };
        variants.get(protocol)
    }

    /// True when the `protocol` variant of `id` exists and applies.
    pub fn is_variant_selectable(&self, id: ArtifactId, protocol: &str) -> bool {
        self.variant(id, protocol).is_some() && self.protocols(id).iter().any(|p| *p == protocol)
    }

    /// Emission units of `kind`: visible, selectable, concrete artifacts in
    /// store order.
    pub fn units(&self, kind: ArtifactKind) -> Vec<ArtifactId> {
        self.graph
            .artifacts()
            .filter(|(_, artifact)| {
                artifact.kind() == kind
                    && !artifact.body().is_ref()
                    && artifact.is_visible()
                    && artifact.is_selectable()
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Units of `kind` whose `protocol` variant applies, with the variant.
    pub fn protocol_units(&self, kind: ArtifactKind, protocol: &str) -> Vec<(ArtifactId, &'g ProtoVariant)> {
        self.units(kind)
            .into_iter()
            .filter(|id| self.is_variant_selectable(*id, protocol))
            .filter_map(|id| self.variant(id, protocol).map(|variant| (id, variant)))
            .collect()
    }

    pub fn report(&self) -> GraphReport {
        const KINDS: [ArtifactKind; 8] = [
            ArtifactKind::Server,
            ArtifactKind::Channel,
            ArtifactKind::Operation,
            ArtifactKind::Message,
            ArtifactKind::Schema,
            ArtifactKind::Parameter,
            ArtifactKind::Security,
            ArtifactKind::Bindings,
        ];

        let mut counts = IndexMap::new();
        let mut units = Vec::new();
        for kind in KINDS {
            let ids = self.units(kind);
            counts.insert(kind, ids.len());
            units.extend(ids.into_iter().map(|id| {
                let artifact = self.graph.artifact(id);
                let protocols = self.protocols(id);
                let variants = protocols
                    .iter()
                    .filter_map(|protocol| self.variant(id, protocol).cloned())
                    .collect();
                UnitReport {
                    kind,
                    name: self.graph.display_name(id).to_string(),
                    location: artifact.location().clone(),
                    protocols: protocols.into_iter().map(str::to_string).collect(),
                    variants,
                }
            }));
        }

        GraphReport {
            documents: self.graph.documents().map(str::to_string).collect(),
            artifact_count: self.graph.len(),
            counts,
            units,
            diagnostics: self.graph.diagnostics().cloned().collect(),
        }
    }
}

fn collect<'g>(protocols: Option<&IndexSet<&'g str>>) -> Vec<&'g str> {
    protocols
        .map(|set| set.iter().copied().collect())
        .unwrap_or_default()
}

/// Serializable summary of a selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    pub documents: Vec<String>,
    pub artifact_count: usize,
    pub counts: IndexMap<ArtifactKind, usize>,
    pub units: Vec<UnitReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReport {
    pub kind: ArtifactKind,
    pub name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProtoVariant>,
}
